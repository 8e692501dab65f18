use serde::{Deserialize, Serialize};

use storekeep_core::{DomainError, DomainResult, ProductId, StoreId, UserId};

/// A store: owned by exactly one user, selling an assigned subset of the
/// product catalog.
///
/// The product assignment is a plain relation; it is distinct from each
/// product's bill of materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    id: StoreId,
    name: String,
    owner: UserId,
    products: Vec<ProductId>,
}

impl Store {
    pub fn new(id: StoreId, name: impl Into<String>, owner: UserId) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("store name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            owner,
            products: Vec::new(),
        })
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn products(&self) -> &[ProductId] {
        &self.products
    }

    pub fn sells(&self, product_id: ProductId) -> bool {
        self.products.contains(&product_id)
    }

    /// Assign a catalog product to this store. Duplicate assignment conflicts.
    pub fn assign_product(&mut self, product_id: ProductId) -> DomainResult<()> {
        if self.sells(product_id) {
            return Err(DomainError::conflict("product already assigned to this store"));
        }
        self.products.push(product_id);
        Ok(())
    }

    pub fn unassign_product(&mut self, product_id: ProductId) -> DomainResult<()> {
        let before = self.products.len();
        self.products.retain(|p| *p != product_id);
        if self.products.len() == before {
            return Err(DomainError::not_found());
        }
        Ok(())
    }
}
