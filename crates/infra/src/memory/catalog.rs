use std::collections::HashMap;
use std::sync::RwLock;

use storekeep_catalog::{CatalogStore, Material, Product, Store};
use storekeep_core::{DomainError, DomainResult, MaterialId, ProductId, StoreId};

#[derive(Debug, Default)]
struct CatalogState {
    materials: HashMap<MaterialId, Material>,
    products: HashMap<ProductId, Product>,
    stores: HashMap<StoreId, Store>,
}

/// In-memory catalog.
///
/// The `insert_*` methods are the administrative edit surface (uniqueness is
/// the only invariant there); the engine reads through [`CatalogStore`].
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

fn poisoned(_: impl core::fmt::Debug) -> DomainError {
    DomainError::conflict("catalog lock poisoned")
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_material(&self, material: Material) -> DomainResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.materials.contains_key(&material.id()) {
            return Err(DomainError::conflict("material already exists"));
        }
        state.materials.insert(material.id(), material);
        Ok(())
    }

    pub fn insert_product(&self, product: Product) -> DomainResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.products.contains_key(&product.id()) {
            return Err(DomainError::conflict("product already exists"));
        }
        state.products.insert(product.id(), product);
        Ok(())
    }

    pub fn insert_store(&self, store: Store) -> DomainResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.stores.contains_key(&store.id()) {
            return Err(DomainError::conflict("store already exists"));
        }
        // One store per owning user.
        if state.stores.values().any(|s| s.owner() == store.owner()) {
            return Err(DomainError::conflict("user already owns a store"));
        }
        state.stores.insert(store.id(), store);
        Ok(())
    }
}

impl CatalogStore for InMemoryCatalog {
    fn material(&self, id: MaterialId) -> DomainResult<Material> {
        let state = self.state.read().map_err(poisoned)?;
        state.materials.get(&id).cloned().ok_or(DomainError::NotFound)
    }

    fn product(&self, id: ProductId) -> DomainResult<Product> {
        let state = self.state.read().map_err(poisoned)?;
        state.products.get(&id).cloned().ok_or(DomainError::NotFound)
    }

    fn store(&self, id: StoreId) -> DomainResult<Store> {
        let state = self.state.read().map_err(poisoned)?;
        state.stores.get(&id).cloned().ok_or(DomainError::NotFound)
    }

    fn products_for_store(&self, store_id: StoreId) -> DomainResult<Vec<Product>> {
        let state = self.state.read().map_err(poisoned)?;
        let store = state.stores.get(&store_id).ok_or(DomainError::NotFound)?;
        store
            .products()
            .iter()
            .map(|pid| {
                state
                    .products
                    .get(pid)
                    .cloned()
                    .ok_or(DomainError::NotFound)
            })
            .collect()
    }

    fn assign_product(&self, store_id: StoreId, product_id: ProductId) -> DomainResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.products.contains_key(&product_id) {
            return Err(DomainError::NotFound);
        }
        let store = state.stores.get_mut(&store_id).ok_or(DomainError::NotFound)?;
        store.assign_product(product_id)
    }

    fn unassign_product(&self, store_id: StoreId, product_id: ProductId) -> DomainResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let store = state.stores.get_mut(&store_id).ok_or(DomainError::NotFound)?;
        store.unassign_product(product_id)
    }
}
