//! Catalog repository interface.

use storekeep_core::{DomainResult, MaterialId, ProductId, StoreId};

use crate::{Material, Product, Store};

/// Read (plus store/product assignment) interface over the catalog.
///
/// The reconciliation engine only reads through this trait; administrative
/// catalog edits happen behind it. Implementations must return owned snapshots
/// so callers never observe a half-applied edit.
pub trait CatalogStore: Send + Sync {
    fn material(&self, id: MaterialId) -> DomainResult<Material>;

    fn product(&self, id: ProductId) -> DomainResult<Product>;

    fn store(&self, id: StoreId) -> DomainResult<Store>;

    /// Products assigned to the store, in assignment order.
    fn products_for_store(&self, store_id: StoreId) -> DomainResult<Vec<Product>>;

    /// Assign a catalog product to a store (`Conflict` when already assigned).
    fn assign_product(&self, store_id: StoreId, product_id: ProductId) -> DomainResult<()>;

    /// Remove a product assignment (`NotFound` when absent).
    fn unassign_product(&self, store_id: StoreId, product_id: ProductId) -> DomainResult<()>;
}
