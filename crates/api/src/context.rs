use storekeep_core::StoreId;

/// Store context for a request.
///
/// Every engine operation is scoped to one store; the middleware resolves the
/// `x-store-id` header into this extension so handlers never reach for an
/// ambient "current store".
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StoreContext {
    store_id: StoreId,
}

impl StoreContext {
    pub fn new(store_id: StoreId) -> Self {
        Self { store_id }
    }

    pub fn store_id(&self) -> StoreId {
        self.store_id
    }
}
