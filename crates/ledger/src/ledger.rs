//! Stock ledger repository contract.

use storekeep_core::{DomainResult, MaterialId, StockEntryId, StoreId};

use crate::entry::{NewStockEntry, StockEntry};

/// One line of a batch commit: a signed capacity change against an entry read
/// from the same snapshot that `expected_version` was taken from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StockDelta {
    pub entry_id: StockEntryId,
    pub delta: i64,
    pub expected_version: u64,
}

impl StockDelta {
    /// Build a delta pinned to the snapshot the entry was read from.
    pub fn against(entry: &StockEntry, delta: i64) -> Self {
        Self {
            entry_id: entry.id,
            delta,
            expected_version: entry.version,
        }
    }
}

/// The mapping (store, material) -> capacity record, with batch mutation.
///
/// `commit` is the only write path the transactors use. It must be atomic:
/// every version and capacity bound is checked before any entry changes, and a
/// stale `expected_version` fails the whole batch with `Conflict` so the
/// caller can re-read and retry. That serializes concurrent sales/restocks
/// touching the same rows without a time-of-check/time-of-use window.
pub trait StockLedger: Send + Sync {
    fn get(&self, store_id: StoreId, material_id: MaterialId) -> DomainResult<StockEntry>;

    fn get_by_id(&self, id: StockEntryId) -> DomainResult<StockEntry>;

    /// All entries of a store, in creation order.
    fn list_for_store(&self, store_id: StoreId) -> DomainResult<Vec<StockEntry>>;

    /// Create an entry (`Conflict` when the (store, material) pair exists,
    /// `Validation` for out-of-range capacities).
    fn create(&self, new: NewStockEntry) -> DomainResult<StockEntry>;

    /// Update capacities directly (stock-entry CRUD). `CapacityViolation` when
    /// the result would strand stock above its max.
    fn set_capacities(
        &self,
        id: StockEntryId,
        current_capacity: Option<i64>,
        max_capacity: Option<i64>,
    ) -> DomainResult<StockEntry>;

    fn delete(&self, id: StockEntryId) -> DomainResult<()>;

    /// Apply a validated batch of deltas atomically. Returns the updated
    /// entries in batch order. On any error, no entry is modified.
    fn commit(&self, store_id: StoreId, deltas: &[StockDelta]) -> DomainResult<Vec<StockEntry>>;
}
