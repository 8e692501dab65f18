use std::sync::RwLock;

use storekeep_core::{DomainError, DomainResult, MaterialId, StockEntryId, StoreId};
use storekeep_ledger::{NewStockEntry, StockDelta, StockEntry, StockLedger};

/// In-memory stock ledger with optimistic concurrency.
///
/// `commit` takes the write lock once, so validation and mutation observe the
/// same snapshot; stale `expected_version`s surface as `Conflict` for the
/// transactors to retry from a fresh read.
#[derive(Debug, Default)]
pub struct InMemoryStockLedger {
    // Creation order preserved; scans are fine at this scale.
    entries: RwLock<Vec<StockEntry>>,
}

fn poisoned(_: impl core::fmt::Debug) -> DomainError {
    DomainError::conflict("stock ledger lock poisoned")
}

impl InMemoryStockLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StockLedger for InMemoryStockLedger {
    fn get(&self, store_id: StoreId, material_id: MaterialId) -> DomainResult<StockEntry> {
        let entries = self.entries.read().map_err(poisoned)?;
        entries
            .iter()
            .find(|e| e.store_id == store_id && e.material_id == material_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    fn get_by_id(&self, id: StockEntryId) -> DomainResult<StockEntry> {
        let entries = self.entries.read().map_err(poisoned)?;
        entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    fn list_for_store(&self, store_id: StoreId) -> DomainResult<Vec<StockEntry>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .iter()
            .filter(|e| e.store_id == store_id)
            .cloned()
            .collect())
    }

    fn create(&self, new: NewStockEntry) -> DomainResult<StockEntry> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        if entries
            .iter()
            .any(|e| e.store_id == new.store_id && e.material_id == new.material_id)
        {
            return Err(DomainError::conflict(
                "material stock already exists in this store",
            ));
        }
        let entry = StockEntry::from_new(StockEntryId::new(), &new)?;
        entries.push(entry.clone());
        Ok(entry)
    }

    fn set_capacities(
        &self,
        id: StockEntryId,
        current_capacity: Option<i64>,
        max_capacity: Option<i64>,
    ) -> DomainResult<StockEntry> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(DomainError::NotFound)?;

        let current = current_capacity.unwrap_or(entry.current_capacity);
        let max = max_capacity.unwrap_or(entry.max_capacity);
        if current < 0 {
            return Err(DomainError::validation("current capacity cannot be negative"));
        }
        if max <= 0 {
            return Err(DomainError::validation("max_capacity must be a positive integer"));
        }
        if max < current {
            return Err(DomainError::capacity(
                "Maximum capacity cannot be lower than current capacity.",
            ));
        }

        entry.current_capacity = current;
        entry.max_capacity = max;
        entry.version += 1;
        Ok(entry.clone())
    }

    fn delete(&self, id: StockEntryId) -> DomainResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn commit(&self, store_id: StoreId, deltas: &[StockDelta]) -> DomainResult<Vec<StockEntry>> {
        let mut entries = self.entries.write().map_err(poisoned)?;

        // Validate the whole batch against scratch copies before touching the
        // shared state, so a failing line leaves nothing half-applied.
        let mut staged: Vec<(usize, StockEntry)> = Vec::with_capacity(deltas.len());
        for delta in deltas {
            let idx = entries
                .iter()
                .position(|e| e.id == delta.entry_id && e.store_id == store_id)
                .ok_or(DomainError::NotFound)?;
            if entries[idx].version != delta.expected_version {
                return Err(DomainError::conflict(format!(
                    "stock entry {} changed concurrently",
                    delta.entry_id
                )));
            }
            // Same entry twice in one batch composes through the staged copy.
            let base = staged
                .iter()
                .rev()
                .find(|(i, _)| *i == idx)
                .map(|(_, e)| e.clone())
                .unwrap_or_else(|| entries[idx].clone());
            let mut next = base;
            next.current_capacity = next.checked_apply(delta.delta)?;
            next.version += 1;
            staged.push((idx, next));
        }

        let mut updated = Vec::with_capacity(staged.len());
        for (idx, next) in staged {
            entries[idx] = next.clone();
            updated.push(next);
        }
        Ok(updated)
    }
}
