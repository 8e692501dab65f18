use serde::{Deserialize, Serialize};

use storekeep_core::{
    capacity_display, percentage_of_capacity, DomainError, DomainResult, MaterialId, StockEntryId,
    StoreId,
};

/// Validated input for creating a stock entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStockEntry {
    pub store_id: StoreId,
    pub material_id: MaterialId,
    pub max_capacity: i64,
    pub initial_capacity: i64,
}

impl NewStockEntry {
    /// Check creation bounds. `max_capacity = 0` is rejected outright: a
    /// zero-max entry can never be restocked and degenerates the percentage
    /// computation.
    pub fn validate(&self) -> DomainResult<()> {
        if self.max_capacity <= 0 {
            return Err(DomainError::validation(
                "max_capacity must be a positive integer",
            ));
        }
        if self.initial_capacity < 0 {
            return Err(DomainError::validation(
                "initial capacity cannot be negative",
            ));
        }
        if self.initial_capacity > self.max_capacity {
            return Err(DomainError::validation(
                "initial capacity cannot exceed max_capacity",
            ));
        }
        Ok(())
    }
}

/// The capacity record for one (store, material) pair.
///
/// `version` increments on every committed mutation and backs the optimistic
/// concurrency check in batch commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub id: StockEntryId,
    pub store_id: StoreId,
    pub material_id: MaterialId,
    pub current_capacity: i64,
    pub max_capacity: i64,
    pub version: u64,
}

impl StockEntry {
    pub fn from_new(id: StockEntryId, new: &NewStockEntry) -> DomainResult<Self> {
        new.validate()?;
        Ok(Self {
            id,
            store_id: new.store_id,
            material_id: new.material_id,
            current_capacity: new.initial_capacity,
            max_capacity: new.max_capacity,
            version: 0,
        })
    }

    /// Capacity still available before the entry is full.
    pub fn headroom(&self) -> i64 {
        self.max_capacity - self.current_capacity
    }

    pub fn is_full(&self) -> bool {
        self.current_capacity == self.max_capacity
    }

    /// Resulting capacity after `delta`, or the invariant breach that stops it.
    ///
    /// A negative result maps to `InsufficientStock` (a sale dipping below
    /// zero), an overshoot past `max_capacity` to `CapacityViolation`. Deltas
    /// large enough to overflow the addition itself breach the same bound the
    /// sign says they would.
    pub fn checked_apply(&self, delta: i64) -> DomainResult<i64> {
        let next = match self.current_capacity.checked_add(delta) {
            Some(next) => next,
            None if delta < 0 => {
                return Err(DomainError::insufficient(format!(
                    "material {}: requires {}, only {} in stock",
                    self.material_id,
                    delta.unsigned_abs(),
                    self.current_capacity
                )))
            }
            None => {
                return Err(DomainError::capacity(format!(
                    "material {}: adding {} exceeds max capacity {}",
                    self.material_id, delta, self.max_capacity
                )))
            }
        };
        if next < 0 {
            return Err(DomainError::insufficient(format!(
                "material {}: requires {}, only {} in stock",
                self.material_id,
                delta.unsigned_abs(),
                self.current_capacity
            )));
        }
        if next > self.max_capacity {
            return Err(DomainError::capacity(format!(
                "material {}: {} exceeds max capacity {}",
                self.material_id, next, self.max_capacity
            )));
        }
        Ok(next)
    }

    /// Raise or lower `max_capacity`, refusing to strand current stock.
    pub fn with_max_capacity(&self, new_max: i64) -> DomainResult<Self> {
        if new_max < self.current_capacity {
            return Err(DomainError::capacity(
                "Maximum capacity cannot be lower than current capacity.",
            ));
        }
        let mut updated = self.clone();
        updated.max_capacity = new_max;
        updated.version += 1;
        Ok(updated)
    }

    pub fn capacity_display(&self) -> String {
        capacity_display(self.current_capacity, self.max_capacity)
    }

    pub fn percentage_of_capacity(&self) -> f64 {
        percentage_of_capacity(self.current_capacity, self.max_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(current: i64, max: i64) -> StockEntry {
        StockEntry {
            id: StockEntryId::new(),
            store_id: StoreId::new(),
            material_id: MaterialId::new(),
            current_capacity: current,
            max_capacity: max,
            version: 0,
        }
    }

    #[test]
    fn create_rejects_zero_max_capacity() {
        let new = NewStockEntry {
            store_id: StoreId::new(),
            material_id: MaterialId::new(),
            max_capacity: 0,
            initial_capacity: 0,
        };
        assert!(matches!(new.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn create_rejects_initial_above_max() {
        let new = NewStockEntry {
            store_id: StoreId::new(),
            material_id: MaterialId::new(),
            max_capacity: 10,
            initial_capacity: 11,
        };
        assert!(matches!(new.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn apply_within_bounds() {
        assert_eq!(entry(200, 1000).checked_apply(20).unwrap(), 220);
        assert_eq!(entry(500, 1000).checked_apply(-500).unwrap(), 0);
    }

    #[test]
    fn apply_below_zero_is_insufficient_stock() {
        let err = entry(2, 1000).checked_apply(-10).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock(_)));
    }

    #[test]
    fn apply_above_max_is_capacity_violation() {
        let err = entry(990, 1000).checked_apply(20).unwrap_err();
        assert!(matches!(err, DomainError::CapacityViolation(_)));
    }

    #[test]
    fn overflowing_delta_is_a_bounds_error() {
        let err = entry(10, 1000).checked_apply(i64::MAX).unwrap_err();
        assert!(matches!(err, DomainError::CapacityViolation(_)));
        let err = entry(0, 1000).checked_apply(i64::MIN).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock(_)));
    }

    #[test]
    fn shrinking_max_below_current_is_refused() {
        let err = entry(50, 100).with_max_capacity(40).unwrap_err();
        assert!(matches!(err, DomainError::CapacityViolation(_)));
        // Raising is fine and bumps the version.
        let updated = entry(50, 100).with_max_capacity(200).unwrap();
        assert_eq!(updated.max_capacity, 200);
        assert_eq!(updated.version, 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: applying any sequence of deltas, keeping only the
            /// accepted ones, never leaves the entry outside [0, max].
            #[test]
            fn accepted_deltas_never_break_bounds(
                max in 1i64..10_000,
                deltas in prop::collection::vec(-5_000i64..5_000, 0..50)
            ) {
                let mut e = entry(0, max);
                for delta in deltas {
                    match e.checked_apply(delta) {
                        Ok(next) => {
                            e.current_capacity = next;
                            e.version += 1;
                        }
                        Err(_) => {
                            // Rejected delta leaves state untouched.
                        }
                    }
                    prop_assert!(e.current_capacity >= 0);
                    prop_assert!(e.current_capacity <= e.max_capacity);
                }
            }
        }
    }
}
