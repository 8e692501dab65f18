use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use storekeep_catalog::CatalogStore;
use storekeep_core::{DomainError, DomainResult, MaterialId, StoreId};
use storekeep_ledger::{StockDelta, StockEntry, StockLedger};

/// Bounded optimistic retries before a commit conflict is surfaced.
pub const MAX_COMMIT_RETRIES: u32 = 3;

/// One requested addition: (material, quantity to add).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RestockLine {
    pub material_id: MaterialId,
    pub quantity: i64,
}

/// Per-line result of an applied restock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestockedLine {
    pub material_id: MaterialId,
    pub material_name: String,
    pub quantity_added: i64,
    /// `"current/max"` after this line's addition.
    pub capacity: String,
    /// `quantity_added * material.price`.
    pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestockReceipt {
    pub lines: Vec<RestockedLine>,
    pub overall_price: Decimal,
}

/// Result of a restock request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestockOutcome {
    Applied(RestockReceipt),
    /// Fill-to-max found every entry already at max; nothing to do.
    AllFull,
}

/// A rejected line, keyed by its index in the request batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    pub index: usize,
    pub material_id: MaterialId,
    pub error: DomainError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRejection {
    pub failures: Vec<LineFailure>,
}

#[derive(Debug, Error)]
pub enum RestockError {
    /// At least one line failed validation; nothing was applied.
    #[error("restock batch rejected: {} invalid line(s)", .0.failures.len())]
    Rejected(BatchRejection),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Validates and applies batches of (material, quantity) additions.
pub struct RestockTransactor {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn StockLedger>,
}

impl RestockTransactor {
    pub fn new(catalog: Arc<dyn CatalogStore>, ledger: Arc<dyn StockLedger>) -> Self {
        Self { catalog, ledger }
    }

    /// Apply a restock batch. Empty `lines` means fill-to-max for every entry
    /// below its maximum. The whole batch is validated before any mutation;
    /// commit conflicts retry from a fresh snapshot up to
    /// [`MAX_COMMIT_RETRIES`] times.
    pub fn restock(
        &self,
        store_id: StoreId,
        lines: &[RestockLine],
    ) -> Result<RestockOutcome, RestockError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_restock(store_id, lines) {
                Err(RestockError::Domain(DomainError::Conflict(msg)))
                    if attempt < MAX_COMMIT_RETRIES =>
                {
                    warn!(%store_id, attempt, conflict = %msg, "restock commit conflict, retrying");
                }
                other => return other,
            }
        }
    }

    fn try_restock(
        &self,
        store_id: StoreId,
        lines: &[RestockLine],
    ) -> Result<RestockOutcome, RestockError> {
        // Unknown store is a request error, not an empty ledger.
        self.catalog.store(store_id)?;
        let snapshot = self.ledger.list_for_store(store_id)?;

        if lines.is_empty() {
            return self.fill_to_max(store_id, &snapshot);
        }

        let by_material: HashMap<MaterialId, &StockEntry> =
            snapshot.iter().map(|e| (e.material_id, e)).collect();

        // Validate every line before touching anything. Additions to the same
        // material accumulate so the joint result is checked, not each line
        // against the same stale level.
        let mut added: HashMap<MaterialId, i64> = HashMap::new();
        let mut failures: Vec<LineFailure> = Vec::new();
        let mut validated: Vec<(RestockLine, i64)> = Vec::new(); // line, resulting capacity

        for (index, line) in lines.iter().enumerate() {
            if line.quantity <= 0 {
                failures.push(LineFailure {
                    index,
                    material_id: line.material_id,
                    error: DomainError::validation("restock quantity must be a positive integer"),
                });
                continue;
            }
            let Some(entry) = by_material.get(&line.material_id) else {
                failures.push(LineFailure {
                    index,
                    material_id: line.material_id,
                    error: DomainError::NotFound,
                });
                continue;
            };
            let already = added.get(&line.material_id).copied().unwrap_or(0);
            let Some(sum) = already.checked_add(line.quantity) else {
                failures.push(LineFailure {
                    index,
                    material_id: line.material_id,
                    error: DomainError::validation("restock quantity is too large"),
                });
                continue;
            };
            match entry.checked_apply(sum) {
                Ok(resulting) => {
                    added.insert(line.material_id, sum);
                    validated.push((*line, resulting));
                }
                Err(error) => failures.push(LineFailure {
                    index,
                    material_id: line.material_id,
                    error,
                }),
            }
        }

        if !failures.is_empty() {
            return Err(RestockError::Rejected(BatchRejection { failures }));
        }

        // One delta per material, pinned to the snapshot versions.
        let deltas: Vec<StockDelta> = snapshot
            .iter()
            .filter_map(|entry| {
                added
                    .get(&entry.material_id)
                    .map(|&sum| StockDelta::against(entry, sum))
            })
            .collect();
        self.ledger.commit(store_id, &deltas)?;

        let receipt = self.receipt(&by_material, &validated)?;
        info!(
            %store_id,
            lines = receipt.lines.len(),
            %receipt.overall_price,
            "restock batch applied"
        );
        Ok(RestockOutcome::Applied(receipt))
    }

    /// Empty request: top up every entry below max; skip full ones silently.
    fn fill_to_max(
        &self,
        store_id: StoreId,
        snapshot: &[StockEntry],
    ) -> Result<RestockOutcome, RestockError> {
        let below_max: Vec<&StockEntry> = snapshot.iter().filter(|e| !e.is_full()).collect();
        if below_max.is_empty() {
            return Ok(RestockOutcome::AllFull);
        }

        let deltas: Vec<StockDelta> = below_max
            .iter()
            .map(|e| StockDelta::against(e, e.headroom()))
            .collect();
        let updated = self.ledger.commit(store_id, &deltas)?;

        let mut lines = Vec::with_capacity(updated.len());
        let mut overall_price = Decimal::ZERO;
        for (before, after) in below_max.iter().zip(&updated) {
            let material = self.catalog.material(before.material_id)?;
            let quantity_added = before.headroom();
            let total_price = Decimal::from(quantity_added) * material.price();
            overall_price += total_price;
            lines.push(RestockedLine {
                material_id: material.id(),
                material_name: material.name().to_string(),
                quantity_added,
                capacity: after.capacity_display(),
                total_price,
            });
        }

        info!(%store_id, lines = lines.len(), %overall_price, "fill-to-max restock applied");
        Ok(RestockOutcome::Applied(RestockReceipt {
            lines,
            overall_price,
        }))
    }

    fn receipt(
        &self,
        by_material: &HashMap<MaterialId, &StockEntry>,
        validated: &[(RestockLine, i64)],
    ) -> DomainResult<RestockReceipt> {
        let mut lines = Vec::with_capacity(validated.len());
        let mut overall_price = Decimal::ZERO;
        for (line, resulting) in validated {
            let material = self.catalog.material(line.material_id)?;
            let entry = by_material[&line.material_id];
            let total_price = Decimal::from(line.quantity) * material.price();
            overall_price += total_price;
            lines.push(RestockedLine {
                material_id: material.id(),
                material_name: material.name().to_string(),
                quantity_added: line.quantity,
                capacity: storekeep_core::capacity_display(*resulting, entry.max_capacity),
                total_price,
            });
        }
        Ok(RestockReceipt {
            lines,
            overall_price,
        })
    }
}
