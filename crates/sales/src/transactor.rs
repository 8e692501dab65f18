use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use storekeep_catalog::CatalogStore;
use storekeep_core::{DomainError, MaterialId, ProductId, StockEntryId, StoreId};
use storekeep_ledger::{StockDelta, StockEntry, StockLedger};

/// Bounded optimistic retries before a commit conflict is surfaced.
pub const MAX_COMMIT_RETRIES: u32 = 3;

/// One requested sale: (product, units sold).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SaleLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// One reported stock mutation. Products sharing a material merge into a
/// single deduction, keyed by the stock entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialDeduction {
    pub entry_id: StockEntryId,
    pub material_id: MaterialId,
    pub material_name: String,
    pub total_subtracted: i64,
    /// `"current/max"` after the whole batch.
    pub remaining: String,
}

/// Successful sale batch: deductions in first-touch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesReceipt {
    pub deductions: Vec<MaterialDeduction>,
}

/// A rejected line, keyed by its index in the request batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLineFailure {
    pub index: usize,
    pub product_id: ProductId,
    pub error: DomainError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRejection {
    pub failures: Vec<SaleLineFailure>,
}

#[derive(Debug, Error)]
pub enum SalesError {
    /// At least one line failed validation; nothing was applied.
    #[error("sales batch rejected: {} invalid line(s)", .0.failures.len())]
    Rejected(SalesRejection),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Per-material requirement accumulated across the whole batch, in first-touch
/// order, remembering which lines consume it for failure attribution.
#[derive(Debug)]
struct Requirement {
    material_id: MaterialId,
    total: i64,
    consumers: Vec<(usize, ProductId)>,
}

/// Validates and applies batches of (product, quantity) consumptions.
pub struct SalesTransactor {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn StockLedger>,
}

impl SalesTransactor {
    pub fn new(catalog: Arc<dyn CatalogStore>, ledger: Arc<dyn StockLedger>) -> Self {
        Self { catalog, ledger }
    }

    /// Apply a sale batch. Every line of every sale is validated, and every
    /// material's requirement summed across the batch, before any deduction is
    /// committed. Commit conflicts retry from a fresh snapshot up to
    /// [`MAX_COMMIT_RETRIES`] times.
    pub fn sell(&self, store_id: StoreId, lines: &[SaleLine]) -> Result<SalesReceipt, SalesError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_sell(store_id, lines) {
                Err(SalesError::Domain(DomainError::Conflict(msg)))
                    if attempt < MAX_COMMIT_RETRIES =>
                {
                    warn!(%store_id, attempt, conflict = %msg, "sale commit conflict, retrying");
                }
                other => return other,
            }
        }
    }

    fn try_sell(&self, store_id: StoreId, lines: &[SaleLine]) -> Result<SalesReceipt, SalesError> {
        self.catalog.store(store_id)?;
        if lines.is_empty() {
            return Err(SalesError::Domain(DomainError::validation(
                "sales batch cannot be empty",
            )));
        }

        let snapshot = self.ledger.list_for_store(store_id)?;
        let by_material: HashMap<MaterialId, &StockEntry> =
            snapshot.iter().map(|e| (e.material_id, e)).collect();

        let mut failures: Vec<SaleLineFailure> = Vec::new();
        let mut requirements: Vec<Requirement> = Vec::new();
        let mut requirement_index: HashMap<MaterialId, usize> = HashMap::new();

        // Pass 1: expand each product through its bill of materials and
        // accumulate required-per-material across the whole batch.
        for (index, line) in lines.iter().enumerate() {
            if line.quantity <= 0 {
                failures.push(SaleLineFailure {
                    index,
                    product_id: line.product_id,
                    error: DomainError::validation("sale quantity must be a positive integer"),
                });
                continue;
            }
            let product = match self.catalog.product(line.product_id) {
                Ok(p) => p,
                Err(DomainError::NotFound) => {
                    failures.push(SaleLineFailure {
                        index,
                        product_id: line.product_id,
                        error: DomainError::validation("Invalid product id"),
                    });
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            for bom_line in product.bom() {
                if !by_material.contains_key(&bom_line.material_id) {
                    failures.push(SaleLineFailure {
                        index,
                        product_id: line.product_id,
                        error: DomainError::validation(
                            "Store does not have the required material in stock",
                        ),
                    });
                    continue;
                }
                let Some(required) = bom_line.quantity_per_unit.checked_mul(line.quantity) else {
                    failures.push(SaleLineFailure {
                        index,
                        product_id: line.product_id,
                        error: DomainError::validation("sale quantity is too large"),
                    });
                    continue;
                };
                match requirement_index.get(&bom_line.material_id) {
                    Some(&slot) => {
                        let Some(total) = requirements[slot].total.checked_add(required) else {
                            failures.push(SaleLineFailure {
                                index,
                                product_id: line.product_id,
                                error: DomainError::validation("sale quantity is too large"),
                            });
                            continue;
                        };
                        requirements[slot].total = total;
                        requirements[slot].consumers.push((index, line.product_id));
                    }
                    None => {
                        requirement_index.insert(bom_line.material_id, requirements.len());
                        requirements.push(Requirement {
                            material_id: bom_line.material_id,
                            total: required,
                            consumers: vec![(index, line.product_id)],
                        });
                    }
                }
            }
        }

        // Pass 2: the joint check. Two products consuming the same material
        // must have their requirements summed before comparison, otherwise a
        // later line dips into capacity an earlier line already passed on.
        for req in &requirements {
            let entry = by_material[&req.material_id];
            if req.total > entry.current_capacity {
                let error = DomainError::insufficient(format!(
                    "material {}: batch requires {}, only {} in stock",
                    req.material_id, req.total, entry.current_capacity
                ));
                for &(index, product_id) in &req.consumers {
                    failures.push(SaleLineFailure {
                        index,
                        product_id,
                        error: error.clone(),
                    });
                }
            }
        }

        if !failures.is_empty() {
            failures.sort_by_key(|f| f.index);
            return Err(SalesError::Rejected(SalesRejection { failures }));
        }

        let deltas: Vec<StockDelta> = requirements
            .iter()
            .map(|req| StockDelta::against(by_material[&req.material_id], -req.total))
            .collect();
        let updated = self.ledger.commit(store_id, &deltas)?;

        let mut deductions = Vec::with_capacity(requirements.len());
        for (req, entry) in requirements.iter().zip(&updated) {
            let material = self.catalog.material(req.material_id)?;
            deductions.push(MaterialDeduction {
                entry_id: entry.id,
                material_id: req.material_id,
                material_name: material.name().to_string(),
                total_subtracted: req.total,
                remaining: entry.capacity_display(),
            });
        }

        info!(
            %store_id,
            sales = lines.len(),
            materials = deductions.len(),
            "sale batch applied"
        );
        Ok(SalesReceipt { deductions })
    }
}
