use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use storekeep_catalog::{CatalogStore, Product};
use storekeep_core::{DomainResult, MaterialId, StoreId};
use storekeep_ledger::StockLedger;

/// Producible quantity for one product, or the distinct empty-BOM case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Producible {
    /// The classic bottleneck result.
    Bounded {
        quantity: i64,
        limiting_material: MaterialId,
        /// Stock currently available for the limiting material.
        available: i64,
        /// Per-unit requirement of the limiting material.
        required_per_unit: i64,
    },
    /// A product with an empty bill of materials consumes nothing; reporting
    /// it as 0 would be wrong, so it gets its own case.
    Unconstrained,
}

/// Projection result for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCapacity {
    pub product_id: storekeep_core::ProductId,
    pub product_name: String,
    pub producible: Producible,
}

/// Project one product against summed per-material availability.
///
/// Pure function: `available` maps material -> summed current capacity across
/// the store's entries for that material (absent means 0). The limiting
/// material is the argmin over BOM lines; ties break to the first-encountered
/// line in bill-of-materials order.
pub fn project_product(
    product: &Product,
    available: &HashMap<MaterialId, i64>,
) -> ProductCapacity {
    if product.has_empty_bom() {
        return ProductCapacity {
            product_id: product.id(),
            product_name: product.name().to_string(),
            producible: Producible::Unconstrained,
        };
    }

    let mut best: Option<(i64, MaterialId, i64, i64)> = None;
    for line in product.bom() {
        let stock = available.get(&line.material_id).copied().unwrap_or(0);
        let producible = stock / line.quantity_per_unit;
        // Strict less-than keeps the first-encountered line on ties.
        if best.map_or(true, |(q, ..)| producible < q) {
            best = Some((producible, line.material_id, stock, line.quantity_per_unit));
        }
    }

    // BOM is non-empty here, so `best` is always set.
    let (quantity, limiting_material, available, required_per_unit) =
        best.unwrap_or((0, product.bom()[0].material_id, 0, 1));

    ProductCapacity {
        product_id: product.id(),
        product_name: product.name().to_string(),
        producible: Producible::Bounded {
            quantity,
            limiting_material,
            available,
            required_per_unit,
        },
    }
}

/// Read-only projector over the catalog and the stock ledger.
pub struct CapacityProjector {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn StockLedger>,
}

impl CapacityProjector {
    pub fn new(catalog: Arc<dyn CatalogStore>, ledger: Arc<dyn StockLedger>) -> Self {
        Self { catalog, ledger }
    }

    /// Capacity projection for every product assigned to the store.
    pub fn project_store(&self, store_id: StoreId) -> DomainResult<Vec<ProductCapacity>> {
        let products = self.catalog.products_for_store(store_id)?;
        let available = self.available_by_material(store_id)?;
        Ok(products
            .iter()
            .map(|p| project_product(p, &available))
            .collect())
    }

    /// Sum current capacity per material across the store's entries. Normally
    /// one entry per material, but historical duplicates aggregate.
    fn available_by_material(&self, store_id: StoreId) -> DomainResult<HashMap<MaterialId, i64>> {
        let mut available: HashMap<MaterialId, i64> = HashMap::new();
        for entry in self.ledger.list_for_store(store_id)? {
            *available.entry(entry.material_id).or_insert(0) += entry.current_capacity;
        }
        Ok(available)
    }
}
