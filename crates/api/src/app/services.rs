use std::sync::Arc;

use storekeep_capacity::CapacityProjector;
use storekeep_catalog::CatalogStore;
use storekeep_infra::{InMemoryCatalog, InMemoryStockLedger};
use storekeep_ledger::StockLedger;
use storekeep_restock::RestockTransactor;
use storekeep_sales::SalesTransactor;

/// Wired repositories and transactors shared by all handlers.
///
/// The in-memory stores stand in for a relational backend; everything above
/// them only sees the `CatalogStore`/`StockLedger` traits.
pub struct AppServices {
    catalog: Arc<InMemoryCatalog>,
    ledger: Arc<InMemoryStockLedger>,
    restock: RestockTransactor,
    sales: SalesTransactor,
    projector: CapacityProjector,
}

impl AppServices {
    pub fn restock(&self) -> &RestockTransactor {
        &self.restock
    }

    pub fn sales(&self) -> &SalesTransactor {
        &self.sales
    }

    pub fn projector(&self) -> &CapacityProjector {
        &self.projector
    }

    pub fn catalog_store(&self) -> Arc<dyn CatalogStore> {
        self.catalog.clone()
    }

    pub fn stock_ledger(&self) -> Arc<dyn StockLedger> {
        self.ledger.clone()
    }

    /// Direct handle to the in-memory catalog (seeding in tests/dev).
    pub fn catalog(&self) -> &Arc<InMemoryCatalog> {
        &self.catalog
    }
}

pub fn build_services() -> AppServices {
    let catalog = Arc::new(InMemoryCatalog::new());
    let ledger = Arc::new(InMemoryStockLedger::new());

    let catalog_store: Arc<dyn CatalogStore> = catalog.clone();
    let stock_ledger: Arc<dyn StockLedger> = ledger.clone();

    AppServices {
        restock: RestockTransactor::new(catalog_store.clone(), stock_ledger.clone()),
        sales: SalesTransactor::new(catalog_store.clone(), stock_ledger.clone()),
        projector: CapacityProjector::new(catalog_store, stock_ledger),
        catalog,
        ledger,
    }
}
