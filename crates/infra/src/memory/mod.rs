//! In-memory repositories (tests/dev). Not optimized for performance.

mod catalog;
mod stock;

pub use catalog::InMemoryCatalog;
pub use stock::InMemoryStockLedger;
