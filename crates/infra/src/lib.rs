//! Infrastructure implementations of the repository contracts.
//!
//! The in-memory stores here back tests, the dev server, and the black-box API
//! suite. A relational implementation would satisfy the same traits with one
//! database transaction per `commit`.

pub mod memory;

pub use memory::{InMemoryCatalog, InMemoryStockLedger};
