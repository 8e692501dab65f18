//! Stock ledger: the capacity record per (store, material) pair and the
//! repository contract every mutation goes through.
//!
//! All batch mutations are validate-all-then-commit-all; the invariant
//! `0 <= current_capacity <= max_capacity` holds after every operation,
//! including failed ones.

pub mod entry;
pub mod ledger;

pub use entry::{NewStockEntry, StockEntry};
pub use ledger::{StockDelta, StockLedger};
