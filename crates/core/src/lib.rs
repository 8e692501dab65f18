//! `storekeep-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod capacity;
pub mod error;
pub mod id;

pub use capacity::{capacity_display, percentage_of_capacity};
pub use error::{DomainError, DomainResult};
pub use id::{MaterialId, ProductId, StockEntryId, StoreId, UserId};
