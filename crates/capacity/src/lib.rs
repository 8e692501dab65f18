//! Capacity projection: how many units of each product a store can produce
//! from the stock it currently holds.

pub mod projector;

pub use projector::{CapacityProjector, Producible, ProductCapacity, project_product};
