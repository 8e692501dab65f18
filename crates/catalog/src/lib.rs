//! Catalog domain: materials, products (with their bill of materials), stores.
//!
//! The engine treats the catalog as a read-mostly collaborator; the objects in
//! this crate are referenced, never mutated, by the transactors.

pub mod material;
pub mod product;
pub mod repo;
pub mod store;

pub use material::Material;
pub use product::{BomLine, Product};
pub use repo::CatalogStore;
pub use store::Store;
