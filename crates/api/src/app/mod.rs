//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository/transactor wiring
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<services::AppServices>) -> Router {
    let store_state = middleware::StoreState {
        catalog: services.catalog_store(),
    };

    // Store-scoped routes: require a resolvable x-store-id header.
    let scoped = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            store_state,
            middleware::store_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(scoped)
}
