use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use storekeep_catalog::CatalogStore;
use storekeep_core::StoreId;

use crate::context::StoreContext;

pub const STORE_HEADER: &str = "x-store-id";

#[derive(Clone)]
pub struct StoreState {
    pub catalog: Arc<dyn CatalogStore>,
}

/// Resolve the `x-store-id` header into a [`StoreContext`].
///
/// Missing or malformed header: 401. Header naming a store the catalog does
/// not know: 404.
pub async fn store_middleware(
    State(state): State<StoreState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let store_id = extract_store_id(req.headers())?;

    state
        .catalog
        .store(store_id)
        .map_err(|_| StatusCode::NOT_FOUND)?;

    req.extensions_mut().insert(StoreContext::new(store_id));

    Ok(next.run(req).await)
}

fn extract_store_id(headers: &HeaderMap) -> Result<StoreId, StatusCode> {
    let header = headers
        .get(STORE_HEADER)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    header
        .trim()
        .parse::<StoreId>()
        .map_err(|_| StatusCode::UNAUTHORIZED)
}
