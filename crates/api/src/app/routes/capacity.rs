use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::StoreContext;

/// `GET /product-capacity/` — producible units per assigned product, with the
/// limiting material.
pub async fn product_capacity(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
) -> axum::response::Response {
    match services.projector().project_store(store.store_id()) {
        Ok(capacities) => (
            StatusCode::OK,
            Json(serde_json::json!({ "products": capacities })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
