use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::StoreContext;

/// `GET /inventory/` — the store's material stocks with percentage of
/// capacity in use.
pub async fn inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
) -> axum::response::Response {
    let entries = match services.stock_ledger().list_for_store(store.store_id()) {
        Ok(entries) => entries,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let mut materials = Vec::with_capacity(entries.len());
    for entry in &entries {
        let material = match services.catalog_store().material(entry.material_id) {
            Ok(m) => m,
            Err(e) => return errors::domain_error_to_response(e),
        };
        materials.push(dto::MaterialStockDto::from_entry(
            entry,
            material.name().to_string(),
        ));
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({ "materials": materials })),
    )
        .into_response()
}
