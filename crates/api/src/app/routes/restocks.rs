use std::sync::Arc;

use axum::{body::Bytes, extract::Extension, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;

use storekeep_core::DomainError;
use storekeep_restock::{RestockError, RestockLine, RestockOutcome};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::StoreContext;

/// `GET /restocks/` — what a fill-to-max restock would cost, per material.
/// 204 when every stock is already full.
pub async fn preview(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
) -> axum::response::Response {
    let ledger = services.stock_ledger();
    let catalog = services.catalog_store();

    let entries = match ledger.list_for_store(store.store_id()) {
        Ok(entries) => entries,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let mut materials = Vec::new();
    let mut overall_price = Decimal::ZERO;
    for entry in entries.iter().filter(|e| !e.is_full()) {
        let material = match catalog.material(entry.material_id) {
            Ok(m) => m,
            Err(e) => return errors::domain_error_to_response(e),
        };
        let restock_quantity = entry.headroom();
        let total_price = Decimal::from(restock_quantity) * material.price();
        overall_price += total_price;
        materials.push(dto::RestockPreviewLine {
            material: material.id(),
            material_name: material.name().to_string(),
            price: material.price(),
            restock_quantity,
            current_capacity: entry.capacity_display(),
            total_price,
        });
    }

    if materials.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    (
        StatusCode::OK,
        Json(dto::RestockPreviewResponse {
            materials,
            overall_price,
        }),
    )
        .into_response()
}

/// `POST /restocks/` — empty body (or empty `materials`) fills every stock to
/// max; otherwise applies the targeted batch.
///
/// The body is read raw: an absent body is the fill-to-max request, but a
/// present body that fails to parse must be a 400, never a fill-to-max.
pub async fn restock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
    body: Bytes,
) -> axum::response::Response {
    let request: dto::RestockRequest = if body.iter().all(u8::is_ascii_whitespace) {
        dto::RestockRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    format!("malformed request body: {e}"),
                )
            }
        }
    };
    let lines: Vec<RestockLine> = request
        .materials
        .iter()
        .map(|l| RestockLine {
            material_id: l.material,
            quantity: l.quantity,
        })
        .collect();

    match services.restock().restock(store.store_id(), &lines) {
        Ok(RestockOutcome::Applied(receipt)) => {
            (StatusCode::OK, Json(dto::RestockResponse::from(receipt))).into_response()
        }
        Ok(RestockOutcome::AllFull) => StatusCode::NO_CONTENT.into_response(),
        Err(RestockError::Rejected(rejection)) => rejection_response(rejection),
        Err(RestockError::Domain(e)) => errors::domain_error_to_response(e),
    }
}

fn rejection_response(rejection: storekeep_restock::BatchRejection) -> axum::response::Response {
    // A line naming a stock the store does not have is a 404, matching the
    // surface contract; everything else is a 400 with the per-line list.
    if rejection
        .failures
        .iter()
        .any(|f| f.error == DomainError::NotFound)
    {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "Material stock not found.");
    }

    let materials: Vec<dto::LineFailureDetail> = rejection
        .failures
        .iter()
        .map(|f| dto::LineFailureDetail {
            index: f.index,
            id: f.material_id.to_string(),
            detail: dto::failure_detail(&f.error),
        })
        .collect();

    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": "Restocks request failed due to invalid data. Please review the following list of invalid restock",
            "materials": materials,
        })),
    )
        .into_response()
}
