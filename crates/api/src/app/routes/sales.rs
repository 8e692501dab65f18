use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use storekeep_sales::{SaleLine, SalesError};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::StoreContext;

/// `GET /sales/` — products sellable in this store (catalog pass-through).
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
) -> axum::response::Response {
    match services.catalog_store().products_for_store(store.store_id()) {
        Ok(products) => {
            let products: Vec<dto::ProductDto> = products.iter().map(Into::into).collect();
            (
                StatusCode::OK,
                Json(serde_json::json!({ "products": products })),
            )
                .into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// `POST /sales/` and `POST /multisales/` — validate-then-commit a sale batch.
pub async fn sell(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
    Json(body): Json<dto::SalesRequest>,
) -> axum::response::Response {
    let lines: Vec<SaleLine> = body
        .sales
        .iter()
        .map(|l| SaleLine {
            product_id: l.product_id,
            quantity: l.quantity,
        })
        .collect();

    match services.sales().sell(store.store_id(), &lines) {
        Ok(receipt) => {
            (StatusCode::OK, Json(dto::SalesResponse::from(receipt))).into_response()
        }
        Err(SalesError::Rejected(rejection)) => {
            let sales: Vec<dto::LineFailureDetail> = rejection
                .failures
                .iter()
                .map(|f| dto::LineFailureDetail {
                    index: f.index,
                    id: f.product_id.to_string(),
                    detail: dto::failure_detail(&f.error),
                })
                .collect();
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "Sales request failed due to invalid data. Please review the following list of invalid sales",
                    "sales": sales,
                })),
            )
                .into_response()
        }
        Err(SalesError::Domain(e)) => errors::domain_error_to_response(e),
    }
}
