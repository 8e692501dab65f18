use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use storekeep_core::{DomainError, ProductId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::StoreContext;

/// `POST /products/` — assign a catalog product to the caller's store.
pub async fn assign(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
    Json(body): Json<dto::AssignProductRequest>,
) -> axum::response::Response {
    let catalog = services.catalog_store();

    match catalog.assign_product(store.store_id(), body.product_id) {
        Ok(()) => {
            let product = match catalog.product(body.product_id) {
                Ok(p) => p,
                Err(e) => return errors::domain_error_to_response(e),
            };
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "success": "Product has been assigned to this store",
                    "product": dto::ProductDto::from(&product),
                })),
            )
                .into_response()
        }
        Err(DomainError::Conflict(_)) => errors::json_error(
            StatusCode::BAD_REQUEST,
            "conflict",
            "Product already assigned to this store",
        ),
        Err(DomainError::NotFound) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "Product does not exist")
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// `DELETE /products/{id}` — remove a product assignment.
pub async fn unassign(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match services
        .catalog_store()
        .unassign_product(store.store_id(), product_id)
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
