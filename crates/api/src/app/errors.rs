use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storekeep_core::DomainError;

/// Map a domain error to the wire. Duplicate entries stay 400 (the source
/// surface treats them as request errors); commit conflicts that survived the
/// transactor's retries come back 409 so callers know to retry.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::CapacityViolation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "capacity_violation", msg)
        }
        DomainError::InsufficientStock(msg) => {
            json_error(StatusCode::BAD_REQUEST, "insufficient_stock", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => {
            if msg.contains("changed concurrently") {
                json_error(StatusCode::CONFLICT, "conflict", msg)
            } else {
                json_error(StatusCode::BAD_REQUEST, "conflict", msg)
            }
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
