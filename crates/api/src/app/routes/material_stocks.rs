use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use storekeep_core::{DomainError, StockEntryId};
use storekeep_ledger::{NewStockEntry, StockEntry};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::StoreContext;

fn entry_dto(
    services: &AppServices,
    entry: &StockEntry,
) -> Result<dto::MaterialStockDto, DomainError> {
    let material = services.catalog_store().material(entry.material_id)?;
    Ok(dto::MaterialStockDto::from_entry(
        entry,
        material.name().to_string(),
    ))
}

/// Fetch an entry by id, scoped to the caller's store. Entries of other
/// stores are indistinguishable from missing ones.
fn scoped_entry(
    services: &AppServices,
    store: &StoreContext,
    id: StockEntryId,
) -> Result<StockEntry, DomainError> {
    let entry = services.stock_ledger().get_by_id(id)?;
    if entry.store_id != store.store_id() {
        return Err(DomainError::NotFound);
    }
    Ok(entry)
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
) -> axum::response::Response {
    let entries = match services.stock_ledger().list_for_store(store.store_id()) {
        Ok(entries) => entries,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let mut stocks = Vec::with_capacity(entries.len());
    for entry in &entries {
        match entry_dto(&services, entry) {
            Ok(dto) => stocks.push(dto),
            Err(e) => return errors::domain_error_to_response(e),
        }
    }

    (StatusCode::OK, Json(stocks)).into_response()
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
    Json(body): Json<dto::CreateMaterialStockRequest>,
) -> axum::response::Response {
    // Material must exist in the catalog before it can be stocked.
    if let Err(e) = services.catalog_store().material(body.material) {
        return errors::domain_error_to_response(e);
    }

    let created = services.stock_ledger().create(NewStockEntry {
        store_id: store.store_id(),
        material_id: body.material,
        max_capacity: body.max_capacity,
        initial_capacity: body.current_capacity,
    });

    match created {
        Ok(entry) => match entry_dto(&services, &entry) {
            Ok(dto) => (StatusCode::CREATED, Json(dto)).into_response(),
            Err(e) => errors::domain_error_to_response(e),
        },
        Err(DomainError::Conflict(_)) => errors::json_error(
            StatusCode::BAD_REQUEST,
            "conflict",
            "This material stock already exists in this store. Please use other material or update existing stock.",
        ),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_one(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: StockEntryId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid stock entry id")
        }
    };

    match scoped_entry(&services, &store, id).and_then(|entry| entry_dto(&services, &entry)) {
        Ok(dto) => (StatusCode::OK, Json(dto)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateMaterialStockRequest>,
) -> axum::response::Response {
    let id: StockEntryId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid stock entry id")
        }
    };

    if let Err(e) = scoped_entry(&services, &store, id) {
        return errors::domain_error_to_response(e);
    }

    let updated = services
        .stock_ledger()
        .set_capacities(id, body.current_capacity, body.max_capacity);

    match updated {
        Ok(entry) => match entry_dto(&services, &entry) {
            Ok(dto) => (StatusCode::OK, Json(dto)).into_response(),
            Err(e) => errors::domain_error_to_response(e),
        },
        Err(DomainError::CapacityViolation(_)) => errors::json_error(
            StatusCode::BAD_REQUEST,
            "capacity_violation",
            "Maximum capacity cannot be lower than current capacity.",
        ),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(store): Extension<StoreContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: StockEntryId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid stock entry id")
        }
    };

    match scoped_entry(&services, &store, id).and_then(|_| services.stock_ledger().delete(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
