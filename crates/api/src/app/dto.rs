use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storekeep_catalog::Product;
use storekeep_core::{DomainError, MaterialId, ProductId, StockEntryId};
use storekeep_ledger::StockEntry;
use storekeep_restock::{RestockReceipt, RestockedLine};
use storekeep_sales::{MaterialDeduction, SalesReceipt};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct RestockRequest {
    /// Absent or empty means fill-to-max.
    #[serde(default)]
    pub materials: Vec<RestockLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct RestockLineRequest {
    pub material: MaterialId,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct SalesRequest {
    pub sales: Vec<SaleLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct SaleLineRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateMaterialStockRequest {
    pub material: MaterialId,
    pub current_capacity: i64,
    pub max_capacity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMaterialStockRequest {
    pub current_capacity: Option<i64>,
    pub max_capacity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AssignProductRequest {
    pub product_id: ProductId,
}

// -------------------------
// Response DTOs
// -------------------------

/// One line of the restock preview (`GET /restocks/`).
#[derive(Debug, Serialize)]
pub struct RestockPreviewLine {
    pub material: MaterialId,
    pub material_name: String,
    pub price: Decimal,
    #[serde(rename = "restock quantity")]
    pub restock_quantity: i64,
    /// `"current/max"`.
    pub current_capacity: String,
    pub total_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct RestockPreviewResponse {
    pub materials: Vec<RestockPreviewLine>,
    pub overall_price: Decimal,
}

/// One line of an applied restock (`POST /restocks/`).
#[derive(Debug, Serialize)]
pub struct RestockAppliedLine {
    pub material: MaterialId,
    pub material_name: String,
    pub quantity: i64,
    pub capacity: String,
    pub total_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct RestockResponse {
    pub materials: Vec<RestockAppliedLine>,
    pub overall_price: Decimal,
}

impl From<RestockReceipt> for RestockResponse {
    fn from(receipt: RestockReceipt) -> Self {
        Self {
            materials: receipt.lines.into_iter().map(Into::into).collect(),
            overall_price: receipt.overall_price,
        }
    }
}

impl From<RestockedLine> for RestockAppliedLine {
    fn from(line: RestockedLine) -> Self {
        Self {
            material: line.material_id,
            material_name: line.material_name,
            quantity: line.quantity_added,
            capacity: line.capacity,
            total_price: line.total_price,
        }
    }
}

/// Per-line failure detail for rejected batches.
#[derive(Debug, Serialize)]
pub struct LineFailureDetail {
    pub index: usize,
    pub id: String,
    pub detail: String,
}

/// One merged stock mutation of an applied sale.
#[derive(Debug, Serialize)]
pub struct UpdatedMaterialStock {
    pub id: StockEntryId,
    pub material: String,
    pub total_subtracted_capacity: i64,
    #[serde(rename = "remaining capacity")]
    pub remaining_capacity: String,
}

#[derive(Debug, Serialize)]
pub struct SalesResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "updated material stocks")]
    pub updated_material_stocks: Vec<UpdatedMaterialStock>,
}

impl From<SalesReceipt> for SalesResponse {
    fn from(receipt: SalesReceipt) -> Self {
        Self {
            success: true,
            message: "Material stocks subtracted successfully".to_string(),
            updated_material_stocks: receipt.deductions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<MaterialDeduction> for UpdatedMaterialStock {
    fn from(deduction: MaterialDeduction) -> Self {
        Self {
            id: deduction.entry_id,
            material: deduction.material_name,
            total_subtracted_capacity: deduction.total_subtracted,
            remaining_capacity: deduction.remaining,
        }
    }
}

/// Stock entry as exposed by the material-stocks CRUD and inventory listing.
#[derive(Debug, Serialize)]
pub struct MaterialStockDto {
    pub id: StockEntryId,
    pub material: MaterialId,
    pub material_name: String,
    pub current_capacity: i64,
    pub max_capacity: i64,
    pub percentage_of_capacity: f64,
}

impl MaterialStockDto {
    pub fn from_entry(entry: &StockEntry, material_name: String) -> Self {
        Self {
            id: entry.id,
            material: entry.material_id,
            material_name,
            current_capacity: entry.current_capacity,
            max_capacity: entry.max_capacity,
            percentage_of_capacity: entry.percentage_of_capacity(),
        }
    }
}

/// Catalog product as listed by `GET /sales/`.
#[derive(Debug, Serialize)]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub material_quantity: Vec<BomLineDto>,
}

#[derive(Debug, Serialize)]
pub struct BomLineDto {
    pub material: MaterialId,
    pub quantity: i64,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            name: product.name().to_string(),
            material_quantity: product
                .bom()
                .iter()
                .map(|line| BomLineDto {
                    material: line.material_id,
                    quantity: line.quantity_per_unit,
                })
                .collect(),
        }
    }
}

/// Human-readable detail for a per-line error.
pub fn failure_detail(error: &DomainError) -> String {
    match error {
        DomainError::NotFound => "Material stock not found.".to_string(),
        DomainError::Validation(msg) => msg.clone(),
        other => other.to_string(),
    }
}
