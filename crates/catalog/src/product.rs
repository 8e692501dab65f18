use serde::{Deserialize, Serialize};

use storekeep_core::{DomainError, DomainResult, MaterialId, ProductId};

/// One line of a product's bill of materials: how much of a material one unit
/// of the product consumes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomLine {
    pub material_id: MaterialId,
    /// Units of the material consumed per unit of product. Strictly positive;
    /// a zero here would divide capacity projection by zero.
    pub quantity_per_unit: i64,
}

/// A sellable product defined by its bill of materials.
///
/// Line order is preserved: it is the tie-break order for limiting-material
/// determination in capacity projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    bom: Vec<BomLine>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        bom: Vec<BomLine>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        for line in &bom {
            if line.quantity_per_unit <= 0 {
                return Err(DomainError::validation(format!(
                    "bill-of-materials quantity for material {} must be positive",
                    line.material_id
                )));
            }
        }
        Ok(Self { id, name, bom })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bom(&self) -> &[BomLine] {
        &self.bom
    }

    /// A product with no bill of materials consumes nothing; its producible
    /// quantity is undefined rather than zero.
    pub fn has_empty_bom(&self) -> bool {
        self.bom.is_empty()
    }
}
