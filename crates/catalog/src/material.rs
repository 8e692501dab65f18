use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storekeep_core::{DomainError, DomainResult, MaterialId};

/// A raw material with its unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    id: MaterialId,
    name: String,
    /// Price per unit. Non-negative.
    price: Decimal,
}

impl Material {
    pub fn new(id: MaterialId, name: impl Into<String>, price: Decimal) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("material name cannot be empty"));
        }
        if price.is_sign_negative() {
            return Err(DomainError::validation("material price cannot be negative"));
        }
        Ok(Self { id, name, price })
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }
}
