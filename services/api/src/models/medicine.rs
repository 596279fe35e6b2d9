//! Medicine model and related payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Medicine entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Medicine {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

/// Payload for creating or fully replacing a medicine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineInput {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

/// Partial update payload; absent fields keep their stored value
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MedicinePatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
}

impl MedicinePatch {
    /// Merge the patch over an existing record into a full replacement payload
    pub fn apply(self, existing: &Medicine) -> MedicineInput {
        MedicineInput {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            price: self.price.unwrap_or(existing.price),
            quantity: self.quantity.unwrap_or(existing.quantity),
        }
    }
}
