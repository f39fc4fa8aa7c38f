//! Stock movement models
//!
//! A movement is an immutable record of a single quantity change event,
//! created in the same transaction as the item update it describes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Movement event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Added,
    Issued,
    Returned,
    /// Issued-record reconciliation on the uniform ledger.
    Adjusted,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Added => "added",
            MovementType::Issued => "issued",
            MovementType::Returned => "returned",
            MovementType::Adjusted => "adjusted",
        }
    }
}

/// A stock ledger movement.
///
/// Invariant: `new_quantity = previous_quantity + quantity_delta`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    /// Weak reference; the item may have been deleted since.
    pub item_id: Uuid,
    pub movement_type: MovementType,
    /// Signed delta: issued negative, added/returned positive.
    pub quantity_delta: i32,
    pub previous_quantity: i32,
    pub new_quantity: i32,
    pub notes: Option<String>,
    pub performed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A stock movement joined with item, category, and performer display fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockMovementWithDetails {
    pub id: Uuid,
    pub item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity_delta: i32,
    pub previous_quantity: i32,
    pub new_quantity: i32,
    pub notes: Option<String>,
    pub performed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Falls back to "Deleted Item" when the item no longer exists.
    pub item_name: String,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    pub performer_name: Option<String>,
}
