//! Uniform ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MovementType, StockStatus};

/// A uniform inventory item.
///
/// Category is a denormalized name string; deleting a uniform category
/// leaves the items' strings untouched.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UniformItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    /// Cumulative count ever stocked. Monotonically non-decreasing.
    pub total_quantity: i32,
    /// Current on-hand count. Never negative.
    pub remaining_quantity: i32,
    pub min_quantity: i32,
    pub status: StockStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A uniform category. Bare name, unique within the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UniformCategory {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A uniform ledger movement. Same shape and invariants as the stock ledger's.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UniformMovement {
    pub id: Uuid,
    /// Weak reference; the item may have been deleted since.
    pub item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity_delta: i32,
    pub previous_quantity: i32,
    pub new_quantity: i32,
    pub notes: Option<String>,
    pub performed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A uniform movement joined with item display fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UniformMovementWithDetails {
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
    pub item_category: Option<String>,
}
