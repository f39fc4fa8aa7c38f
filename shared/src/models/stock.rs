//! Stock ledger models and the status classifier

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

/// Reorder threshold applied when an item is created without one.
pub const DEFAULT_MIN_QUANTITY: i32 = 5;

/// Derived three-state classification of stock health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stock_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::LowStock => "low_stock",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }
}

/// Classify a quantity against its reorder threshold.
///
/// Recomputed on every mutation; the stored `status` column is never trusted
/// past one. With `min_quantity == 0` the `LowStock` state is unreachable.
pub fn classify_status(quantity: i32, min_quantity: i32) -> StockStatus {
    if quantity <= 0 {
        StockStatus::OutOfStock
    } else if quantity <= min_quantity {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// A generic stock item.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockItem {
    pub id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    /// Current on-hand count. Never negative.
    pub quantity: i32,
    /// Cumulative count ever added. Monotonically non-decreasing.
    pub total_added: i32,
    /// Cumulative count ever issued. Returns do not decrement it.
    pub issued: i32,
    pub min_quantity: i32,
    pub status: StockStatus,
    pub person_responsible: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stock item joined with its category for display.
#[derive(Debug, Clone, Serialize)]
pub struct StockItemWithCategory {
    #[serde(flatten)]
    pub item: StockItem,
    pub category: Option<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_out_of_stock() {
        assert_eq!(classify_status(0, 5), StockStatus::OutOfStock);
        assert_eq!(classify_status(0, 0), StockStatus::OutOfStock);
    }

    #[test]
    fn test_classify_low_stock() {
        assert_eq!(classify_status(1, 5), StockStatus::LowStock);
        assert_eq!(classify_status(5, 5), StockStatus::LowStock);
    }

    #[test]
    fn test_classify_in_stock() {
        assert_eq!(classify_status(6, 5), StockStatus::InStock);
        assert_eq!(classify_status(100, 10), StockStatus::InStock);
    }

    #[test]
    fn test_classify_zero_threshold_skips_low_stock() {
        // With a zero threshold any positive quantity is in stock
        assert_eq!(classify_status(1, 0), StockStatus::InStock);
        for q in 1..100 {
            assert_ne!(classify_status(q, 0), StockStatus::LowStock);
        }
    }
}
