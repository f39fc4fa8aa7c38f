//! Dashboard statistics service
//!
//! Read-only aggregates over the stock ledger for the dashboard view.

use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use shared::models::{StockItem, StockMovementWithDetails};

/// Dashboard statistics service
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

/// Aggregated dashboard statistics
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_items: i64,
    pub in_stock: i64,
    pub low_stock: i64,
    pub out_of_stock: i64,
    pub recently_added: Vec<StockItem>,
    pub recently_issued: Vec<StockMovementWithDetails>,
    pub category_breakdown: Vec<CategoryBreakdown>,
}

/// Item count per category
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CategoryBreakdown {
    pub name: String,
    pub color: String,
    pub count: i64,
}

impl DashboardService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Collect the dashboard aggregates.
    pub async fn get_stats(&self) -> AppResult<DashboardStats> {
        let (total_items, in_stock, low_stock, out_of_stock) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT COUNT(*),
                       COUNT(*) FILTER (WHERE status = 'in_stock'),
                       COUNT(*) FILTER (WHERE status = 'low_stock'),
                       COUNT(*) FILTER (WHERE status = 'out_of_stock')
                FROM stock_items
                "#,
            )
            .fetch_one(&self.db)
            .await?;

        let recently_added = sqlx::query_as::<_, StockItem>(
            r#"
            SELECT id, name, category_id, quantity, total_added, issued, min_quantity,
                   status, person_responsible, notes, created_by, created_at, updated_at
            FROM stock_items
            ORDER BY created_at DESC, id DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let recently_issued = sqlx::query_as::<_, StockMovementWithDetails>(
            r#"
            SELECT m.id, m.item_id, m.movement_type, m.quantity_delta,
                   m.previous_quantity, m.new_quantity, m.notes, m.performed_by, m.created_at,
                   COALESCE(i.name, 'Deleted Item') AS item_name,
                   c.name AS category_name,
                   c.color AS category_color,
                   u.full_name AS performer_name
            FROM stock_movements m
            LEFT JOIN stock_items i ON i.id = m.item_id
            LEFT JOIN categories c ON c.id = i.category_id
            LEFT JOIN users u ON u.id = m.performed_by
            WHERE m.movement_type = 'issued'
            ORDER BY m.created_at DESC, m.id DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let category_breakdown = sqlx::query_as::<_, CategoryBreakdown>(
            r#"
            SELECT c.name, c.color, COUNT(i.id) AS count
            FROM categories c
            LEFT JOIN stock_items i ON i.category_id = c.id
            GROUP BY c.id, c.name, c.color
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(DashboardStats {
            total_items,
            in_stock,
            low_stock,
            out_of_stock,
            recently_added,
            recently_issued,
            category_breakdown,
        })
    }
}
