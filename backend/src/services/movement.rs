//! Stock movement log service
//!
//! Read-only query surface over the stock ledger's audit trail. Movements
//! are inserted exclusively by the stock service, inside the transaction of
//! the quantity change they record, and are never mutated afterwards.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::models::StockMovementWithDetails;

/// Movements returned when the caller does not ask for a specific window.
pub const DEFAULT_MOVEMENT_LIMIT: i64 = 50;

/// Stock movement log service
#[derive(Clone)]
pub struct MovementService {
    db: PgPool,
}

impl MovementService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List movements, newest first with a stable id tie-break, optionally
    /// filtered to one item. `limit = None` returns the full history.
    pub async fn list(
        &self,
        item_id: Option<Uuid>,
        limit: Option<i64>,
    ) -> AppResult<Vec<StockMovementWithDetails>> {
        let movements = sqlx::query_as::<_, StockMovementWithDetails>(
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
            WHERE ($1::uuid IS NULL OR m.item_id = $1)
            ORDER BY m.created_at DESC, m.id DESC
            LIMIT $2
            "#,
        )
        .bind(item_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}
