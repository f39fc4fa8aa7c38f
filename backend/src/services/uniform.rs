//! Uniform ledger service
//!
//! Mirror of the stock ledger for uniform items: same quantity/status rules,
//! same one-transaction item-plus-movement writes. Uniform categories are
//! denormalized name strings on the items; the activity log is a stock
//! ledger concern and is not written here.

use std::sync::Arc;

use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::notifier::ChangeNotifier;
use shared::models::{
    classify_status, MovementType, UniformCategory, UniformItem, UniformMovementWithDetails,
    DEFAULT_MIN_QUANTITY,
};
use shared::types::Collection;
use shared::validation::{validate_category_name, validate_item_name};

/// Movements returned when the caller does not ask for a specific window.
pub const DEFAULT_UNIFORM_MOVEMENT_LIMIT: i64 = 50;

/// Uniform ledger service
#[derive(Clone)]
pub struct UniformService {
    db: PgPool,
    notifier: Arc<ChangeNotifier>,
}

/// Input for creating a uniform item
#[derive(Debug, Deserialize)]
pub struct CreateUniformInput {
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub min_quantity: Option<i32>,
}

/// Partial update for a uniform item. Only supplied fields are touched.
///
/// Quantity overrides bypass the movement log; metadata-only changes emit no
/// movement at all.
#[derive(Debug, Deserialize)]
pub struct UpdateUniformInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub total_quantity: Option<i32>,
    pub remaining_quantity: Option<i32>,
    pub min_quantity: Option<i32>,
}

const UNIFORM_COLUMNS: &str = "id, name, category, total_quantity, remaining_quantity, \
                               min_quantity, status, created_at, updated_at";

/// Insert a uniform movement record through the caller's transaction.
pub(crate) async fn record_uniform_movement(
    conn: &mut PgConnection,
    item_id: Uuid,
    movement_type: MovementType,
    quantity_delta: i32,
    previous_quantity: i32,
    new_quantity: i32,
    notes: Option<&str>,
    performed_by: Option<Uuid>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO uniform_movements
            (item_id, movement_type, quantity_delta, previous_quantity, new_quantity, notes, performed_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(item_id)
    .bind(movement_type)
    .bind(quantity_delta)
    .bind(previous_quantity)
    .bind(new_quantity)
    .bind(notes)
    .bind(performed_by)
    .execute(conn)
    .await?;

    Ok(())
}

impl UniformService {
    pub fn new(db: PgPool, notifier: Arc<ChangeNotifier>) -> Self {
        Self { db, notifier }
    }

    /// List all uniform items ordered by name.
    pub async fn list_items(&self) -> AppResult<Vec<UniformItem>> {
        let items = sqlx::query_as::<_, UniformItem>(&format!(
            "SELECT {} FROM uniform_items ORDER BY name",
            UNIFORM_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Get one uniform item.
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<UniformItem> {
        let item = sqlx::query_as::<_, UniformItem>(&format!(
            "SELECT {} FROM uniform_items WHERE id = $1",
            UNIFORM_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Uniform item".to_string()))?;

        Ok(item)
    }

    /// Create a uniform item. Remaining stock starts equal to the total.
    pub async fn add_item(
        &self,
        actor: Option<Uuid>,
        input: CreateUniformInput,
    ) -> AppResult<UniformItem> {
        validate_item_name(&input.name).map_err(|m| AppError::validation("name", m))?;
        validate_category_name(&input.category).map_err(|m| AppError::validation("category", m))?;
        if input.quantity < 0 {
            return Err(AppError::validation("quantity", "Quantity cannot be negative"));
        }
        let min_quantity = input.min_quantity.unwrap_or(DEFAULT_MIN_QUANTITY);
        if min_quantity < 0 {
            return Err(AppError::validation(
                "min_quantity",
                "Minimum quantity cannot be negative",
            ));
        }

        let status = classify_status(input.quantity, min_quantity);

        let mut tx = self.db.begin().await?;

        let item = sqlx::query_as::<_, UniformItem>(&format!(
            r#"
            INSERT INTO uniform_items
                (name, category, total_quantity, remaining_quantity, min_quantity, status)
            VALUES ($1, $2, $3, $3, $4, $5)
            RETURNING {}
            "#,
            UNIFORM_COLUMNS
        ))
        .bind(input.name.trim())
        .bind(input.category.trim())
        .bind(input.quantity)
        .bind(min_quantity)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        record_uniform_movement(
            &mut tx,
            item.id,
            MovementType::Added,
            input.quantity,
            0,
            input.quantity,
            Some("Initial stock"),
            actor,
        )
        .await?;

        tx.commit().await?;

        self.notifier
            .notify_all(&[Collection::UniformItems, Collection::UniformMovements]);

        Ok(item)
    }

    /// Patch a uniform item. Only supplied fields change; status is
    /// recomputed from the final remaining quantity and threshold.
    pub async fn update_item(
        &self,
        item_id: Uuid,
        input: UpdateUniformInput,
    ) -> AppResult<UniformItem> {
        if let Some(name) = &input.name {
            validate_item_name(name).map_err(|m| AppError::validation("name", m))?;
        }
        if let Some(category) = &input.category {
            validate_category_name(category).map_err(|m| AppError::validation("category", m))?;
        }
        if matches!(input.total_quantity, Some(q) if q < 0) {
            return Err(AppError::validation(
                "total_quantity",
                "Quantity cannot be negative",
            ));
        }
        if matches!(input.remaining_quantity, Some(q) if q < 0) {
            return Err(AppError::validation(
                "remaining_quantity",
                "Quantity cannot be negative",
            ));
        }
        if matches!(input.min_quantity, Some(q) if q < 0) {
            return Err(AppError::validation(
                "min_quantity",
                "Minimum quantity cannot be negative",
            ));
        }

        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, UniformItem>(&format!(
            "SELECT {} FROM uniform_items WHERE id = $1 FOR UPDATE",
            UNIFORM_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Uniform item".to_string()))?;

        let name = input.name.map(|n| n.trim().to_string()).unwrap_or(existing.name);
        let category = input
            .category
            .map(|c| c.trim().to_string())
            .unwrap_or(existing.category);
        let total_quantity = input.total_quantity.unwrap_or(existing.total_quantity);
        let remaining_quantity = input.remaining_quantity.unwrap_or(existing.remaining_quantity);
        let min_quantity = input.min_quantity.unwrap_or(existing.min_quantity);

        if remaining_quantity > total_quantity {
            return Err(AppError::validation(
                "remaining_quantity",
                "Remaining quantity cannot exceed total quantity",
            ));
        }

        let status = classify_status(remaining_quantity, min_quantity);

        let item = sqlx::query_as::<_, UniformItem>(&format!(
            r#"
            UPDATE uniform_items
            SET name = $1, category = $2, total_quantity = $3, remaining_quantity = $4,
                min_quantity = $5, status = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {}
            "#,
            UNIFORM_COLUMNS
        ))
        .bind(&name)
        .bind(&category)
        .bind(total_quantity)
        .bind(remaining_quantity)
        .bind(min_quantity)
        .bind(status)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        self.notifier.notify(Collection::UniformItems);

        Ok(item)
    }

    /// Delete a uniform item. Its movements and issued records are retained
    /// and display with a "Deleted Item" fallback.
    pub async fn delete_item(&self, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM uniform_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Uniform item".to_string()));
        }

        self.notifier.notify(Collection::UniformItems);

        Ok(())
    }

    /// List uniform categories ordered by name.
    pub async fn list_categories(&self) -> AppResult<Vec<UniformCategory>> {
        let categories = sqlx::query_as::<_, UniformCategory>(
            "SELECT id, name, created_at FROM uniform_categories ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// Create a uniform category. Names are unique within the ledger.
    pub async fn add_category(&self, name: &str) -> AppResult<UniformCategory> {
        validate_category_name(name).map_err(|m| AppError::validation("name", m))?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM uniform_categories WHERE name = $1",
        )
        .bind(name.trim())
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("category name".to_string()));
        }

        let category = sqlx::query_as::<_, UniformCategory>(
            r#"
            INSERT INTO uniform_categories (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name.trim())
        .fetch_one(&self.db)
        .await?;

        self.notifier.notify(Collection::UniformCategories);

        Ok(category)
    }

    /// Delete a uniform category. Items keep their denormalized category
    /// strings and display falls back to "Uncategorized".
    pub async fn delete_category(&self, category_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM uniform_categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Uniform category".to_string()));
        }

        self.notifier.notify(Collection::UniformCategories);

        Ok(())
    }

    /// List uniform movements, newest first with a stable id tie-break.
    /// `limit = None` returns the full history.
    pub async fn list_movements(
        &self,
        limit: Option<i64>,
    ) -> AppResult<Vec<UniformMovementWithDetails>> {
        let movements = sqlx::query_as::<_, UniformMovementWithDetails>(
            r#"
            SELECT m.id, m.item_id, m.movement_type, m.quantity_delta,
                   m.previous_quantity, m.new_quantity, m.notes, m.performed_by, m.created_at,
                   COALESCE(i.name, 'Deleted Item') AS item_name,
                   i.category AS item_category
            FROM uniform_movements m
            LEFT JOIN uniform_items i ON i.id = m.item_id
            ORDER BY m.created_at DESC, m.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}
