//! Stock ledger service
//!
//! Owns every quantity transition for generic stock items. Each
//! quantity-affecting operation runs in one transaction with the item row
//! locked, writes the item update and its movement record together, appends
//! an activity entry, and signals the changed collections after commit.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::notifier::ChangeNotifier;
use crate::services::ActivityService;
use shared::models::{
    classify_status, Category, MovementType, StockItem, StockItemWithCategory,
    DEFAULT_MIN_QUANTITY,
};
use shared::types::Collection;
use shared::validation::validate_item_name;

/// Stock ledger service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
    notifier: Arc<ChangeNotifier>,
}

/// Input for creating a stock item
#[derive(Debug, Deserialize)]
pub struct CreateStockItemInput {
    pub name: String,
    pub category_id: Option<Uuid>,
    pub quantity: i32,
    pub min_quantity: Option<i32>,
    pub person_responsible: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for a stock item. Only supplied fields are touched.
///
/// A supplied `quantity` is a direct override that bypasses the movement
/// log; the activity log still records it.
#[derive(Debug, Deserialize)]
pub struct UpdateStockItemInput {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub min_quantity: Option<i32>,
    pub person_responsible: Option<String>,
    pub notes: Option<String>,
}

/// Input for issuing or returning stock
#[derive(Debug, Deserialize)]
pub struct StockMovementInput {
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Joined row for item + category queries
#[derive(Debug, sqlx::FromRow)]
struct ItemWithCategoryRow {
    id: Uuid,
    name: String,
    category_id: Option<Uuid>,
    quantity: i32,
    total_added: i32,
    issued: i32,
    min_quantity: i32,
    status: shared::models::StockStatus,
    person_responsible: Option<String>,
    notes: Option<String>,
    created_by: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    cat_id: Option<Uuid>,
    cat_name: Option<String>,
    cat_description: Option<String>,
    cat_color: Option<String>,
    cat_created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ItemWithCategoryRow {
    fn into_item_with_category(self) -> StockItemWithCategory {
        let category = match (self.cat_id, self.cat_name, self.cat_color, self.cat_created_at) {
            (Some(id), Some(name), Some(color), Some(created_at)) => Some(Category {
                id,
                name,
                description: self.cat_description,
                color,
                created_at,
            }),
            _ => None,
        };

        StockItemWithCategory {
            item: StockItem {
                id: self.id,
                name: self.name,
                category_id: self.category_id,
                quantity: self.quantity,
                total_added: self.total_added,
                issued: self.issued,
                min_quantity: self.min_quantity,
                status: self.status,
                person_responsible: self.person_responsible,
                notes: self.notes,
                created_by: self.created_by,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            category,
        }
    }
}

const ITEM_COLUMNS: &str = "id, name, category_id, quantity, total_added, issued, min_quantity, \
                            status, person_responsible, notes, created_by, created_at, updated_at";

const ITEM_WITH_CATEGORY_QUERY: &str = r#"
    SELECT i.id, i.name, i.category_id, i.quantity, i.total_added, i.issued, i.min_quantity,
           i.status, i.person_responsible, i.notes, i.created_by, i.created_at, i.updated_at,
           c.id AS cat_id, c.name AS cat_name, c.description AS cat_description,
           c.color AS cat_color, c.created_at AS cat_created_at
    FROM stock_items i
    LEFT JOIN categories c ON c.id = i.category_id
"#;

/// Insert a movement record through the caller's transaction.
async fn record_movement(
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
        INSERT INTO stock_movements
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

impl StockService {
    pub fn new(db: PgPool, notifier: Arc<ChangeNotifier>) -> Self {
        Self { db, notifier }
    }

    /// List all items with their categories, newest first.
    pub async fn list_items(&self) -> AppResult<Vec<StockItemWithCategory>> {
        let rows = sqlx::query_as::<_, ItemWithCategoryRow>(&format!(
            "{} ORDER BY i.created_at DESC",
            ITEM_WITH_CATEGORY_QUERY
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(ItemWithCategoryRow::into_item_with_category)
            .collect())
    }

    /// Get one item with its category.
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<StockItemWithCategory> {
        let row = sqlx::query_as::<_, ItemWithCategoryRow>(&format!(
            "{} WHERE i.id = $1",
            ITEM_WITH_CATEGORY_QUERY
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock item".to_string()))?;

        Ok(row.into_item_with_category())
    }

    /// Create an item. Initial quantity doubles as the cumulative total;
    /// one `added` movement records the initial stock.
    pub async fn add_item(
        &self,
        actor: Option<Uuid>,
        input: CreateStockItemInput,
    ) -> AppResult<StockItem> {
        validate_item_name(&input.name).map_err(|m| AppError::validation("name", m))?;
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

        if let Some(category_id) = input.category_id {
            let category_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
            )
            .bind(category_id)
            .fetch_one(&self.db)
            .await?;

            if !category_exists {
                return Err(AppError::NotFound("Category".to_string()));
            }
        }

        let status = classify_status(input.quantity, min_quantity);

        let mut tx = self.db.begin().await?;

        let item = sqlx::query_as::<_, StockItem>(&format!(
            r#"
            INSERT INTO stock_items
                (name, category_id, quantity, total_added, issued, min_quantity, status,
                 person_responsible, notes, created_by)
            VALUES ($1, $2, $3, $3, 0, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(input.name.trim())
        .bind(input.category_id)
        .bind(input.quantity)
        .bind(min_quantity)
        .bind(status)
        .bind(&input.person_responsible)
        .bind(&input.notes)
        .bind(actor)
        .fetch_one(&mut *tx)
        .await?;

        record_movement(
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

        ActivityService::record(
            &mut tx,
            actor,
            "created",
            "stock_item",
            Some(item.id),
            Some(json!({ "name": item.name, "quantity": item.quantity })),
        )
        .await?;

        tx.commit().await?;

        self.notifier.notify_all(&[
            Collection::StockItems,
            Collection::StockMovements,
            Collection::ActivityLogs,
        ]);

        Ok(item)
    }

    /// Issue stock. The sufficiency check runs against the row-locked current
    /// quantity, so concurrent issues serialize instead of racing.
    pub async fn issue_item(
        &self,
        actor: Option<Uuid>,
        item_id: Uuid,
        input: StockMovementInput,
    ) -> AppResult<StockItem> {
        if input.quantity <= 0 {
            return Err(AppError::validation("quantity", "Quantity must be positive"));
        }

        let mut tx = self.db.begin().await?;

        let (quantity, min_quantity) = sqlx::query_as::<_, (i32, i32)>(
            "SELECT quantity, min_quantity FROM stock_items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock item".to_string()))?;

        if input.quantity > quantity {
            return Err(AppError::InsufficientStock {
                requested: input.quantity,
                available: quantity,
            });
        }

        let new_quantity = quantity - input.quantity;
        let status = classify_status(new_quantity, min_quantity);

        let item = sqlx::query_as::<_, StockItem>(&format!(
            r#"
            UPDATE stock_items
            SET quantity = $1, issued = issued + $2, status = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(new_quantity)
        .bind(input.quantity)
        .bind(status)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        record_movement(
            &mut tx,
            item_id,
            MovementType::Issued,
            -input.quantity,
            quantity,
            new_quantity,
            input.notes.as_deref(),
            actor,
        )
        .await?;

        ActivityService::record(
            &mut tx,
            actor,
            "issued",
            "stock_item",
            Some(item_id),
            Some(json!({ "quantity": input.quantity, "notes": input.notes })),
        )
        .await?;

        tx.commit().await?;

        self.notifier.notify_all(&[
            Collection::StockItems,
            Collection::StockMovements,
            Collection::ActivityLogs,
        ]);

        Ok(item)
    }

    /// Return stock into inventory. The cumulative `issued` counter is left
    /// unchanged: a return models a restock event, not a reversal of a
    /// specific issuance.
    pub async fn return_item(
        &self,
        actor: Option<Uuid>,
        item_id: Uuid,
        input: StockMovementInput,
    ) -> AppResult<StockItem> {
        if input.quantity <= 0 {
            return Err(AppError::validation("quantity", "Quantity must be positive"));
        }

        let mut tx = self.db.begin().await?;

        let (quantity, min_quantity) = sqlx::query_as::<_, (i32, i32)>(
            "SELECT quantity, min_quantity FROM stock_items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock item".to_string()))?;

        let new_quantity = quantity + input.quantity;
        let status = classify_status(new_quantity, min_quantity);

        let item = sqlx::query_as::<_, StockItem>(&format!(
            r#"
            UPDATE stock_items
            SET quantity = $1, total_added = total_added + $2, status = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(new_quantity)
        .bind(input.quantity)
        .bind(status)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        record_movement(
            &mut tx,
            item_id,
            MovementType::Returned,
            input.quantity,
            quantity,
            new_quantity,
            input.notes.as_deref(),
            actor,
        )
        .await?;

        ActivityService::record(
            &mut tx,
            actor,
            "returned",
            "stock_item",
            Some(item_id),
            Some(json!({ "quantity": input.quantity, "notes": input.notes })),
        )
        .await?;

        tx.commit().await?;

        self.notifier.notify_all(&[
            Collection::StockItems,
            Collection::StockMovements,
            Collection::ActivityLogs,
        ]);

        Ok(item)
    }

    /// Patch an item. Only supplied fields change; status is recomputed from
    /// the final quantity and threshold. No movement is emitted here.
    pub async fn update_item(
        &self,
        actor: Option<Uuid>,
        item_id: Uuid,
        input: UpdateStockItemInput,
    ) -> AppResult<StockItem> {
        if let Some(name) = &input.name {
            validate_item_name(name).map_err(|m| AppError::validation("name", m))?;
        }
        if let Some(quantity) = input.quantity {
            if quantity < 0 {
                return Err(AppError::validation("quantity", "Quantity cannot be negative"));
            }
        }
        if let Some(min_quantity) = input.min_quantity {
            if min_quantity < 0 {
                return Err(AppError::validation(
                    "min_quantity",
                    "Minimum quantity cannot be negative",
                ));
            }
        }

        if let Some(category_id) = input.category_id {
            let category_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
            )
            .bind(category_id)
            .fetch_one(&self.db)
            .await?;

            if !category_exists {
                return Err(AppError::NotFound("Category".to_string()));
            }
        }

        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, StockItem>(&format!(
            "SELECT {} FROM stock_items WHERE id = $1 FOR UPDATE",
            ITEM_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock item".to_string()))?;

        // Snapshot of the supplied fields for the activity log
        let mut changes = serde_json::Map::new();
        if let Some(name) = &input.name {
            changes.insert("name".into(), json!(name));
        }
        if let Some(category_id) = input.category_id {
            changes.insert("category_id".into(), json!(category_id));
        }
        if let Some(quantity) = input.quantity {
            changes.insert("quantity".into(), json!(quantity));
        }
        if let Some(min_quantity) = input.min_quantity {
            changes.insert("min_quantity".into(), json!(min_quantity));
        }
        if let Some(person) = &input.person_responsible {
            changes.insert("person_responsible".into(), json!(person));
        }
        if let Some(notes) = &input.notes {
            changes.insert("notes".into(), json!(notes));
        }

        let name = input.name.map(|n| n.trim().to_string()).unwrap_or(existing.name);
        let category_id = input.category_id.or(existing.category_id);
        let quantity = input.quantity.unwrap_or(existing.quantity);
        let min_quantity = input.min_quantity.unwrap_or(existing.min_quantity);
        let person_responsible = input.person_responsible.or(existing.person_responsible);
        let notes = input.notes.or(existing.notes);
        let status = classify_status(quantity, min_quantity);

        let item = sqlx::query_as::<_, StockItem>(&format!(
            r#"
            UPDATE stock_items
            SET name = $1, category_id = $2, quantity = $3, min_quantity = $4, status = $5,
                person_responsible = $6, notes = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(&name)
        .bind(category_id)
        .bind(quantity)
        .bind(min_quantity)
        .bind(status)
        .bind(&person_responsible)
        .bind(&notes)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        ActivityService::record(
            &mut tx,
            actor,
            "updated",
            "stock_item",
            Some(item_id),
            Some(serde_json::Value::Object(changes)),
        )
        .await?;

        tx.commit().await?;

        self.notifier
            .notify_all(&[Collection::StockItems, Collection::ActivityLogs]);

        Ok(item)
    }

    /// Delete an item. Its movements are retained and display with a
    /// "Deleted Item" fallback.
    pub async fn delete_item(&self, actor: Option<Uuid>, item_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query("DELETE FROM stock_items WHERE id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Stock item".to_string()));
        }

        ActivityService::record(&mut tx, actor, "deleted", "stock_item", Some(item_id), None)
            .await?;

        tx.commit().await?;

        self.notifier
            .notify_all(&[Collection::StockItems, Collection::ActivityLogs]);

        Ok(())
    }
}
