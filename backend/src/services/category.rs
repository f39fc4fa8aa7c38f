//! Stock category service
//!
//! Deleting a category never deletes its items: the items' category
//! reference is nulled by the schema and displays fall back to
//! "Uncategorized".

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::notifier::ChangeNotifier;
use crate::services::ActivityService;
use shared::models::{Category, DEFAULT_CATEGORY_COLOR};
use shared::types::Collection;
use shared::validation::{validate_category_name, validate_color};

/// Stock category service
#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
    notifier: Arc<ChangeNotifier>,
}

/// Input for creating a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl CategoryService {
    pub fn new(db: PgPool, notifier: Arc<ChangeNotifier>) -> Self {
        Self { db, notifier }
    }

    /// List all categories ordered by name.
    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, color, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// Create a category. Names are unique within the ledger.
    pub async fn create(
        &self,
        actor: Option<Uuid>,
        input: CreateCategoryInput,
    ) -> AppResult<Category> {
        validate_category_name(&input.name).map_err(|m| AppError::validation("name", m))?;

        let color = input.color.unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string());
        validate_color(&color).map_err(|m| AppError::validation("color", m))?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE name = $1",
        )
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("category name".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, color)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, color, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(&color)
        .fetch_one(&mut *tx)
        .await?;

        ActivityService::record(
            &mut tx,
            actor,
            "created",
            "category",
            Some(category.id),
            Some(json!({ "name": category.name })),
        )
        .await?;

        tx.commit().await?;

        self.notifier
            .notify_all(&[Collection::Categories, Collection::ActivityLogs]);

        Ok(category)
    }

    /// Delete a category. Items referencing it keep existing with a nulled
    /// category.
    pub async fn delete(&self, actor: Option<Uuid>, category_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        ActivityService::record(&mut tx, actor, "deleted", "category", Some(category_id), None)
            .await?;

        tx.commit().await?;

        self.notifier.notify_all(&[
            Collection::Categories,
            Collection::StockItems,
            Collection::ActivityLogs,
        ]);

        Ok(())
    }
}
