//! Stock category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display color applied when a category is created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3B82F6";

/// A stock item category.
///
/// Deleting a category never deletes its items; they fall back to an
/// uncategorized display state.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: DateTime<Utc>,
}
