//! Issued uniform record models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A record of uniforms handed to a student, tied one-to-one with a stock
/// decrement. Unlike movements, issued records are mutable: editing the
/// quantity applies a reconciliation delta back to the item, and deleting
/// the record restores its quantity.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IssuedRecord {
    pub id: Uuid,
    pub student_name: String,
    /// Weak reference; the uniform item may have been deleted since.
    pub uniform_id: Uuid,
    pub quantity_taken: i32,
    pub issue_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// An issued record joined with uniform display fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct IssuedRecordWithDetails {
    pub id: Uuid,
    pub student_name: String,
    pub uniform_id: Uuid,
    pub quantity_taken: i32,
    pub issue_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    /// Falls back to "Deleted Item" when the uniform no longer exists.
    pub uniform_name: String,
    /// Falls back to "Uncategorized" when the uniform no longer exists.
    pub uniform_category: String,
}
