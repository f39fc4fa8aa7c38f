//! Activity log models
//!
//! The activity log is a secondary append-only audit trail of all entity
//! mutations on the stock ledger, independent of the movement log. It is
//! observational only and never a source of truth for quantities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An activity log entry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLogEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    /// Free-form verb: created, updated, deleted, issued, returned.
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    /// Structured payload snapshot of the mutation.
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// An activity log entry joined with the acting user's name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActivityLogWithUser {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub user_name: Option<String>,
}
