//! Activity log service
//!
//! Append-only audit trail of all stock ledger entity mutations. Entries are
//! written inside the same transaction as the mutation they describe and are
//! never updated or deleted. Observational only: quantities always come from
//! the items and movements tables, never from here.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use shared::models::ActivityLogWithUser;

/// Entries returned when the caller does not ask for a specific window.
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 20;

/// Activity log service
#[derive(Clone)]
pub struct ActivityService {
    db: PgPool,
}

impl ActivityService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append an entry through the caller's transaction, so the entry commits
    /// together with the mutation it records.
    pub async fn record(
        conn: &mut PgConnection,
        user_id: Option<Uuid>,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
        details: Option<serde_json::Value>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (user_id, action, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(action)
        .bind(entity_type)
        .bind(entity_id)
        .bind(details)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// List entries, newest first with a stable id tie-break.
    /// `limit = None` returns the full log.
    pub async fn list(&self, limit: Option<i64>) -> AppResult<Vec<ActivityLogWithUser>> {
        let entries = sqlx::query_as::<_, ActivityLogWithUser>(
            r#"
            SELECT a.id, a.user_id, a.action, a.entity_type, a.entity_id, a.details, a.created_at,
                   u.full_name AS user_name
            FROM activity_logs a
            LEFT JOIN users u ON u.id = a.user_id
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }
}
