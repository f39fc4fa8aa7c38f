//! HTTP handlers for the activity log

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::activity::DEFAULT_ACTIVITY_LIMIT;
use crate::services::ActivityService;
use crate::models::ActivityLogWithUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// `0` removes the cap; absent applies the default window.
    pub limit: Option<i64>,
}

/// List activity log entries, newest first
pub async fn list_activity(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<Vec<ActivityLogWithUser>>> {
    let limit = match query.limit {
        Some(n) if n <= 0 => None,
        Some(n) => Some(n),
        None => Some(DEFAULT_ACTIVITY_LIMIT),
    };

    let service = ActivityService::new(state.db);
    let entries = service.list(limit).await?;
    Ok(Json(entries))
}
