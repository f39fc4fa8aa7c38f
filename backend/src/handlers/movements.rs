//! HTTP handlers for the stock movement log

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::movement::DEFAULT_MOVEMENT_LIMIT;
use crate::services::MovementService;
use crate::models::StockMovementWithDetails;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MovementsQuery {
    pub item_id: Option<Uuid>,
    /// `0` removes the cap; absent applies the default window.
    pub limit: Option<i64>,
}

/// List movements across all items, newest first
pub async fn list_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<MovementsQuery>,
) -> AppResult<Json<Vec<StockMovementWithDetails>>> {
    let limit = match query.limit {
        Some(n) if n <= 0 => None,
        Some(n) => Some(n),
        None => Some(DEFAULT_MOVEMENT_LIMIT),
    };

    let service = MovementService::new(state.db);
    let movements = service.list(query.item_id, limit).await?;
    Ok(Json(movements))
}
