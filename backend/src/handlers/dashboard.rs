//! HTTP handlers for dashboard statistics

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::dashboard::DashboardStats;
use crate::services::DashboardService;
use crate::AppState;

/// Get aggregated dashboard statistics
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<DashboardStats>> {
    let service = DashboardService::new(state.db);
    let stats = service.get_stats().await?;
    Ok(Json(stats))
}
