//! HTTP handlers for stock ledger endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::ensure_admin;
use crate::middleware::CurrentUser;
use crate::services::movement::DEFAULT_MOVEMENT_LIMIT;
use crate::services::stock::{CreateStockItemInput, StockMovementInput, UpdateStockItemInput};
use crate::services::{MovementService, StockService};
use crate::models::{StockItem, StockItemWithCategory, StockMovementWithDetails};
use crate::AppState;

/// List all stock items with their categories
pub async fn list_stock_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<StockItemWithCategory>>> {
    let service = StockService::new(state.db, state.notifier.clone());
    let items = service.list_items().await?;
    Ok(Json(items))
}

/// Get one stock item with its category
pub async fn get_stock_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<StockItemWithCategory>> {
    let service = StockService::new(state.db, state.notifier.clone());
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// Create a stock item
pub async fn create_stock_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateStockItemInput>,
) -> AppResult<Json<StockItem>> {
    let service = StockService::new(state.db, state.notifier.clone());
    let item = service.add_item(Some(current_user.0.user_id), input).await?;
    Ok(Json(item))
}

/// Patch a stock item
pub async fn update_stock_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateStockItemInput>,
) -> AppResult<Json<StockItem>> {
    let service = StockService::new(state.db, state.notifier.clone());
    let item = service
        .update_item(Some(current_user.0.user_id), item_id, input)
        .await?;
    Ok(Json(item))
}

/// Delete a stock item (admin only)
pub async fn delete_stock_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    ensure_admin(&current_user.0)?;
    let service = StockService::new(state.db, state.notifier.clone());
    service
        .delete_item(Some(current_user.0.user_id), item_id)
        .await?;
    Ok(Json(()))
}

/// Issue stock from an item
pub async fn issue_stock_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<StockMovementInput>,
) -> AppResult<Json<StockItem>> {
    let service = StockService::new(state.db, state.notifier.clone());
    let item = service
        .issue_item(Some(current_user.0.user_id), item_id, input)
        .await?;
    Ok(Json(item))
}

/// Return stock into an item
pub async fn return_stock_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<StockMovementInput>,
) -> AppResult<Json<StockItem>> {
    let service = StockService::new(state.db, state.notifier.clone());
    let item = service
        .return_item(Some(current_user.0.user_id), item_id, input)
        .await?;
    Ok(Json(item))
}

#[derive(Debug, Deserialize)]
pub struct ItemMovementsQuery {
    /// `0` removes the cap; absent applies the default window.
    pub limit: Option<i64>,
}

/// Get the movement history for one item
pub async fn get_stock_item_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Query(query): Query<ItemMovementsQuery>,
) -> AppResult<Json<Vec<StockMovementWithDetails>>> {
    let limit = match query.limit {
        Some(n) if n <= 0 => None,
        Some(n) => Some(n),
        None => Some(DEFAULT_MOVEMENT_LIMIT),
    };

    let service = MovementService::new(state.db);
    let movements = service.list(Some(item_id), limit).await?;
    Ok(Json(movements))
}
