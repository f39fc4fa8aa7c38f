//! HTTP handlers for uniform ledger endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::ensure_admin;
use crate::middleware::CurrentUser;
use crate::services::uniform::{
    CreateUniformInput, UpdateUniformInput, DEFAULT_UNIFORM_MOVEMENT_LIMIT,
};
use crate::services::UniformService;
use crate::models::{UniformCategory, UniformItem, UniformMovementWithDetails};
use crate::AppState;

/// List all uniform items
pub async fn list_uniforms(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<UniformItem>>> {
    let service = UniformService::new(state.db, state.notifier.clone());
    let items = service.list_items().await?;
    Ok(Json(items))
}

/// Get one uniform item
pub async fn get_uniform(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<UniformItem>> {
    let service = UniformService::new(state.db, state.notifier.clone());
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// Create a uniform item
pub async fn create_uniform(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateUniformInput>,
) -> AppResult<Json<UniformItem>> {
    let service = UniformService::new(state.db, state.notifier.clone());
    let item = service.add_item(Some(current_user.0.user_id), input).await?;
    Ok(Json(item))
}

/// Patch a uniform item
pub async fn update_uniform(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateUniformInput>,
) -> AppResult<Json<UniformItem>> {
    let service = UniformService::new(state.db, state.notifier.clone());
    let item = service.update_item(item_id, input).await?;
    Ok(Json(item))
}

/// Delete a uniform item (admin only)
pub async fn delete_uniform(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    ensure_admin(&current_user.0)?;
    let service = UniformService::new(state.db, state.notifier.clone());
    service.delete_item(item_id).await?;
    Ok(Json(()))
}

/// List uniform categories
pub async fn list_uniform_categories(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<UniformCategory>>> {
    let service = UniformService::new(state.db, state.notifier.clone());
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

#[derive(Debug, Deserialize)]
pub struct CreateUniformCategoryInput {
    pub name: String,
}

/// Create a uniform category
pub async fn create_uniform_category(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateUniformCategoryInput>,
) -> AppResult<Json<UniformCategory>> {
    let service = UniformService::new(state.db, state.notifier.clone());
    let category = service.add_category(&input.name).await?;
    Ok(Json(category))
}

/// Delete a uniform category (admin only). Items keep their category strings.
pub async fn delete_uniform_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    ensure_admin(&current_user.0)?;
    let service = UniformService::new(state.db, state.notifier.clone());
    service.delete_category(category_id).await?;
    Ok(Json(()))
}

#[derive(Debug, Deserialize)]
pub struct UniformMovementsQuery {
    /// `0` removes the cap; absent applies the default window.
    pub limit: Option<i64>,
}

/// List uniform movements, newest first
pub async fn list_uniform_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<UniformMovementsQuery>,
) -> AppResult<Json<Vec<UniformMovementWithDetails>>> {
    let limit = match query.limit {
        Some(n) if n <= 0 => None,
        Some(n) => Some(n),
        None => Some(DEFAULT_UNIFORM_MOVEMENT_LIMIT),
    };

    let service = UniformService::new(state.db, state.notifier.clone());
    let movements = service.list_movements(limit).await?;
    Ok(Json(movements))
}
