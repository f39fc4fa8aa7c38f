//! HTTP handlers for stock category endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::ensure_admin;
use crate::middleware::CurrentUser;
use crate::services::category::CreateCategoryInput;
use crate::services::CategoryService;
use crate::models::Category;
use crate::AppState;

/// List all categories
pub async fn list_categories(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Category>>> {
    let service = CategoryService::new(state.db, state.notifier.clone());
    let categories = service.list().await?;
    Ok(Json(categories))
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db, state.notifier.clone());
    let category = service.create(Some(current_user.0.user_id), input).await?;
    Ok(Json(category))
}

/// Delete a category (admin only). Items referencing it are kept.
pub async fn delete_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    ensure_admin(&current_user.0)?;
    let service = CategoryService::new(state.db, state.notifier.clone());
    service
        .delete(Some(current_user.0.user_id), category_id)
        .await?;
    Ok(Json(()))
}
