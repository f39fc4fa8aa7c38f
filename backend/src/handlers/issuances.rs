//! HTTP handlers for issued uniform records

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::ensure_admin;
use crate::middleware::CurrentUser;
use crate::services::issuance::{IssueUniformInput, UpdateIssuedRecordInput};
use crate::services::IssuanceService;
use crate::models::{IssuedRecord, IssuedRecordWithDetails};
use crate::AppState;

/// List issued records, newest first
pub async fn list_issued_records(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<IssuedRecordWithDetails>>> {
    let service = IssuanceService::new(state.db, state.notifier.clone());
    let records = service.list_records().await?;
    Ok(Json(records))
}

/// Issue a uniform to a student
pub async fn issue_uniform(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<IssueUniformInput>,
) -> AppResult<Json<IssuedRecord>> {
    let service = IssuanceService::new(state.db, state.notifier.clone());
    let record = service.issue(Some(current_user.0.user_id), input).await?;
    Ok(Json(record))
}

/// Edit an issued record (admin only); quantity changes reconcile item stock
pub async fn update_issued_record(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(record_id): Path<Uuid>,
    Json(input): Json<UpdateIssuedRecordInput>,
) -> AppResult<Json<IssuedRecord>> {
    ensure_admin(&current_user.0)?;
    let service = IssuanceService::new(state.db, state.notifier.clone());
    let record = service
        .update_record(Some(current_user.0.user_id), record_id, input)
        .await?;
    Ok(Json(record))
}

/// Delete an issued record (admin only); its quantity is restored to the item
pub async fn delete_issued_record(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    ensure_admin(&current_user.0)?;
    let service = IssuanceService::new(state.db, state.notifier.clone());
    service
        .delete_record(Some(current_user.0.user_id), record_id)
        .await?;
    Ok(Json(()))
}
