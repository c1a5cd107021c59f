//! Dispatch handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::dispatch::{DispatchDaySummary, DispatchInput};
use crate::services::DispatchService;
use crate::AppState;
use shared::models::Dispatch;

/// Every dispatch on record
pub async fn list_dispatches(State(state): State<AppState>) -> AppResult<Json<Vec<Dispatch>>> {
    let service = DispatchService::new(state.db.clone());
    let dispatches = service.list().await?;

    Ok(Json(dispatches))
}

/// One dispatch by id
pub async fn get_dispatch(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Dispatch>> {
    let service = DispatchService::new(state.db.clone());
    let dispatch = service.get(id).await?;

    Ok(Json(dispatch))
}

/// All dispatches of a project
pub async fn get_project_dispatches(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> AppResult<Json<Vec<Dispatch>>> {
    let service = DispatchService::new(state.db.clone());
    let dispatches = service.list_for_project(project_id).await?;

    Ok(Json(dispatches))
}

/// Dispatches of one (project, lot)
pub async fn get_lot_dispatches(
    State(state): State<AppState>,
    Path((project_id, lot_no)): Path<(i32, String)>,
) -> AppResult<Json<Vec<Dispatch>>> {
    let service = DispatchService::new(state.db.clone());
    let dispatches = service.list_for_lot(project_id, &lot_no).await?;

    Ok(Json(dispatches))
}

/// Record a dispatch, replacing any earlier row for the same
/// (project, lot)
pub async fn create_dispatch(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<DispatchInput>,
) -> AppResult<(StatusCode, Json<Dispatch>)> {
    let service = DispatchService::new(state.db.clone());
    let dispatch = service.upsert(user.user_id, input).await?;

    Ok((StatusCode::CREATED, Json(dispatch)))
}

/// Update a dispatch in place
pub async fn update_dispatch(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Json(input): Json<DispatchInput>,
) -> AppResult<Json<Dispatch>> {
    let service = DispatchService::new(state.db.clone());
    let dispatch = service.update(user.user_id, id, input).await?;

    Ok(Json(dispatch))
}

/// Delete a dispatch
pub async fn delete_dispatch(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let service = DispatchService::new(state.db.clone());
    service.delete(user.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Today's dispatches with the sheet totals of each lot
pub async fn get_today_dispatch_summary(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DispatchDaySummary>>> {
    let service = DispatchService::new(state.db.clone());
    let summary = service.today_summary().await?;

    Ok(Json(summary))
}
