//! Completion rollup handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::completion::{ProjectCompletionSummary, ProjectCompletionView};
use crate::services::CompletionService;
use crate::AppState;
use shared::completion::{CombinedPercentages, ProjectProcessPercentages};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub starred_project_id: Option<i32>,
}

/// Weighted completion rollup for one project
pub async fn get_project_completion(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> AppResult<Json<ProjectCompletionView>> {
    let service = CompletionService::new(state.db.clone(), &state.config);
    let view = service.project_completion(project_id).await?;

    Ok(Json(view))
}

/// Completion summaries across the user's projects, one dashboard page
/// at a time. A starred project is pinned to the front of page one.
pub async fn list_project_completions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<CompletionListQuery>,
) -> AppResult<Json<Vec<ProjectCompletionSummary>>> {
    let service = CompletionService::new(state.db.clone(), &state.config);
    let summaries = service
        .all_project_completions(
            &user,
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(6),
            query.starred_project_id,
        )
        .await?;

    Ok(Json(summaries))
}

/// Combined per-lot percentages, stopped catches excluded
pub async fn get_combined_percentages(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> AppResult<Json<CombinedPercentages>> {
    let service = CompletionService::new(state.db.clone(), &state.config);
    let percentages = service.combined_percentages(project_id).await?;

    Ok(Json(percentages))
}

/// Per-process progress across a project's lots
pub async fn get_process_percentages(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> AppResult<Json<ProjectProcessPercentages>> {
    let service = CompletionService::new(state.db.clone(), &state.config);
    let percentages = service.process_percentages(project_id).await?;

    Ok(Json(percentages))
}
