//! Project and group lookup handlers
//!
//! The cascade the frontend walks before recording work: groups,
//! projects visible to the user, lot numbers, catch numbers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::project::ProjectSummary;
use crate::services::ProjectService;
use crate::AppState;
use shared::models::Group;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListQuery {
    pub group_id: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedOperator {
    pub id: Uuid,
    pub full_name: String,
}

/// List active groups
pub async fn list_groups(State(state): State<AppState>) -> AppResult<Json<Vec<Group>>> {
    let service = ProjectService::new(state.db.clone());
    let groups = service.list_groups().await?;

    Ok(Json(groups))
}

/// Projects visible to the user, optionally narrowed to one group
pub async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ProjectListQuery>,
) -> AppResult<Json<Vec<ProjectSummary>>> {
    let service = ProjectService::new(state.db.clone());
    let projects = service
        .projects_for_user_in_group(&user, query.group_id)
        .await?;

    Ok(Json(projects))
}

/// Distinct lot numbers of a project's active sheets
pub async fn get_lot_numbers(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> AppResult<Json<Vec<String>>> {
    let service = ProjectService::new(state.db.clone());
    let lots = service.lot_numbers(project_id).await?;

    Ok(Json(lots))
}

/// Distinct catch numbers of one (project, lot)
pub async fn get_catch_numbers(
    State(state): State<AppState>,
    Path((project_id, lot_no)): Path<(i32, String)>,
) -> AppResult<Json<Vec<String>>> {
    let service = ProjectService::new(state.db.clone());
    let catches = service.catch_numbers(project_id, &lot_no).await?;

    Ok(Json(catches))
}

/// Operators assigned to any stage of a project's pipeline
pub async fn get_assigned_operators(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> AppResult<Json<Vec<AssignedOperator>>> {
    let service = ProjectService::new(state.db.clone());
    let operators = service
        .assigned_operators(project_id)
        .await?
        .into_iter()
        .map(|(id, full_name)| AssignedOperator { id, full_name })
        .collect();

    Ok(Json(operators))
}
