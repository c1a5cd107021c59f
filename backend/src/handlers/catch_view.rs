//! Catch status board and search handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::catch_view::{CatchSearchHit, CatchStatusRow};
use crate::services::CatchViewService;
use crate::AppState;
use shared::types::{PaginatedResponse, Pagination};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchStatusQuery {
    pub lot_no: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchSearchQuery {
    #[serde(default)]
    pub query: String,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub group_id: Option<i32>,
    pub project_id: Option<i32>,
}

/// Status board for a project, optionally narrowed to one lot
pub async fn get_catch_status(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Query(query): Query<CatchStatusQuery>,
) -> AppResult<Json<Vec<CatchStatusRow>>> {
    let service = CatchViewService::new(state.db.clone(), state.config.pipeline.clone());
    let rows = service
        .status_board(project_id, query.lot_no.as_deref())
        .await?;

    Ok(Json(rows))
}

/// Prefix search over catch number, subject, course and paper
pub async fn search_catches(
    State(state): State<AppState>,
    Query(query): Query<CatchSearchQuery>,
) -> AppResult<Json<PaginatedResponse<CatchSearchHit>>> {
    let pagination = Pagination {
        page: query.page.unwrap_or(1),
        per_page: query.page_size.unwrap_or(20),
    };

    let service = CatchViewService::new(state.db.clone(), state.config.pipeline.clone());
    let hits = service
        .search(&query.query, pagination, query.group_id, query.project_id)
        .await?;

    Ok(Json(hits))
}
