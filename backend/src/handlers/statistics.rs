//! Pipeline statistics handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::StatisticsService;
use crate::AppState;
use shared::statistics::{CatchProcessStatus, StageStatistics};

#[derive(Deserialize)]
pub struct StageStatusQuery {
    pub status: i32,
}

/// Process-train statistics for one (project, lot)
pub async fn get_process_train(
    State(state): State<AppState>,
    Path((project_id, lot_no)): Path<(i32, String)>,
) -> AppResult<Json<Vec<StageStatistics>>> {
    let service = StatisticsService::new(state.db.clone(), &state.config);
    let stages = service.process_train(project_id, &lot_no).await?;

    Ok(Json(stages))
}

/// Catches of a lot sitting at one status under one process
pub async fn get_catches_at_status(
    State(state): State<AppState>,
    Path((project_id, lot_no, process_id)): Path<(i32, String, i32)>,
    Query(query): Query<StageStatusQuery>,
) -> AppResult<Json<Vec<CatchProcessStatus>>> {
    let service = StatisticsService::new(state.db.clone(), &state.config);
    let catches = service
        .catches_at_status(project_id, &lot_no, process_id, query.status)
        .await?;

    Ok(Json(catches))
}
