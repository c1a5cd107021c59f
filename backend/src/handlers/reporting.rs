//! Production report handlers

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::reporting::{
    DailyProductionSummary, ProcessProductionReport, QuickCompletionReport, ReportingService,
};
use crate::AppState;
use shared::production_status::{PendingProcessFilter, PendingProcessGroup, UnderProductionLot};
use shared::types::Pagination;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingProcessQuery {
    pub group_id: i32,
    pub lot_no: String,
    pub project_id: Option<i32>,
    pub process_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDateQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReportQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub group_id: Option<i32>,
    pub process_id: Option<i32>,
    pub project_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickCompletionQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Lots still in production with no departed dispatch
pub async fn get_under_production(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UnderProductionLot>>> {
    let service = ReportingService::new(state.db.clone(), state.config.reports.clone());
    let lots = service.under_production_lots().await?;

    Ok(Json(lots))
}

/// Open work per (project, lot, process) for one project group
pub async fn get_pending_processes(
    State(state): State<AppState>,
    Query(query): Query<PendingProcessQuery>,
) -> AppResult<Json<Vec<PendingProcessGroup>>> {
    let filter = PendingProcessFilter {
        group_id: query.group_id,
        project_id: query.project_id,
        lot_no: Some(query.lot_no),
        process_id: query.process_id,
    };

    let service = ReportingService::new(state.db.clone(), state.config.reports.clone());
    let groups = service.pending_processes(filter).await?;

    Ok(Json(groups))
}

/// Completions per (project, lot) in a date window
pub async fn get_daily_production(
    State(state): State<AppState>,
    Query(query): Query<ReportDateQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db.clone(), state.config.reports.clone());
    let rows = service
        .daily_production(
            query.date.as_deref(),
            query.start_date.as_deref(),
            query.end_date.as_deref(),
        )
        .await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&rows)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"daily_production.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(rows).into_response())
    }
}

/// Totals across the daily production groups
pub async fn get_daily_production_summary(
    State(state): State<AppState>,
    Query(query): Query<ReportDateQuery>,
) -> AppResult<Json<DailyProductionSummary>> {
    let service = ReportingService::new(state.db.clone(), state.config.reports.clone());
    let summary = service
        .daily_production_summary(
            query.date.as_deref(),
            query.start_date.as_deref(),
            query.end_date.as_deref(),
        )
        .await?;

    Ok(Json(summary))
}

/// Completions per process split into booklet and paper volume
pub async fn get_process_production(
    State(state): State<AppState>,
    Query(query): Query<ProcessReportQuery>,
) -> AppResult<Json<ProcessProductionReport>> {
    let service = ReportingService::new(state.db.clone(), state.config.reports.clone());
    let report = service
        .process_production(
            query.date.as_deref(),
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            query.group_id,
            query.process_id,
            query.project_id,
            state.config.pipeline.booklet_type_id,
            state.config.pipeline.paper_type_id,
        )
        .await?;

    Ok(Json(report))
}

/// Status updates on the same transaction recorded faster than the
/// configured window
pub async fn get_quick_completions(
    State(state): State<AppState>,
    Query(query): Query<QuickCompletionQuery>,
) -> AppResult<Json<QuickCompletionReport>> {
    let pagination = Pagination {
        page: query.page.unwrap_or(1),
        per_page: query.page_size.unwrap_or(20),
    };

    let service = ReportingService::new(state.db.clone(), state.config.reports.clone());
    let report = service
        .quick_completions(
            query.date.as_deref(),
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            pagination,
        )
        .await?;

    Ok(Json(report))
}
