//! Process transaction handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::transaction::{SaveTransactionInput, SaveTransactionResult};
use crate::services::TransactionService;
use crate::AppState;
use shared::models::ProcessTransaction;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListQuery {
    pub lot_no: Option<String>,
}

/// Record work against a catch. Creates or updates the transaction per
/// affected sheet and writes the audit entries alongside.
pub async fn save_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<SaveTransactionInput>,
) -> AppResult<Json<SaveTransactionResult>> {
    let service = TransactionService::new(
        state.db.clone(),
        state.config.reports.single_sheet_process_names.clone(),
    );
    let result = service.save(user.user_id, input).await?;

    Ok(Json(result))
}

/// All transactions of a project, optionally narrowed to one lot
pub async fn list_project_transactions(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Query(query): Query<TransactionListQuery>,
) -> AppResult<Json<Vec<ProcessTransaction>>> {
    let service = TransactionService::new(
        state.db.clone(),
        state.config.reports.single_sheet_process_names.clone(),
    );
    let transactions = service
        .list_for_project(project_id, query.lot_no.as_deref())
        .await?;

    Ok(Json(transactions))
}
