//! Bulk snapshot loaders for the aggregation services
//!
//! Every report computes over a fixed relational snapshot fetched up
//! front: the project, its pipeline, its quantity sheets, transactions
//! and dispatches. The row structs here map database rows onto the
//! shared domain models; the engines themselves never touch the store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Dispatch, ProcessTransaction, Project, QuantitySheet};
use shared::pipeline::{Pipeline, PipelineEntry};
use shared::types::ProcessType;

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    project_id: i32,
    name: String,
    description: Option<String>,
    type_id: i32,
    group_id: i32,
    no_of_series: Option<i32>,
    series_name: Option<String>,
    status: bool,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            project_id: row.project_id,
            name: row.name,
            description: row.description,
            type_id: row.type_id,
            group_id: row.group_id,
            no_of_series: row.no_of_series,
            series_name: row.series_name,
            status: row.status,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PipelineRow {
    process_id: i32,
    process_name: String,
    sequence: i32,
    weightage: Decimal,
    process_type: Option<String>,
    range_start: Option<i32>,
}

#[derive(Debug, sqlx::FromRow)]
struct SheetRow {
    quantity_sheet_id: i32,
    project_id: i32,
    lot_no: String,
    catch_no: String,
    paper: Option<String>,
    course: Option<String>,
    subject: Option<String>,
    inner_envelope: Option<String>,
    outer_envelope: Option<i32>,
    exam_date: String,
    exam_time: Option<String>,
    quantity: Decimal,
    pages: Option<i32>,
    percentage_catch: Decimal,
    process_ids: Vec<i32>,
    status: i32,
    stop_catch: i32,
}

impl From<SheetRow> for QuantitySheet {
    fn from(row: SheetRow) -> Self {
        QuantitySheet {
            quantity_sheet_id: row.quantity_sheet_id,
            project_id: row.project_id,
            lot_no: row.lot_no,
            catch_no: row.catch_no,
            paper: row.paper,
            course: row.course,
            subject: row.subject,
            inner_envelope: row.inner_envelope,
            outer_envelope: row.outer_envelope,
            exam_date: row.exam_date,
            exam_time: row.exam_time,
            quantity: row.quantity,
            pages: row.pages,
            percentage_catch: row.percentage_catch,
            process_ids: row.process_ids,
            status: row.status,
            stop_catch: row.stop_catch,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    transaction_id: i32,
    project_id: i32,
    quantity_sheet_id: i32,
    process_id: i32,
    lot_no: String,
    interim_quantity: Decimal,
    remarks: Option<String>,
    voice_recording: Option<String>,
    zone_id: i32,
    machine_id: i32,
    status: i32,
    alarm_id: Option<String>,
    team_ids: Vec<i32>,
}

impl From<TransactionRow> for ProcessTransaction {
    fn from(row: TransactionRow) -> Self {
        ProcessTransaction {
            transaction_id: row.transaction_id,
            project_id: row.project_id,
            quantity_sheet_id: row.quantity_sheet_id,
            process_id: row.process_id,
            lot_no: row.lot_no,
            interim_quantity: row.interim_quantity,
            remarks: row.remarks,
            voice_recording: row.voice_recording,
            zone_id: row.zone_id,
            machine_id: row.machine_id,
            status: row.status,
            alarm_id: row.alarm_id,
            team_ids: row.team_ids,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DispatchRow {
    id: i32,
    project_id: i32,
    lot_no: String,
    process_id: i32,
    box_count: Option<i32>,
    messenger_name: Option<String>,
    messenger_mobile: Option<String>,
    dispatch_mode: Option<String>,
    vehicle_number: Option<String>,
    driver_name: Option<String>,
    driver_mobile: Option<String>,
    status: bool,
    dispatch_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<DispatchRow> for Dispatch {
    fn from(row: DispatchRow) -> Self {
        Dispatch {
            id: row.id,
            project_id: row.project_id,
            lot_no: row.lot_no,
            process_id: row.process_id,
            box_count: row.box_count,
            messenger_name: row.messenger_name,
            messenger_mobile: row.messenger_mobile,
            dispatch_mode: row.dispatch_mode,
            vehicle_number: row.vehicle_number,
            driver_name: row.driver_name,
            driver_mobile: row.driver_mobile,
            status: row.status,
            dispatch_date: row.dispatch_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SHEET_COLUMNS: &str = "quantity_sheet_id, project_id, lot_no, catch_no, paper, course, \
     subject, inner_envelope, outer_envelope, exam_date, exam_time, quantity, pages, \
     percentage_catch, process_ids, status, stop_catch";

const DISPATCH_COLUMNS: &str = "id, project_id, lot_no, process_id, box_count, messenger_name, \
     messenger_mobile, dispatch_mode, vehicle_number, driver_name, driver_mobile, status, \
     dispatch_date, created_at, updated_at";

const TRANSACTION_COLUMNS: &str = "transaction_id, project_id, quantity_sheet_id, process_id, \
     lot_no, interim_quantity, remarks, voice_recording, zone_id, machine_id, status, alarm_id, \
     team_ids";

/// Load one project or fail with NotFound
pub async fn load_project(db: &PgPool, project_id: i32) -> AppResult<Project> {
    let row = sqlx::query_as::<_, ProjectRow>(
        "SELECT project_id, name, description, type_id, group_id, no_of_series, series_name, status \
         FROM projects WHERE project_id = $1",
    )
    .bind(project_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

    Ok(row.into())
}

/// Load a project's ordered process pipeline
pub async fn load_pipeline(db: &PgPool, project_id: i32) -> AppResult<Pipeline> {
    let rows = sqlx::query_as::<_, PipelineRow>(
        r#"
        SELECT pp.process_id, p.name AS process_name, pp.sequence, pp.weightage,
               p.process_type, p.range_start
        FROM project_processes pp
        JOIN processes p ON p.id = pp.process_id
        WHERE pp.project_id = $1
        ORDER BY pp.sequence
        "#,
    )
    .bind(project_id)
    .fetch_all(db)
    .await?;

    let entries = rows
        .into_iter()
        .map(|row| PipelineEntry {
            process_id: row.process_id,
            process_name: row.process_name,
            sequence: row.sequence,
            weightage: row.weightage,
            process_type: ProcessType::from_tag(row.process_type.as_deref()),
            range_start: row.range_start,
        })
        .collect();

    Ok(Pipeline::from_entries(entries))
}

/// Load every quantity sheet of a project
pub async fn load_project_sheets(db: &PgPool, project_id: i32) -> AppResult<Vec<QuantitySheet>> {
    let query = format!(
        "SELECT {SHEET_COLUMNS} FROM quantity_sheets WHERE project_id = $1 \
         ORDER BY quantity_sheet_id"
    );
    let rows = sqlx::query_as::<_, SheetRow>(&query)
        .bind(project_id)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Load every process transaction of a project
pub async fn load_project_transactions(
    db: &PgPool,
    project_id: i32,
) -> AppResult<Vec<ProcessTransaction>> {
    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM process_transactions WHERE project_id = $1 \
         ORDER BY transaction_id"
    );
    let rows = sqlx::query_as::<_, TransactionRow>(&query)
        .bind(project_id)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Load every dispatch of a project
pub async fn load_project_dispatches(db: &PgPool, project_id: i32) -> AppResult<Vec<Dispatch>> {
    let query = format!("SELECT {DISPATCH_COLUMNS} FROM dispatches WHERE project_id = $1 ORDER BY id");
    let rows = sqlx::query_as::<_, DispatchRow>(&query)
        .bind(project_id)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Load one dispatch by id or fail with NotFound
pub async fn load_dispatch(db: &PgPool, id: i32) -> AppResult<Dispatch> {
    let query = format!("SELECT {DISPATCH_COLUMNS} FROM dispatches WHERE id = $1");
    let row = sqlx::query_as::<_, DispatchRow>(&query)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Dispatch".to_string()))?;

    Ok(row.into())
}

/// Load all dispatches, newest first
pub async fn load_all_dispatches(db: &PgPool) -> AppResult<Vec<Dispatch>> {
    let query = format!("SELECT {DISPATCH_COLUMNS} FROM dispatches ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, DispatchRow>(&query)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Load every project on record
pub async fn load_all_projects(db: &PgPool) -> AppResult<Vec<Project>> {
    let rows = sqlx::query_as::<_, ProjectRow>(
        "SELECT project_id, name, description, type_id, group_id, no_of_series, series_name, \
         status FROM projects ORDER BY project_id",
    )
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Load every quantity sheet on record
pub async fn load_all_sheets(db: &PgPool) -> AppResult<Vec<QuantitySheet>> {
    let query = format!("SELECT {SHEET_COLUMNS} FROM quantity_sheets ORDER BY quantity_sheet_id");
    let rows = sqlx::query_as::<_, SheetRow>(&query)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Load every transaction that has not completed yet
pub async fn load_open_transactions(db: &PgPool) -> AppResult<Vec<ProcessTransaction>> {
    let query = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM process_transactions WHERE status <> 2 \
         ORDER BY transaction_id"
    );
    let rows = sqlx::query_as::<_, TransactionRow>(&query)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Load the dispatches of one (project, lot)
pub async fn load_lot_dispatches(
    db: &PgPool,
    project_id: i32,
    lot_no: &str,
) -> AppResult<Vec<Dispatch>> {
    let query = format!(
        "SELECT {DISPATCH_COLUMNS} FROM dispatches WHERE project_id = $1 AND lot_no = $2 \
         ORDER BY id"
    );
    let rows = sqlx::query_as::<_, DispatchRow>(&query)
        .bind(project_id)
        .bind(lot_no)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Load dispatches whose dispatch_date falls within [from, to)
pub async fn load_dispatches_between(
    db: &PgPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> AppResult<Vec<Dispatch>> {
    let query = format!(
        "SELECT {DISPATCH_COLUMNS} FROM dispatches \
         WHERE dispatch_date >= $1 AND dispatch_date < $2 ORDER BY dispatch_date"
    );
    let rows = sqlx::query_as::<_, DispatchRow>(&query)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Load the sheets of any of the given projects restricted to the given lots
pub async fn load_sheets_for_lots(
    db: &PgPool,
    project_ids: &[i32],
    lot_nos: &[String],
) -> AppResult<Vec<QuantitySheet>> {
    if project_ids.is_empty() || lot_nos.is_empty() {
        return Ok(Vec::new());
    }
    let query = format!(
        "SELECT {SHEET_COLUMNS} FROM quantity_sheets \
         WHERE project_id = ANY($1) AND lot_no = ANY($2) ORDER BY quantity_sheet_id"
    );
    let rows = sqlx::query_as::<_, SheetRow>(&query)
        .bind(project_ids)
        .bind(lot_nos)
        .fetch_all(db)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Resolve operator names for a set of user ids
pub async fn load_user_names(db: &PgPool, user_ids: &[Uuid]) -> AppResult<Vec<(Uuid, String)>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, (Uuid, String)>(
        "SELECT id, full_name FROM users WHERE id = ANY($1)",
    )
    .bind(user_ids)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
