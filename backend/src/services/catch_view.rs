//! Catch status board and catch search.
//!
//! The board shows every catch of a (project, lot) with its production
//! status, the last process that touched it and the floor resources the
//! work passed through. Search is a prefix match across the descriptive
//! columns of the quantity sheets.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

use shared::models::{Dispatch, Machine, Process, ProcessTransaction, QuantitySheet, Team, Zone};
use shared::pipeline::PipelineConstants;
use shared::production_status::catch_status;
use shared::types::{PaginatedResponse, Pagination, PaginationMeta, ProcessType};

use crate::error::{AppError, AppResult};
use crate::services::snapshot;

#[derive(Clone)]
pub struct CatchViewService {
    db: PgPool,
    constants: PipelineConstants,
}

/// One catch on the status board.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchStatusRow {
    pub catch_no: String,
    pub paper: Option<String>,
    pub exam_date: String,
    pub exam_time: Option<String>,
    pub course: Option<String>,
    pub subject: Option<String>,
    pub inner_envelope: Option<String>,
    pub outer_envelope: Option<i32>,
    pub lot_no: String,
    pub quantity: Decimal,
    pub pages: Option<i32>,
    pub status: i32,
    pub process_names: Vec<String>,
    pub catch_status: &'static str,
    pub completion_process_started: bool,
    pub current_process_name: Option<String>,
    /// yyyy-MM-dd of the covering dispatch, or "Not Available"
    pub dispatch_date: String,
    pub transaction_data: CatchTransactionData,
}

/// Floor resources recorded against a catch's transactions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchTransactionData {
    pub zone_descriptions: Vec<String>,
    pub team_details: Vec<TeamDetail>,
    pub machine_names: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetail {
    pub team_name: String,
    pub user_names: Vec<String>,
}

/// One search hit with the column the query matched on.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchSearchHit {
    pub catch_no: String,
    pub matched_column: &'static str,
    pub matched_value: String,
    pub project_id: i32,
    pub lot_no: String,
}

#[derive(Debug, sqlx::FromRow)]
struct SearchRow {
    catch_no: String,
    subject: Option<String>,
    course: Option<String>,
    paper: Option<String>,
    project_id: i32,
    lot_no: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ProcessRow {
    id: i32,
    name: String,
    weightage: Decimal,
    status: bool,
    process_type: Option<String>,
    range_start: Option<i32>,
    range_end: Option<i32>,
}

impl From<ProcessRow> for Process {
    fn from(row: ProcessRow) -> Self {
        Process {
            id: row.id,
            name: row.name,
            weightage: row.weightage,
            status: row.status,
            process_type: ProcessType::from_tag(row.process_type.as_deref()),
            range_start: row.range_start,
            range_end: row.range_end,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ZoneRow {
    zone_id: i32,
    zone_no: String,
    zone_description: Option<String>,
}

impl From<ZoneRow> for Zone {
    fn from(row: ZoneRow) -> Self {
        Zone {
            zone_id: row.zone_id,
            zone_no: row.zone_no,
            zone_description: row.zone_description,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MachineRow {
    machine_id: i32,
    machine_name: String,
    status: bool,
}

impl From<MachineRow> for Machine {
    fn from(row: MachineRow) -> Self {
        Machine {
            machine_id: row.machine_id,
            machine_name: row.machine_name,
            status: row.status,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TeamRow {
    team_id: i32,
    team_name: String,
    user_ids: Vec<Uuid>,
    status: bool,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team {
            team_id: row.team_id,
            team_name: row.team_name,
            user_ids: row.user_ids,
            status: row.status,
        }
    }
}

impl CatchViewService {
    pub fn new(db: PgPool, constants: PipelineConstants) -> Self {
        Self { db, constants }
    }

    /// The status board for a project, optionally narrowed to one lot.
    pub async fn status_board(
        &self,
        project_id: i32,
        lot_no: Option<&str>,
    ) -> AppResult<Vec<CatchStatusRow>> {
        let sheets: Vec<QuantitySheet> = snapshot::load_project_sheets(&self.db, project_id)
            .await?
            .into_iter()
            .filter(|s| lot_no.map_or(true, |lot| s.lot_no == lot))
            .collect();
        if sheets.is_empty() {
            return Ok(Vec::new());
        }

        let transactions = snapshot::load_project_transactions(&self.db, project_id).await?;
        let dispatches = snapshot::load_project_dispatches(&self.db, project_id).await?;

        let processes = self.process_lookup().await?;
        let zones = self.zone_lookup().await?;
        let machines = self.machine_lookup().await?;
        let teams = self.team_lookup().await?;

        let member_ids: Vec<Uuid> = teams
            .values()
            .flat_map(|t| t.user_ids.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let user_names: HashMap<Uuid, String> = snapshot::load_user_names(&self.db, &member_ids)
            .await?
            .into_iter()
            .collect();

        let rows = sheets
            .into_iter()
            .map(|sheet| {
                self.board_row(
                    sheet,
                    &transactions,
                    &dispatches,
                    &processes,
                    &zones,
                    &machines,
                    &teams,
                    &user_names,
                )
            })
            .collect();

        Ok(rows)
    }

    async fn process_lookup(&self) -> AppResult<HashMap<i32, Process>> {
        let rows = sqlx::query_as::<_, ProcessRow>(
            "SELECT id, name, weightage, status, process_type, range_start, range_end \
             FROM processes",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(Process::from)
            .map(|p| (p.id, p))
            .collect())
    }

    async fn zone_lookup(&self) -> AppResult<HashMap<i32, Zone>> {
        let rows =
            sqlx::query_as::<_, ZoneRow>("SELECT zone_id, zone_no, zone_description FROM zones")
                .fetch_all(&self.db)
                .await?;

        Ok(rows
            .into_iter()
            .map(Zone::from)
            .map(|z| (z.zone_id, z))
            .collect())
    }

    async fn machine_lookup(&self) -> AppResult<HashMap<i32, Machine>> {
        let rows = sqlx::query_as::<_, MachineRow>(
            "SELECT machine_id, machine_name, status FROM machines",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(Machine::from)
            .map(|m| (m.machine_id, m))
            .collect())
    }

    async fn team_lookup(&self) -> AppResult<HashMap<i32, Team>> {
        let rows =
            sqlx::query_as::<_, TeamRow>("SELECT team_id, team_name, user_ids, status FROM teams")
                .fetch_all(&self.db)
                .await?;

        Ok(rows
            .into_iter()
            .map(Team::from)
            .map(|t| (t.team_id, t))
            .collect())
    }

    #[allow(clippy::too_many_arguments)]
    fn board_row(
        &self,
        sheet: QuantitySheet,
        transactions: &[ProcessTransaction],
        dispatches: &[Dispatch],
        processes: &HashMap<i32, Process>,
        zones: &HashMap<i32, Zone>,
        machines: &HashMap<i32, Machine>,
        teams: &HashMap<i32, Team>,
        user_names: &HashMap<Uuid, String>,
    ) -> CatchStatusRow {
        let related: Vec<&ProcessTransaction> = transactions
            .iter()
            .filter(|t| t.quantity_sheet_id == sheet.quantity_sheet_id)
            .collect();

        let status = catch_status(&sheet, transactions, self.constants.completion_process_id);
        let completion_process_started = related
            .iter()
            .any(|t| t.process_id == self.constants.completion_process_id);

        let current_process_name = related
            .iter()
            .max_by_key(|t| t.transaction_id)
            .and_then(|t| processes.get(&t.process_id).map(|p| p.name.clone()));

        let named_processes = sheet
            .process_ids
            .iter()
            .filter_map(|id| processes.get(id).map(|p| p.name.clone()))
            .collect();

        let dispatch_date = dispatches
            .iter()
            .find(|d| d.lot_no == sheet.lot_no)
            .and_then(|d| d.updated_at)
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "Not Available".to_string());

        let zone_descriptions: Vec<String> = related
            .iter()
            .map(|t| t.zone_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| zones.get(&id).and_then(|z| z.zone_description.clone()))
            .collect();

        let team_details: Vec<TeamDetail> = related
            .iter()
            .flat_map(|t| t.team_ids.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| teams.get(&id))
            .map(|team| TeamDetail {
                team_name: team.team_name.clone(),
                user_names: team
                    .user_ids
                    .iter()
                    .filter_map(|uid| user_names.get(uid).cloned())
                    .collect(),
            })
            .collect();

        let machine_names: Vec<String> = related
            .iter()
            .map(|t| t.machine_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| machines.get(&id).map(|m| m.machine_name.clone()))
            .collect();

        CatchStatusRow {
            catch_no: sheet.catch_no,
            paper: sheet.paper,
            exam_date: sheet.exam_date,
            exam_time: sheet.exam_time,
            course: sheet.course,
            subject: sheet.subject,
            inner_envelope: sheet.inner_envelope,
            outer_envelope: sheet.outer_envelope,
            lot_no: sheet.lot_no,
            quantity: sheet.quantity,
            pages: sheet.pages,
            status: sheet.status,
            process_names: named_processes,
            catch_status: status.label(),
            completion_process_started,
            current_process_name,
            dispatch_date,
            transaction_data: CatchTransactionData {
                zone_descriptions,
                team_details,
                machine_names,
            },
        }
    }

    /// Prefix search over catch_no, subject, course and paper.
    ///
    /// Each hit names the first column that matched, in that priority
    /// order. Optional group and project filters narrow the scope.
    pub async fn search(
        &self,
        query: &str,
        pagination: Pagination,
        group_id: Option<i32>,
        project_id: Option<i32>,
    ) -> AppResult<PaginatedResponse<CatchSearchHit>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(AppError::ValidationError(
                "Search query cannot be empty".to_string(),
            ));
        }
        let pattern = format!("{needle}%");

        let filter = r#"
            WHERE ($1::INTEGER IS NULL OR project_id = $1)
              AND ($2::INTEGER IS NULL
                   OR project_id IN (SELECT project_id FROM projects WHERE group_id = $2))
              AND (LOWER(catch_no) LIKE $3 OR LOWER(subject) LIKE $3
                   OR LOWER(course) LIKE $3 OR LOWER(paper) LIKE $3)
        "#;

        let count_query = format!("SELECT COUNT(*) FROM quantity_sheets {filter}");
        let total_items = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(project_id)
            .bind(group_id)
            .bind(&pattern)
            .fetch_one(&self.db)
            .await? as u64;

        let page_query = format!(
            "SELECT catch_no, subject, course, paper, project_id, lot_no \
             FROM quantity_sheets {filter} ORDER BY quantity_sheet_id LIMIT $4 OFFSET $5"
        );
        let rows = sqlx::query_as::<_, SearchRow>(&page_query)
            .bind(project_id)
            .bind(group_id)
            .bind(&pattern)
            .bind(pagination.per_page as i64)
            .bind(pagination.offset() as i64)
            .fetch_all(&self.db)
            .await?;

        let data = rows
            .into_iter()
            .map(|row| {
                let (matched_column, matched_value) = matched_column(&needle, &row);
                CatchSearchHit {
                    catch_no: row.catch_no,
                    matched_column,
                    matched_value,
                    project_id: row.project_id,
                    lot_no: row.lot_no,
                }
            })
            .collect();

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta {
                page: pagination.page,
                per_page: pagination.per_page,
                total_items,
                total_pages: pagination.total_pages(total_items),
            },
        })
    }
}

/// First matching column in priority order CatchNo, Subject, Course, Paper.
fn matched_column(needle: &str, row: &SearchRow) -> (&'static str, String) {
    let starts = |value: &Option<String>| {
        value
            .as_deref()
            .map_or(false, |v| v.to_lowercase().starts_with(needle))
    };

    if row.catch_no.to_lowercase().starts_with(needle) {
        ("CatchNo", row.catch_no.clone())
    } else if starts(&row.subject) {
        ("Subject", row.subject.clone().unwrap_or_default())
    } else if starts(&row.course) {
        ("Course", row.course.clone().unwrap_or_default())
    } else {
        ("Paper", row.paper.clone().unwrap_or_default())
    }
}
