//! Production reports over the audit trail and the live backlog.
//!
//! The completion reports read the event log rather than current
//! transaction state: a row completed and later reopened still counts
//! for the day it completed. Date filters are strict dd-MM-yyyy; a
//! single date and a start/end pair are both accepted, the pair winning
//! when both are sent.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use uuid::Uuid;

use shared::models::{STATUS_UPDATED_EVENT, TRANSACTION_CATEGORY};
use shared::production_status::{
    pending_process, under_production, PendingProcessFilter, PendingProcessGroup,
    UnderProductionLot,
};
use shared::types::{DateRange, Pagination, PaginationMeta};
use shared::validation::{parse_exam_date, parse_report_date, REPORT_DATE_FORMAT};

use crate::config::ReportsConfig;
use crate::error::{AppError, AppResult};
use crate::services::snapshot;

#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
    reports: ReportsConfig,
}

/// One (project, lot) group of completions in the window.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProductionRow {
    pub group_name: String,
    pub project_id: i32,
    pub type_id: i32,
    pub lot_no: String,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub count_of_catches: i64,
    pub total_quantity: Decimal,
}

/// Roll-up of the daily production detail rows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProductionSummary {
    pub total_groups: i64,
    pub total_lots: i64,
    pub total_count_of_catches: i64,
    pub total_projects: i64,
    pub total_quantity: Decimal,
}

/// Per-process completion volume split by project type.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessProductionRow {
    pub process_id: i32,
    pub completed_total_catches_in_booklet: i64,
    pub completed_total_quantity_in_booklet: Decimal,
    pub completed_total_catches_in_paper: i64,
    pub completed_total_quantity_in_paper: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessProductionTotals {
    pub completed_total_catches_in_booklet: i64,
    pub completed_total_quantity_in_booklet: Decimal,
    pub completed_total_catches_in_paper: i64,
    pub completed_total_quantity_in_paper: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessProductionReport {
    pub processes: Vec<ProcessProductionRow>,
    pub total: ProcessProductionTotals,
}

/// Two audit entries on the same transaction closer together than the
/// configured window.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickCompletionPair {
    pub first_event_id: i32,
    pub second_event_id: i32,
    pub transaction_id: i32,
    pub project_id: Option<i32>,
    pub group_id: Option<i32>,
    pub quantity_sheet_id: Option<i32>,
    pub catch_no: Option<String>,
    pub quantity: Option<Decimal>,
    pub first_logged_at: DateTime<Utc>,
    pub second_logged_at: DateTime<Utc>,
    pub first_triggered_by: Uuid,
    pub second_triggered_by: Uuid,
    pub time_difference_minutes: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickCompletionReport {
    pub start_date: String,
    pub end_date: String,
    pub data: Vec<QuickCompletionPair>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, sqlx::FromRow)]
struct CompletionLogRow {
    event_id: i32,
    transaction_id: i32,
    logged_at: DateTime<Utc>,
    event_triggered_by: Uuid,
}

#[derive(Debug, sqlx::FromRow)]
struct ReportTransactionRow {
    transaction_id: i32,
    project_id: i32,
    quantity_sheet_id: i32,
    process_id: i32,
    lot_no: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ReportSheetRow {
    quantity_sheet_id: i32,
    catch_no: String,
    quantity: Decimal,
    exam_date: String,
}

struct DailyGroup {
    group_name: String,
    count: i64,
    total_quantity: Decimal,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
}

impl ReportingService {
    pub fn new(db: PgPool, reports: ReportsConfig) -> Self {
        Self { db, reports }
    }

    /// Lots with active catches whose dispatch has not departed.
    pub async fn under_production_lots(&self) -> AppResult<Vec<UnderProductionLot>> {
        let projects = snapshot::load_all_projects(&self.db).await?;
        let sheets = snapshot::load_all_sheets(&self.db).await?;
        let dispatches = snapshot::load_all_dispatches(&self.db).await?;

        Ok(under_production(
            &projects,
            &sheets,
            &dispatches,
            self.reports.under_production_project_floor,
        ))
    }

    /// Open work per (project, lot, process) for one project group.
    pub async fn pending_processes(
        &self,
        filter: PendingProcessFilter,
    ) -> AppResult<Vec<PendingProcessGroup>> {
        let projects = snapshot::load_all_projects(&self.db).await?;
        let sheets = snapshot::load_all_sheets(&self.db).await?;
        let transactions = snapshot::load_open_transactions(&self.db).await?;
        let dispatches = snapshot::load_all_dispatches(&self.db).await?;

        let transaction_ids: Vec<i32> = transactions.iter().map(|t| t.transaction_id).collect();
        let latest_log_times = self.latest_log_times(&transaction_ids).await?;

        Ok(pending_process(
            &filter,
            &projects,
            &sheets,
            &transactions,
            &dispatches,
            &latest_log_times,
        ))
    }

    /// Completions per (project, lot) in the window.
    pub async fn daily_production(
        &self,
        date: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> AppResult<Vec<DailyProductionRow>> {
        let groups = self.daily_groups(date, start_date, end_date).await?;

        let rows = groups
            .into_iter()
            .map(|((project_id, type_id, _group_id, lot_no), g)| DailyProductionRow {
                group_name: g.group_name,
                project_id,
                type_id,
                lot_no,
                from_date: g.from_date.map(|d| d.format(REPORT_DATE_FORMAT).to_string()),
                to_date: g.to_date.map(|d| d.format(REPORT_DATE_FORMAT).to_string()),
                count_of_catches: g.count,
                total_quantity: g.total_quantity,
            })
            .collect();

        Ok(rows)
    }

    /// Totals across the daily production groups.
    pub async fn daily_production_summary(
        &self,
        date: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> AppResult<DailyProductionSummary> {
        let groups = self.daily_groups(date, start_date, end_date).await?;

        let group_ids: BTreeSet<i32> = groups.keys().map(|k| k.2).collect();
        let project_ids: BTreeSet<i32> = groups.keys().map(|k| k.0).collect();

        Ok(DailyProductionSummary {
            total_groups: group_ids.len() as i64,
            total_lots: groups.len() as i64,
            total_count_of_catches: groups.values().map(|g| g.count).sum(),
            total_projects: project_ids.len() as i64,
            total_quantity: groups.values().map(|g| g.total_quantity).sum(),
        })
    }

    /// Completions per process split into booklet and paper volume.
    #[allow(clippy::too_many_arguments)]
    pub async fn process_production(
        &self,
        date: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        group_id: Option<i32>,
        process_id: Option<i32>,
        project_id: Option<i32>,
        booklet_type_id: i32,
        paper_type_id: i32,
    ) -> AppResult<ProcessProductionReport> {
        let window = parse_window(date, start_date, end_date)?;
        let (from, to) = window.map_or((None, None), |w| (Some(w.start), Some(w.end)));

        let transaction_ids = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT DISTINCT transaction_id FROM event_logs
            WHERE category = $1 AND event = $2 AND old_value = '1' AND new_value = '2'
              AND transaction_id IS NOT NULL
              AND ($3::DATE IS NULL OR logged_at::DATE >= $3)
              AND ($4::DATE IS NULL OR logged_at::DATE <= $4)
            "#,
        )
        .bind(TRANSACTION_CATEGORY)
        .bind(STATUS_UPDATED_EVENT)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        let mut report = ProcessProductionReport {
            processes: Vec::new(),
            total: ProcessProductionTotals {
                completed_total_catches_in_booklet: 0,
                completed_total_quantity_in_booklet: Decimal::ZERO,
                completed_total_catches_in_paper: 0,
                completed_total_quantity_in_paper: Decimal::ZERO,
            },
        };
        if transaction_ids.is_empty() {
            return Ok(report);
        }

        let transactions = sqlx::query_as::<_, ReportTransactionRow>(
            r#"
            SELECT transaction_id, project_id, quantity_sheet_id, process_id, lot_no
            FROM process_transactions
            WHERE transaction_id = ANY($1)
              AND ($2::INTEGER IS NULL OR process_id = $2)
              AND ($3::INTEGER IS NULL OR project_id = $3)
            "#,
        )
        .bind(&transaction_ids)
        .bind(process_id)
        .bind(project_id)
        .fetch_all(&self.db)
        .await?;

        let project_ids: Vec<i32> = transactions
            .iter()
            .map(|t| t.project_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let type_by_project: HashMap<i32, i32> = sqlx::query_as::<_, (i32, i32)>(
            r#"
            SELECT project_id, type_id FROM projects
            WHERE project_id = ANY($1) AND ($2::INTEGER IS NULL OR group_id = $2)
            "#,
        )
        .bind(&project_ids)
        .bind(group_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .collect();

        let valid: Vec<&ReportTransactionRow> = transactions
            .iter()
            .filter(|t| type_by_project.contains_key(&t.project_id))
            .collect();

        let sheet_ids: Vec<i32> = valid
            .iter()
            .map(|t| t.quantity_sheet_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let quantities = self.sheet_quantities(&sheet_ids).await?;

        let process_ids: BTreeSet<i32> = valid.iter().map(|t| t.process_id).collect();
        for pid in process_ids {
            let sheets_of = |type_id: i32| -> BTreeSet<i32> {
                valid
                    .iter()
                    .filter(|t| {
                        t.process_id == pid && type_by_project.get(&t.project_id) == Some(&type_id)
                    })
                    .map(|t| t.quantity_sheet_id)
                    .collect()
            };

            let booklet = sheets_of(booklet_type_id);
            let paper = sheets_of(paper_type_id);
            let quantity_of = |ids: &BTreeSet<i32>| -> Decimal {
                ids.iter().filter_map(|id| quantities.get(id)).copied().sum()
            };

            let row = ProcessProductionRow {
                process_id: pid,
                completed_total_catches_in_booklet: booklet.len() as i64,
                completed_total_quantity_in_booklet: quantity_of(&booklet),
                completed_total_catches_in_paper: paper.len() as i64,
                completed_total_quantity_in_paper: quantity_of(&paper),
            };

            report.total.completed_total_catches_in_booklet += row.completed_total_catches_in_booklet;
            report.total.completed_total_quantity_in_booklet += row.completed_total_quantity_in_booklet;
            report.total.completed_total_catches_in_paper += row.completed_total_catches_in_paper;
            report.total.completed_total_quantity_in_paper += row.completed_total_quantity_in_paper;
            report.processes.push(row);
        }

        Ok(report)
    }

    /// Status updates on the same transaction recorded suspiciously close
    /// together. Requires a date or a start/end pair.
    pub async fn quick_completions(
        &self,
        date: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        pagination: Pagination,
    ) -> AppResult<QuickCompletionReport> {
        let (window_start, window_end) = match (date, start_date, end_date) {
            (Some(d), _, _) => {
                let day = parse_report_date(d).map_err(|_| {
                    AppError::ValidationError("Invalid date format. Use dd-MM-yyyy.".to_string())
                })?;
                (day, day + Duration::days(1))
            }
            (None, Some(s), Some(e)) => {
                let start = parse_report_date(s).map_err(|_| {
                    AppError::ValidationError(
                        "Invalid startDate format. Use dd-MM-yyyy.".to_string(),
                    )
                })?;
                let end = parse_report_date(e).map_err(|_| {
                    AppError::ValidationError("Invalid endDate format. Use dd-MM-yyyy.".to_string())
                })?;
                (start, end + Duration::days(1))
            }
            _ => {
                return Err(AppError::ValidationError(
                    "Please provide either 'date' or both 'startDate' and 'endDate'.".to_string(),
                ))
            }
        };

        let start = window_start.and_time(NaiveTime::MIN).and_utc();
        let end = window_end.and_time(NaiveTime::MIN).and_utc();

        let logs = sqlx::query_as::<_, CompletionLogRow>(
            r#"
            SELECT event_id, transaction_id, logged_at, event_triggered_by
            FROM event_logs
            WHERE event = $1 AND transaction_id IS NOT NULL
              AND logged_at >= $2 AND logged_at < $3
            ORDER BY transaction_id, logged_at, event_id
            "#,
        )
        .bind(STATUS_UPDATED_EVENT)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        let transaction_ids: Vec<i32> = logs
            .iter()
            .map(|l| l.transaction_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let transactions: HashMap<i32, ReportTransactionRow> = if transaction_ids.is_empty() {
            HashMap::new()
        } else {
            sqlx::query_as::<_, ReportTransactionRow>(
                "SELECT transaction_id, project_id, quantity_sheet_id, process_id, lot_no \
                 FROM process_transactions WHERE transaction_id = ANY($1)",
            )
            .bind(&transaction_ids)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(|t| (t.transaction_id, t))
            .collect()
        };

        let sheet_ids: Vec<i32> = transactions
            .values()
            .map(|t| t.quantity_sheet_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let sheets = self.sheet_rows(&sheet_ids).await?;

        let project_ids: Vec<i32> = transactions
            .values()
            .map(|t| t.project_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let group_by_project: HashMap<i32, i32> = if project_ids.is_empty() {
            HashMap::new()
        } else {
            sqlx::query_as::<_, (i32, i32)>(
                "SELECT project_id, group_id FROM projects WHERE project_id = ANY($1)",
            )
            .bind(&project_ids)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .collect()
        };

        let window_seconds = self.reports.quick_completion_window_minutes * 60;
        let mut pairs = Vec::new();
        let mut index = 0;
        while index < logs.len() {
            let mut next = index + 1;
            while next < logs.len() && logs[next].transaction_id == logs[index].transaction_id {
                next += 1;
            }
            let group = &logs[index..next];
            for (i, first) in group.iter().enumerate() {
                for second in &group[i + 1..] {
                    let delta = second.logged_at - first.logged_at;
                    if delta.num_seconds().abs() >= window_seconds {
                        continue;
                    }
                    let transaction = transactions.get(&first.transaction_id);
                    let sheet = transaction.and_then(|t| sheets.get(&t.quantity_sheet_id));
                    pairs.push(QuickCompletionPair {
                        first_event_id: first.event_id,
                        second_event_id: second.event_id,
                        transaction_id: first.transaction_id,
                        project_id: transaction.map(|t| t.project_id),
                        group_id: transaction
                            .and_then(|t| group_by_project.get(&t.project_id).copied()),
                        quantity_sheet_id: transaction.map(|t| t.quantity_sheet_id),
                        catch_no: sheet.map(|s| s.catch_no.clone()),
                        quantity: sheet.map(|s| s.quantity),
                        first_logged_at: first.logged_at,
                        second_logged_at: second.logged_at,
                        first_triggered_by: first.event_triggered_by,
                        second_triggered_by: second.event_triggered_by,
                        time_difference_minutes: delta.num_minutes().abs(),
                    });
                }
            }
            index = next;
        }

        let total_items = pairs.len() as u64;
        let data = pairs
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.per_page as usize)
            .collect();

        Ok(QuickCompletionReport {
            start_date: window_start.format(REPORT_DATE_FORMAT).to_string(),
            end_date: (window_end - Duration::days(1))
                .format(REPORT_DATE_FORMAT)
                .to_string(),
            data,
            pagination: PaginationMeta {
                page: pagination.page,
                per_page: pagination.per_page,
                total_items,
                total_pages: pagination.total_pages(total_items),
            },
        })
    }

    /// Serialize report rows as CSV.
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }

    async fn daily_groups(
        &self,
        date: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> AppResult<BTreeMap<(i32, i32, i32, String), DailyGroup>> {
        let window = parse_window(date, start_date, end_date)?;
        let (from, to) = window.map_or((None, None), |w| (Some(w.start), Some(w.end)));

        let transaction_ids = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT DISTINCT transaction_id FROM event_logs
            WHERE event = $1 AND new_value = '2' AND transaction_id IS NOT NULL
              AND ($2::DATE IS NULL OR logged_at::DATE >= $2)
              AND ($3::DATE IS NULL OR logged_at::DATE <= $3)
            "#,
        )
        .bind(STATUS_UPDATED_EVENT)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        let mut groups: BTreeMap<(i32, i32, i32, String), DailyGroup> = BTreeMap::new();
        if transaction_ids.is_empty() {
            return Ok(groups);
        }

        let transactions = sqlx::query_as::<_, ReportTransactionRow>(
            "SELECT transaction_id, project_id, quantity_sheet_id, process_id, lot_no \
             FROM process_transactions WHERE transaction_id = ANY($1)",
        )
        .bind(&transaction_ids)
        .fetch_all(&self.db)
        .await?;

        let sheet_ids: Vec<i32> = transactions
            .iter()
            .map(|t| t.quantity_sheet_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let sheets = self.sheet_rows(&sheet_ids).await?;

        let project_ids: Vec<i32> = transactions
            .iter()
            .map(|t| t.project_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let projects: HashMap<i32, (i32, i32)> = sqlx::query_as::<_, (i32, i32, i32)>(
            "SELECT project_id, type_id, group_id FROM projects WHERE project_id = ANY($1)",
        )
        .bind(&project_ids)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(id, type_id, group_id)| (id, (type_id, group_id)))
        .collect();

        let group_ids: Vec<i32> = projects
            .values()
            .map(|(_, group_id)| *group_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let group_names: HashMap<i32, String> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            sqlx::query_as::<_, (i32, String)>("SELECT id, name FROM groups WHERE id = ANY($1)")
                .bind(&group_ids)
                .fetch_all(&self.db)
                .await?
                .into_iter()
                .collect()
        };

        for transaction in &transactions {
            let (type_id, group_id) = match projects.get(&transaction.project_id) {
                Some(&ids) => ids,
                None => continue,
            };
            let sheet = match sheets.get(&transaction.quantity_sheet_id) {
                Some(s) => s,
                None => continue,
            };

            let entry = groups
                .entry((
                    transaction.project_id,
                    type_id,
                    group_id,
                    transaction.lot_no.clone(),
                ))
                .or_insert_with(|| DailyGroup {
                    group_name: group_names
                        .get(&group_id)
                        .cloned()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    count: 0,
                    total_quantity: Decimal::ZERO,
                    from_date: None,
                    to_date: None,
                });
            entry.count += 1;
            entry.total_quantity += sheet.quantity;
            if let Some(d) = parse_exam_date(&sheet.exam_date) {
                entry.from_date = Some(entry.from_date.map_or(d, |cur| cur.min(d)));
                entry.to_date = Some(entry.to_date.map_or(d, |cur| cur.max(d)));
            }
        }

        Ok(groups)
    }

    async fn sheet_rows(&self, sheet_ids: &[i32]) -> AppResult<HashMap<i32, ReportSheetRow>> {
        if sheet_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, ReportSheetRow>(
            "SELECT quantity_sheet_id, catch_no, quantity, exam_date \
             FROM quantity_sheets WHERE quantity_sheet_id = ANY($1)",
        )
        .bind(sheet_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| (r.quantity_sheet_id, r)).collect())
    }

    async fn sheet_quantities(&self, sheet_ids: &[i32]) -> AppResult<HashMap<i32, Decimal>> {
        if sheet_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, (i32, Decimal)>(
            "SELECT quantity_sheet_id, quantity FROM quantity_sheets WHERE quantity_sheet_id = ANY($1)",
        )
        .bind(sheet_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().collect())
    }

    async fn latest_log_times(
        &self,
        transaction_ids: &[i32],
    ) -> AppResult<HashMap<i32, DateTime<Utc>>> {
        if transaction_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, (i32, DateTime<Utc>)>(
            "SELECT transaction_id, MAX(logged_at) FROM event_logs \
             WHERE transaction_id = ANY($1) GROUP BY transaction_id",
        )
        .bind(transaction_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().collect())
    }
}

/// Resolve the optional dd-MM-yyyy filters into an inclusive date window.
fn parse_window(
    date: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> AppResult<Option<DateRange>> {
    let single = match date {
        Some(raw) => Some(parse_report_date(raw).map_err(|_| {
            AppError::ValidationError("Invalid date format. Use dd-MM-yyyy.".to_string())
        })?),
        None => None,
    };
    let start = match start_date {
        Some(raw) => Some(parse_report_date(raw).map_err(|_| {
            AppError::ValidationError("Invalid startDate format. Use dd-MM-yyyy.".to_string())
        })?),
        None => None,
    };
    let end = match end_date {
        Some(raw) => Some(parse_report_date(raw).map_err(|_| {
            AppError::ValidationError("Invalid endDate format. Use dd-MM-yyyy.".to_string())
        })?),
        None => None,
    };

    match (start, end, single) {
        (Some(s), Some(e), _) => Ok(Some(DateRange { start: s, end: e })),
        (_, _, Some(d)) => Ok(Some(DateRange { start: d, end: d })),
        _ => Ok(None),
    }
}
