//! Under-production and pending-process derivations
//!
//! Both views answer "what has not shipped yet". Under-production lists
//! every live (project, lot) pair without a departed dispatch;
//! pending-process breaks the backlog down to the processes still open
//! on each catch.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Dispatch, ProcessTransaction, Project, QuantitySheet};
use crate::types::CatchStatus;
use crate::validation::parse_exam_date;

/// One live lot that has not been dispatched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderProductionLot {
    pub project_id: i32,
    pub project_name: String,
    pub group_id: i32,
    pub type_id: i32,
    pub lot_no: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub total_catches: i64,
    pub total_quantity: Decimal,
}

/// Lots still in production, ordered by (project, lot).
///
/// A lot counts as under production until its dispatch departs: a
/// missing dispatch row or one still pending with a planned date keeps
/// the lot listed. Unparseable exam dates are left out of the date
/// range rather than poisoning it.
pub fn under_production(
    projects: &[Project],
    sheets: &[QuantitySheet],
    dispatches: &[Dispatch],
    project_id_floor: i32,
) -> Vec<UnderProductionLot> {
    let projects_by_id: HashMap<i32, &Project> = projects
        .iter()
        .filter(|p| p.project_id >= project_id_floor)
        .map(|p| (p.project_id, p))
        .collect();

    struct LotAccumulator {
        total_catches: i64,
        total_quantity: Decimal,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    }

    let mut lots: BTreeMap<(i32, String), LotAccumulator> = BTreeMap::new();
    for sheet in sheets.iter().filter(|s| s.is_active()) {
        let entry = lots
            .entry((sheet.project_id, sheet.lot_no.clone()))
            .or_insert(LotAccumulator {
                total_catches: 0,
                total_quantity: Decimal::ZERO,
                from_date: None,
                to_date: None,
            });
        entry.total_catches += 1;
        entry.total_quantity += sheet.quantity;
        if let Some(date) = parse_exam_date(&sheet.exam_date) {
            entry.from_date = Some(entry.from_date.map_or(date, |d| d.min(date)));
            entry.to_date = Some(entry.to_date.map_or(date, |d| d.max(date)));
        }
    }

    let mut result = Vec::new();
    for ((project_id, lot_no), data) in lots {
        let project = match projects_by_id.get(&project_id) {
            Some(p) => p,
            None => continue,
        };
        let dispatch = dispatches
            .iter()
            .find(|d| d.project_id == project_id && d.lot_no == lot_no);
        let still_in_production = match dispatch {
            None => true,
            Some(d) => d.is_pending(),
        };
        if !still_in_production {
            continue;
        }
        result.push(UnderProductionLot {
            project_id,
            project_name: project.name.clone(),
            group_id: project.group_id,
            type_id: project.type_id,
            lot_no,
            from_date: data.from_date,
            to_date: data.to_date,
            total_catches: data.total_catches,
            total_quantity: data.total_quantity,
        });
    }
    result
}

/// Filters for the pending-process breakdown. Group is mandatory; the
/// rest narrow the result.
#[derive(Debug, Clone)]
pub struct PendingProcessFilter {
    pub group_id: i32,
    pub project_id: Option<i32>,
    pub lot_no: Option<String>,
    pub process_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCatch {
    pub catch_no: String,
    pub quantity: Decimal,
}

/// One (project, lot, process) group of the pending backlog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingProcessGroup {
    pub project_id: i32,
    pub lot_no: String,
    pub process_id: i32,
    pub type_id: i32,
    pub total_catch_count: i64,
    pub total_quantity: Decimal,
    pub last_logged_at: Option<DateTime<Utc>>,
    /// Populated only when the filter names a process.
    pub catch_details: Option<Vec<PendingCatch>>,
}

/// Open work grouped by (project, lot, process) for one project group.
///
/// A catch participates through each of its not-yet-completed
/// transactions; dispatched lots drop out entirely. `latest_log_times`
/// maps transaction ids to their most recent audit entry and supplies
/// the group's last-activity stamp.
pub fn pending_process(
    filter: &PendingProcessFilter,
    projects: &[Project],
    sheets: &[QuantitySheet],
    transactions: &[ProcessTransaction],
    dispatches: &[Dispatch],
    latest_log_times: &HashMap<i32, DateTime<Utc>>,
) -> Vec<PendingProcessGroup> {
    let open: Vec<&ProcessTransaction> = transactions
        .iter()
        .filter(|t| t.status != 2)
        .filter(|t| filter.process_id.map_or(true, |p| t.process_id == p))
        .collect();
    let open_sheet_ids: HashSet<i32> = open.iter().map(|t| t.quantity_sheet_id).collect();

    let candidates: Vec<&QuantitySheet> = sheets
        .iter()
        .filter(|q| {
            q.is_active() && !q.lot_no.is_empty() && open_sheet_ids.contains(&q.quantity_sheet_id)
        })
        .filter(|q| filter.project_id.map_or(true, |p| q.project_id == p))
        .filter(|q| filter.lot_no.as_deref().map_or(true, |l| q.lot_no == l))
        .collect();

    let relevant_dispatches: Vec<&Dispatch> = dispatches
        .iter()
        .filter(|d| !d.lot_no.is_empty())
        .filter(|d| filter.project_id.map_or(true, |p| d.project_id == p))
        .filter(|d| filter.lot_no.as_deref().map_or(true, |l| d.lot_no == l))
        .collect();

    let pending: Vec<&QuantitySheet> = candidates
        .into_iter()
        .filter(|q| {
            !relevant_dispatches
                .iter()
                .any(|d| d.project_id == q.project_id && d.lot_no.eq_ignore_ascii_case(&q.lot_no))
        })
        .collect();

    let group_type_ids: HashMap<i32, i32> = projects
        .iter()
        .filter(|p| p.group_id == filter.group_id)
        .map(|p| (p.project_id, p.type_id))
        .collect();

    struct GroupAccumulator<'a> {
        type_id: i32,
        members: Vec<&'a QuantitySheet>,
    }

    let mut groups: BTreeMap<(i32, String, i32), GroupAccumulator> = BTreeMap::new();
    for sheet in &pending {
        let type_id = match group_type_ids.get(&sheet.project_id) {
            Some(&t) => t,
            None => continue,
        };
        for transaction in open
            .iter()
            .filter(|t| t.quantity_sheet_id == sheet.quantity_sheet_id)
        {
            groups
                .entry((sheet.project_id, sheet.lot_no.clone(), transaction.process_id))
                .or_insert_with(|| GroupAccumulator {
                    type_id,
                    members: Vec::new(),
                })
                .members
                .push(sheet);
        }
    }

    let mut result = Vec::with_capacity(groups.len());
    for ((project_id, lot_no, process_id), group) in groups {
        let member_ids: HashSet<i32> =
            group.members.iter().map(|s| s.quantity_sheet_id).collect();
        let last_transaction_id = open
            .iter()
            .filter(|t| t.process_id == process_id && member_ids.contains(&t.quantity_sheet_id))
            .map(|t| t.transaction_id)
            .max();
        let last_logged_at =
            last_transaction_id.and_then(|id| latest_log_times.get(&id).copied());

        let total_quantity: Decimal = group.members.iter().map(|s| s.quantity).sum();
        let catch_details = filter.process_id.map(|_| {
            group
                .members
                .iter()
                .map(|s| PendingCatch {
                    catch_no: s.catch_no.clone(),
                    quantity: s.quantity,
                })
                .collect()
        });

        result.push(PendingProcessGroup {
            project_id,
            lot_no,
            process_id,
            type_id: group.type_id,
            total_catch_count: group.members.len() as i64,
            total_quantity,
            last_logged_at,
            catch_details,
        });
    }
    result
}

/// Board status of one catch from its transactions.
///
/// Completed requires the completion process to have finished; any
/// other recorded process activity reads as running.
pub fn catch_status(
    sheet: &QuantitySheet,
    transactions: &[ProcessTransaction],
    completion_process_id: i32,
) -> CatchStatus {
    let mut touched = false;
    let mut outside_completion = false;
    for transaction in transactions
        .iter()
        .filter(|t| t.quantity_sheet_id == sheet.quantity_sheet_id)
    {
        touched = true;
        if transaction.process_id == completion_process_id && transaction.is_completed() {
            return CatchStatus::Completed;
        }
        if transaction.process_id != completion_process_id {
            outside_completion = true;
        }
    }
    if touched && outside_completion {
        CatchStatus::Running
    } else {
        CatchStatus::Pending
    }
}
