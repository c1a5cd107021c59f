//! Weighted completion aggregation
//!
//! Three read models over the same inputs: the per-project rollup shown on
//! dashboards, the combined per-lot breakdown, and per-process progress.
//! Each catch earns the weightage of the pipeline processes it has
//! completed; catch percentages roll up into lots by `percentage_catch`
//! and lots roll up into the project by quantity share.
//!
//! All percentages are rounded to two decimals at the same points the
//! historical reports rounded, so stored snapshots stay comparable.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Dispatch, ProcessTransaction, QuantitySheet};
use crate::pipeline::{Pipeline, PipelineConstants};
use crate::types::CatchScope;

/// Everything the completion engines read for one project.
#[derive(Debug, Clone, Copy)]
pub struct CompletionInputs<'a> {
    pub pipeline: &'a Pipeline,
    pub sheets: &'a [QuantitySheet],
    pub transactions: &'a [ProcessTransaction],
    pub dispatches: &'a [Dispatch],
    pub constants: &'a PipelineConstants,
}

/// Per-project rollup.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCompletion {
    pub completion_percentage: Decimal,
    pub total_quantity: Decimal,
    pub lot_percentages: BTreeMap<String, Decimal>,
    pub lot_quantities: BTreeMap<String, Decimal>,
}

/// Combined per-lot breakdown, shaped for the dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CombinedPercentages {
    pub total_lot_percentages: BTreeMap<String, Decimal>,
    pub lot_quantities: BTreeMap<String, Decimal>,
    pub lot_weightages: BTreeMap<String, Decimal>,
    pub project_lot_percentages: BTreeMap<String, Decimal>,
    pub total_project_lot_percentage: Decimal,
    pub project_total_quantity: Decimal,
    pub lot_process_weightage_sum: BTreeMap<String, BTreeMap<i32, Decimal>>,
}

/// One lot's progress under a single process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessLotProgress {
    pub lot_number: String,
    pub percentage: Decimal,
    pub total_sheets: i64,
    pub completed_sheets: i64,
    pub lot_quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessProgressSummary {
    pub total_lots: i64,
    pub total_sheets: i64,
    pub completed_sheets: i64,
    pub total_quantity: Decimal,
    pub overall_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessProgress {
    pub process_id: i32,
    pub statistics: ProcessProgressSummary,
    pub lots: Vec<ProcessLotProgress>,
}

/// Per-process progress across the whole project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProcessPercentages {
    pub total_processes: i64,
    pub overall_project_quantity: Decimal,
    pub overall_project_percentage: Decimal,
    pub processes: Vec<ProcessProgress>,
}

/// Per-process weightages for one catch, renormalized to sum to 100.
///
/// Only processes present in both the catch's process list and the
/// project pipeline participate. When the raw sum falls short of 100
/// the deficit is spread evenly across the participating processes.
pub fn catch_weightages(sheet: &QuantitySheet, pipeline: &Pipeline) -> BTreeMap<i32, Decimal> {
    let hundred = Decimal::from(100);
    let mut weights = BTreeMap::new();
    let mut raw_sum = Decimal::ZERO;

    for &process_id in &sheet.process_ids {
        if let Some(weightage) = pipeline.weightage_of(process_id) {
            weights.insert(process_id, weightage.round_dp(2));
            raw_sum += weightage;
        }
    }

    if raw_sum < hundred && !weights.is_empty() {
        let adjustment = (hundred - raw_sum) / Decimal::from(weights.len() as i64);
        for weightage in weights.values_mut() {
            *weightage = (*weightage + adjustment).round_dp(2);
        }
    }

    weights
}

/// Weighted project completion.
///
/// A catch earns a process's weightage once a completed transaction
/// exists for it, or, for the dispatch process, once the lot has a
/// dispatch record.
pub fn project_completion(inputs: &CompletionInputs, scope: CatchScope) -> ProjectCompletion {
    let hundred = Decimal::from(100);
    let mut lot_percentages: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut lot_quantities: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut total_quantity = Decimal::ZERO;

    for sheet in eligible_sheets(inputs, scope) {
        let weights = catch_weightages(sheet, inputs.pipeline);
        let earned = earned_weightage(sheet, &weights, inputs, true);
        let catch_percentage = (sheet.percentage_catch * (earned / hundred)).round_dp(2);

        let lot_total = lot_percentages
            .entry(sheet.lot_no.clone())
            .or_insert(Decimal::ZERO);
        *lot_total = (*lot_total + catch_percentage).round_dp(2);

        *lot_quantities
            .entry(sheet.lot_no.clone())
            .or_insert(Decimal::ZERO) += sheet.quantity;
        total_quantity += sheet.quantity;
    }

    let mut completion = Decimal::ZERO;
    for (lot_no, lot_percentage) in &lot_percentages {
        let quantity = lot_quantities
            .get(lot_no)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let lot_weightage = if total_quantity > Decimal::ZERO {
            quantity / total_quantity * hundred
        } else {
            Decimal::ZERO
        };
        completion += *lot_percentage * (lot_weightage / hundred);
    }

    ProjectCompletion {
        completion_percentage: completion.round_dp(2),
        total_quantity,
        lot_percentages,
        lot_quantities,
    }
}

/// Combined per-lot view: lot rollups, quantity-share weightages and the
/// per-process completion grid, with a dispatched lot forced to 100.
pub fn combined_percentages(inputs: &CompletionInputs) -> CombinedPercentages {
    let hundred = Decimal::from(100);
    let eligible = eligible_sheets(inputs, CatchScope::ExcludeStopped);

    let mut total_lot_percentages: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut lot_quantities: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut lot_process: BTreeMap<String, BTreeMap<i32, Decimal>> = BTreeMap::new();
    let mut project_total_quantity = Decimal::ZERO;

    for sheet in &eligible {
        let weights = catch_weightages(sheet, inputs.pipeline);
        let earned = earned_weightage(sheet, &weights, inputs, false);
        let catch_percentage = (sheet.percentage_catch * (earned / hundred)).round_dp(2);

        let lot_total = total_lot_percentages
            .entry(sheet.lot_no.clone())
            .or_insert(Decimal::ZERO);
        *lot_total = (*lot_total + catch_percentage).round_dp(2);

        *lot_quantities
            .entry(sheet.lot_no.clone())
            .or_insert(Decimal::ZERO) += sheet.quantity;
        project_total_quantity += sheet.quantity;

        let by_process = lot_process.entry(sheet.lot_no.clone()).or_default();
        for &process_id in weights.keys() {
            let value = lot_process_completion(&sheet.lot_no, process_id, &eligible, inputs);
            by_process.insert(process_id, value);
        }
    }

    // A lot whose dispatch stage reads 100 is complete regardless of
    // what the weighted catches add up to.
    for (lot_no, by_process) in &lot_process {
        if by_process.get(&inputs.constants.dispatch_process_id) == Some(&hundred) {
            total_lot_percentages.insert(lot_no.clone(), hundred);
        }
    }

    let mut lot_weightages: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut project_lot_percentages: BTreeMap<String, Decimal> = BTreeMap::new();
    for (lot_no, quantity) in &lot_quantities {
        let weightage = if project_total_quantity > Decimal::ZERO {
            (*quantity / project_total_quantity * hundred).round_dp(2)
        } else {
            Decimal::ZERO
        };
        lot_weightages.insert(lot_no.clone(), weightage);

        let lot_percentage = total_lot_percentages
            .get(lot_no)
            .copied()
            .unwrap_or(Decimal::ZERO);
        project_lot_percentages.insert(lot_no.clone(), (lot_percentage * weightage / hundred).round_dp(2));
    }

    let total_project_lot_percentage = project_lot_percentages
        .values()
        .copied()
        .sum::<Decimal>()
        .round_dp(2);

    CombinedPercentages {
        total_lot_percentages,
        lot_quantities,
        lot_weightages,
        project_lot_percentages,
        total_project_lot_percentage,
        project_total_quantity: project_total_quantity.round_dp(2),
        lot_process_weightage_sum: lot_process,
    }
}

/// Per-process sheet-count progress, grouped by lot.
pub fn process_percentages(inputs: &CompletionInputs) -> ProjectProcessPercentages {
    let hundred = Decimal::from(100);
    let eligible = eligible_sheets(inputs, CatchScope::ExcludeStopped);

    let mut processes = Vec::with_capacity(inputs.pipeline.len());
    let mut project_sheets: i64 = 0;
    let mut project_completed: i64 = 0;
    let mut project_quantity = Decimal::ZERO;

    for entry in inputs.pipeline.entries() {
        let process_sheets: Vec<&QuantitySheet> = eligible
            .iter()
            .copied()
            .filter(|s| s.requires_process(entry.process_id))
            .collect();

        let mut lot_numbers: Vec<&str> = Vec::new();
        for sheet in &process_sheets {
            if !lot_numbers.contains(&sheet.lot_no.as_str()) {
                lot_numbers.push(&sheet.lot_no);
            }
        }

        let mut lots = Vec::with_capacity(lot_numbers.len());
        let mut process_total: i64 = 0;
        let mut process_completed: i64 = 0;
        let process_quantity: Decimal = process_sheets.iter().map(|s| s.quantity).sum();

        for lot_no in lot_numbers {
            let lot_sheets: Vec<&&QuantitySheet> =
                process_sheets.iter().filter(|s| s.lot_no == lot_no).collect();
            let completed = lot_sheets
                .iter()
                .filter(|sheet| has_completed_transaction(inputs, sheet, entry.process_id))
                .count() as i64;
            let total = lot_sheets.len() as i64;
            let lot_quantity: Decimal = lot_sheets.iter().map(|s| s.quantity).sum();

            let percentage = if total > 0 {
                (Decimal::from(completed) / Decimal::from(total) * hundred).round_dp(2)
            } else {
                Decimal::ZERO
            };

            process_total += total;
            process_completed += completed;

            lots.push(ProcessLotProgress {
                lot_number: lot_no.to_string(),
                percentage,
                total_sheets: total,
                completed_sheets: completed,
                lot_quantity,
            });
        }

        project_sheets += process_total;
        project_completed += process_completed;
        project_quantity += process_quantity;

        let overall_percentage = if process_total > 0 {
            (Decimal::from(process_completed) / Decimal::from(process_total) * hundred).round_dp(2)
        } else {
            Decimal::ZERO
        };

        processes.push(ProcessProgress {
            process_id: entry.process_id,
            statistics: ProcessProgressSummary {
                total_lots: lots.len() as i64,
                total_sheets: process_total,
                completed_sheets: process_completed,
                total_quantity: process_quantity,
                overall_percentage,
            },
            lots,
        });
    }

    let overall_project_percentage = if project_sheets > 0 {
        (Decimal::from(project_completed) / Decimal::from(project_sheets) * hundred).round_dp(2)
    } else {
        Decimal::ZERO
    };

    ProjectProcessPercentages {
        total_processes: inputs.pipeline.len() as i64,
        overall_project_quantity: project_quantity,
        overall_project_percentage,
        processes,
    }
}

fn eligible_sheets<'a>(inputs: &CompletionInputs<'a>, scope: CatchScope) -> Vec<&'a QuantitySheet> {
    inputs
        .sheets
        .iter()
        .filter(|s| s.is_active())
        .filter(|s| scope == CatchScope::IncludeStopped || !s.is_stopped())
        .collect()
}

fn earned_weightage(
    sheet: &QuantitySheet,
    weights: &BTreeMap<i32, Decimal>,
    inputs: &CompletionInputs,
    credit_dispatch: bool,
) -> Decimal {
    let mut earned = Decimal::ZERO;
    for (&process_id, &weightage) in weights {
        let completed = has_completed_transaction(inputs, sheet, process_id);
        let dispatched = credit_dispatch
            && process_id == inputs.constants.dispatch_process_id
            && inputs
                .dispatches
                .iter()
                .any(|d| d.covers(&sheet.lot_no, process_id));
        if completed || dispatched {
            earned += weightage;
        }
    }
    earned
}

fn has_completed_transaction(
    inputs: &CompletionInputs,
    sheet: &QuantitySheet,
    process_id: i32,
) -> bool {
    inputs.transactions.iter().any(|t| {
        t.quantity_sheet_id == sheet.quantity_sheet_id
            && t.process_id == process_id
            && t.is_completed()
    })
}

fn lot_process_completion(
    lot_no: &str,
    process_id: i32,
    eligible: &[&QuantitySheet],
    inputs: &CompletionInputs,
) -> Decimal {
    let hundred = Decimal::from(100);
    let completed = inputs
        .transactions
        .iter()
        .filter(|t| t.lot_no == lot_no && t.process_id == process_id && t.is_completed())
        .count() as i64;
    let total = eligible
        .iter()
        .filter(|s| s.lot_no == lot_no && s.requires_process(process_id))
        .count() as i64;

    let mut value = if total > 0 {
        (Decimal::from(completed) / Decimal::from(total) * hundred).round_dp(2)
    } else {
        Decimal::ZERO
    };

    if process_id == inputs.constants.dispatch_process_id {
        let dispatched = inputs
            .dispatches
            .iter()
            .any(|d| d.covers(lot_no, process_id) && d.status);
        if dispatched {
            value = hundred;
        }
    }

    value
}
