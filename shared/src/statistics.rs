//! Per-stage pipeline statistics with carry-forward
//!
//! The process train answers "how much work is sitting at each stage of
//! a lot". Raw per-stage tallies come from the lot's transactions; the
//! adjustment pass then rewrites each stage's available pool from what
//! its feeding stage has completed, so downstream stages never report
//! more available work than upstream has produced.
//!
//! Stage order follows the pipeline sequence and the pass mutates in
//! place, so a stage always reads its predecessor's already-adjusted
//! figures. The first stage is never adjusted. Booklet projects divide
//! their post-cutting tallies by the series count, counts truncating,
//! quantities exact.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ProcessTransaction, Project, QuantitySheet};
use crate::pipeline::{Pipeline, PipelineConstants};
use crate::types::ProcessType;

/// One stage of the process train for a lot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageStatistics {
    pub process_id: i32,
    pub process_name: String,
    pub sequence: i32,
    pub process_type: ProcessType,
    pub range_start: Option<i32>,
    pub wip_count: i64,
    pub completed_count: i64,
    pub wip_quantity: Decimal,
    pub completed_quantity: Decimal,
    pub initial_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub total_catches: i64,
    pub remaining_catches: i64,
}

/// Everything the process train reads for one project.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsInput<'a> {
    pub pipeline: &'a Pipeline,
    pub project: &'a Project,
    pub sheets: &'a [QuantitySheet],
    pub transactions: &'a [ProcessTransaction],
    pub constants: &'a PipelineConstants,
}

/// Quantities and counts entering the pipeline, measured off the first
/// stage's completed transactions and split by printing route.
#[derive(Debug, Clone, Default)]
struct EntryFeed {
    ctp_quantity: Decimal,
    ctp_count: i64,
    digital_quantity: Decimal,
    digital_count: i64,
}

/// Process-train statistics for one lot, ordered by stage sequence.
pub fn pipeline_statistics(input: &StatisticsInput, lot_no: &str) -> Vec<StageStatistics> {
    let sheets_by_id: HashMap<i32, &QuantitySheet> = input
        .sheets
        .iter()
        .map(|s| (s.quantity_sheet_id, s))
        .collect();

    let lot_transactions: Vec<(&ProcessTransaction, &QuantitySheet)> = input
        .transactions
        .iter()
        .filter(|t| t.lot_no == lot_no)
        .filter_map(|t| sheets_by_id.get(&t.quantity_sheet_id).map(|s| (t, *s)))
        .collect();

    let feed = entry_feed(input, &lot_transactions);
    let mut stages = base_stages(input.pipeline, &lot_transactions);

    let constants = input.constants;
    let cutting_sequence = input.pipeline.cutting_sequence(constants);
    let is_booklet = input.project.type_id == constants.booklet_type_id;
    let series_divisor = input.project.series_divisor();
    let quantity_divisor = Decimal::from(series_divisor);
    let catch_quarter = constants.booklet_quarter_divisor;
    let quantity_quarter = Decimal::from(catch_quarter);

    for i in 1..stages.len() {
        let sequence = stages[i].sequence;
        let process_id = stages[i].process_id;
        let process_type = stages[i].process_type;
        let after_cutting = cutting_sequence.map_or(false, |c| sequence == c + 1);
        let beyond_cutting = cutting_sequence.map_or(false, |c| sequence > c + 1);
        let before_cutting = cutting_sequence.map_or(false, |c| sequence < c + 1);

        let mut previous: Option<usize> = None;

        if process_id == constants.cutting_process_id {
            // Cutting is fed by the offset printing stage, wherever it
            // sits in the sequence.
            previous = index_of_process(&stages, constants.offset_printing_process_id);
        } else if process_id == constants.digital_printing_process_id {
            let stage = &mut stages[i];
            stage.initial_quantity = feed.digital_quantity;
            stage.total_catches = feed.digital_count;
            stage.remaining_quantity =
                stage.initial_quantity - stage.wip_quantity - stage.completed_quantity;
            stage.remaining_catches = stage.total_catches - stage.wip_count - stage.completed_count;
        } else if process_id == constants.ctp_process_id {
            let stage = &mut stages[i];
            stage.initial_quantity = feed.ctp_quantity;
            stage.total_catches = feed.ctp_count;
            stage.remaining_quantity =
                stage.initial_quantity - stage.wip_quantity - stage.completed_quantity;
            stage.remaining_catches = stage.total_catches - stage.wip_count - stage.completed_count;
        } else if after_cutting && is_booklet {
            // Catches split into series at cutting: both printing routes
            // feed in quarters, and this stage's own tallies deflate by
            // the series count.
            let (digital_quantity, digital_count) =
                completed_of_process(&stages, constants.digital_printing_process_id);
            let previous_index = index_of_sequence(&stages, sequence - 1);
            let previous_quantity =
                previous_index.map_or(Decimal::ZERO, |p| stages[p].completed_quantity);
            let previous_catches = previous_index.map_or(0, |p| stages[p].total_catches);

            let stage = &mut stages[i];
            stage.initial_quantity =
                digital_quantity / quantity_quarter + previous_quantity / quantity_quarter;
            stage.completed_quantity /= quantity_divisor;
            stage.wip_quantity /= quantity_divisor;
            stage.completed_count /= series_divisor;
            stage.wip_count /= series_divisor;
            stage.total_catches = previous_catches / catch_quarter + digital_count / catch_quarter;
            stage.remaining_quantity =
                stage.initial_quantity - stage.wip_quantity - stage.completed_quantity;
            stage.remaining_catches = stage.total_catches - stage.wip_count - stage.completed_count;
        } else if after_cutting {
            let (digital_quantity, digital_count) =
                completed_of_process(&stages, constants.digital_printing_process_id);
            let previous_index = index_of_sequence(&stages, sequence - 1);
            let previous_quantity =
                previous_index.map_or(Decimal::ZERO, |p| stages[p].completed_quantity);
            let previous_catches = previous_index.map_or(0, |p| stages[p].total_catches);

            let stage = &mut stages[i];
            stage.initial_quantity = digital_quantity + previous_quantity;
            stage.total_catches = previous_catches + digital_count;
            stage.remaining_quantity =
                stage.initial_quantity - stage.wip_quantity - stage.completed_quantity;
            stage.remaining_catches = stage.total_catches - stage.wip_count - stage.completed_count;
        } else if process_type == ProcessType::Independent {
            previous = stages[i]
                .range_start
                .and_then(|start| index_of_sequence(&stages, start));
        } else {
            previous = index_of_sequence(&stages, sequence - 1);
        }

        if let Some(p) = previous {
            let previous_quantity = stages[p].completed_quantity;
            let previous_count = stages[p].completed_count;

            if !after_cutting && !is_booklet {
                let stage = &mut stages[i];
                stage.initial_quantity = previous_quantity;
                stage.remaining_quantity =
                    stage.initial_quantity - stage.wip_quantity - stage.completed_quantity;
                stage.remaining_catches = previous_count - stage.wip_count - stage.completed_count;
                stage.total_catches = previous_count;
            } else if is_booklet && beyond_cutting {
                let stage = &mut stages[i];
                stage.initial_quantity = previous_quantity;
                stage.completed_quantity /= quantity_divisor;
                stage.wip_quantity /= quantity_divisor;
                stage.completed_count /= series_divisor;
                stage.wip_count /= series_divisor;
                stage.remaining_quantity =
                    stage.initial_quantity - stage.wip_quantity - stage.completed_quantity;
                stage.remaining_catches = previous_count - stage.wip_count - stage.completed_count;
                stage.total_catches = previous_count;
            } else if is_booklet && before_cutting {
                let stage = &mut stages[i];
                stage.initial_quantity = previous_quantity;
                stage.remaining_quantity =
                    stage.initial_quantity - stage.wip_quantity - stage.completed_quantity;
                stage.remaining_catches = previous_count - stage.wip_count - stage.completed_count;
                stage.total_catches = previous_count;
            }
        }
    }

    for stage in &mut stages {
        clamp_non_negative(stage);
    }

    stages
}

fn entry_feed(
    input: &StatisticsInput,
    lot_transactions: &[(&ProcessTransaction, &QuantitySheet)],
) -> EntryFeed {
    let mut feed = EntryFeed::default();
    if let Some(first) = input.pipeline.first() {
        for (transaction, sheet) in lot_transactions {
            if transaction.process_id != first.process_id || !transaction.is_completed() {
                continue;
            }
            if sheet.requires_process(input.constants.ctp_process_id) {
                feed.ctp_quantity += sheet.quantity;
                feed.ctp_count += 1;
            }
            if sheet.requires_process(input.constants.digital_printing_process_id) {
                feed.digital_quantity += sheet.quantity;
                feed.digital_count += 1;
            }
        }
    }
    feed
}

fn base_stages(
    pipeline: &Pipeline,
    lot_transactions: &[(&ProcessTransaction, &QuantitySheet)],
) -> Vec<StageStatistics> {
    pipeline
        .entries()
        .iter()
        .map(|entry| {
            let mut stage = StageStatistics {
                process_id: entry.process_id,
                process_name: entry.process_name.clone(),
                sequence: entry.sequence,
                process_type: entry.process_type,
                range_start: entry.range_start,
                wip_count: 0,
                completed_count: 0,
                wip_quantity: Decimal::ZERO,
                completed_quantity: Decimal::ZERO,
                initial_quantity: Decimal::ZERO,
                remaining_quantity: Decimal::ZERO,
                total_catches: 0,
                remaining_catches: 0,
            };
            let mut wip_catches: i64 = 0;
            let mut completed_catches: i64 = 0;

            for (transaction, sheet) in lot_transactions {
                if transaction.process_id != entry.process_id {
                    continue;
                }
                let has_catch = !sheet.catch_no.is_empty();
                stage.initial_quantity += sheet.quantity;
                if has_catch {
                    stage.total_catches += 1;
                }
                match transaction.status {
                    1 => {
                        stage.wip_count += 1;
                        stage.wip_quantity += sheet.quantity;
                        if has_catch {
                            wip_catches += 1;
                        }
                    }
                    2 => {
                        stage.completed_count += 1;
                        stage.completed_quantity += sheet.quantity;
                        if has_catch {
                            completed_catches += 1;
                        }
                    }
                    _ => {}
                }
            }

            stage.remaining_quantity =
                stage.initial_quantity - stage.wip_quantity - stage.completed_quantity;
            stage.remaining_catches = stage.total_catches - wip_catches - completed_catches;
            clamp_non_negative(&mut stage);
            stage
        })
        .collect()
}

fn index_of_process(stages: &[StageStatistics], process_id: i32) -> Option<usize> {
    stages.iter().position(|s| s.process_id == process_id)
}

fn index_of_sequence(stages: &[StageStatistics], sequence: i32) -> Option<usize> {
    stages.iter().position(|s| s.sequence == sequence)
}

fn completed_of_process(stages: &[StageStatistics], process_id: i32) -> (Decimal, i64) {
    index_of_process(stages, process_id)
        .map_or((Decimal::ZERO, 0), |i| {
            (stages[i].completed_quantity, stages[i].completed_count)
        })
}

fn clamp_non_negative(stage: &mut StageStatistics) {
    stage.wip_count = stage.wip_count.max(0);
    stage.completed_count = stage.completed_count.max(0);
    stage.wip_quantity = stage.wip_quantity.max(Decimal::ZERO);
    stage.completed_quantity = stage.completed_quantity.max(Decimal::ZERO);
    stage.initial_quantity = stage.initial_quantity.max(Decimal::ZERO);
    stage.remaining_quantity = stage.remaining_quantity.max(Decimal::ZERO);
    stage.total_catches = stage.total_catches.max(0);
    stage.remaining_catches = stage.remaining_catches.max(0);
}

/// One catch of a lot with its status under a single process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchProcessStatus {
    pub quantity_sheet_id: i32,
    pub catch_no: String,
    pub paper: Option<String>,
    pub exam_date: String,
    pub exam_time: Option<String>,
    pub course: Option<String>,
    pub subject: Option<String>,
    pub quantity: Decimal,
    pub status: i32,
}

/// Catches of a lot sitting at `status_to_find` for one process.
///
/// Status 0 means "not started": it matches catches with no transaction
/// at all as well as ones explicitly at 0.
pub fn catches_at_status(
    sheets: &[QuantitySheet],
    transactions: &[ProcessTransaction],
    lot_no: &str,
    process_id: i32,
    status_to_find: i32,
) -> Vec<CatchProcessStatus> {
    sheets
        .iter()
        .filter(|s| s.lot_no == lot_no && s.requires_process(process_id))
        .filter_map(|sheet| {
            let transaction = transactions.iter().find(|t| {
                t.quantity_sheet_id == sheet.quantity_sheet_id
                    && t.lot_no == lot_no
                    && t.process_id == process_id
            });
            let status = transaction.map_or(0, |t| t.status);
            let matches = if status_to_find == 0 {
                transaction.is_none() || status == 0
            } else {
                transaction.is_some() && status == status_to_find
            };
            matches.then(|| CatchProcessStatus {
                quantity_sheet_id: sheet.quantity_sheet_id,
                catch_no: sheet.catch_no.clone(),
                paper: sheet.paper.clone(),
                exam_date: sheet.exam_date.clone(),
                exam_time: sheet.exam_time.clone(),
                course: sheet.course.clone(),
                subject: sheet.subject.clone(),
                quantity: sheet.quantity,
                status,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineEntry;

    fn project(type_id: i32, no_of_series: Option<i32>) -> Project {
        Project {
            project_id: 101,
            name: "Spring Term".into(),
            description: None,
            type_id,
            group_id: 1,
            no_of_series,
            series_name: None,
            status: true,
        }
    }

    fn entry(process_id: i32, sequence: i32) -> PipelineEntry {
        PipelineEntry {
            process_id,
            process_name: format!("process-{process_id}"),
            sequence,
            weightage: Decimal::from(10),
            process_type: ProcessType::Sequential,
            range_start: None,
        }
    }

    fn sheet(id: i32, quantity: i64, process_ids: &[i32]) -> QuantitySheet {
        QuantitySheet {
            quantity_sheet_id: id,
            project_id: 101,
            lot_no: "1".into(),
            catch_no: format!("C{id}"),
            paper: None,
            course: None,
            subject: None,
            inner_envelope: None,
            outer_envelope: None,
            exam_date: "01-03-2026".into(),
            exam_time: None,
            quantity: Decimal::from(quantity),
            pages: None,
            percentage_catch: Decimal::ZERO,
            process_ids: process_ids.to_vec(),
            status: 1,
            stop_catch: 0,
        }
    }

    fn tx(id: i32, sheet_id: i32, process_id: i32, status: i32) -> ProcessTransaction {
        ProcessTransaction {
            transaction_id: id,
            project_id: 101,
            quantity_sheet_id: sheet_id,
            process_id,
            lot_no: "1".into(),
            interim_quantity: Decimal::ZERO,
            remarks: None,
            voice_recording: None,
            zone_id: 1,
            machine_id: 1,
            status,
            alarm_id: None,
            team_ids: vec![],
        }
    }

    fn input<'a>(
        pipeline: &'a Pipeline,
        project: &'a Project,
        sheets: &'a [QuantitySheet],
        transactions: &'a [ProcessTransaction],
        constants: &'a PipelineConstants,
    ) -> StatisticsInput<'a> {
        StatisticsInput {
            pipeline,
            project,
            sheets,
            transactions,
            constants,
        }
    }

    #[test]
    fn test_empty_pipeline_yields_no_stages() {
        let pipeline = Pipeline::from_entries(Vec::new());
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let stages = pipeline_statistics(&input(&pipeline, &project, &[], &[], &constants), "1");
        assert!(stages.is_empty());
    }

    #[test]
    fn test_first_stage_keeps_raw_tallies() {
        let pipeline = Pipeline::from_entries(vec![entry(2, 1), entry(4, 2)]);
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let sheets = vec![sheet(1, 100, &[2, 4]), sheet(2, 100, &[2, 4])];
        let txs = vec![tx(10, 1, 2, 2), tx(11, 2, 2, 1)];
        let stages = pipeline_statistics(&input(&pipeline, &project, &sheets, &txs, &constants), "1");

        let offset = &stages[0];
        assert_eq!(offset.completed_count, 1);
        assert_eq!(offset.wip_count, 1);
        assert_eq!(offset.initial_quantity, Decimal::from(200));
        assert_eq!(offset.remaining_quantity, Decimal::ZERO);
        assert_eq!(offset.total_catches, 2);
    }

    #[test]
    fn test_paper_carry_forward_from_predecessor() {
        let pipeline = Pipeline::from_entries(vec![entry(2, 1), entry(4, 2), entry(5, 3)]);
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let sheets = vec![sheet(1, 100, &[2, 4, 5]), sheet(2, 100, &[2, 4, 5])];
        let txs = vec![
            tx(10, 1, 2, 2),
            tx(11, 2, 2, 2),
            tx(12, 1, 4, 1),
        ];
        let stages = pipeline_statistics(&input(&pipeline, &project, &sheets, &txs, &constants), "1");

        // Cutting draws its pool from offset printing's completions.
        let cutting = &stages[1];
        assert_eq!(cutting.initial_quantity, Decimal::from(200));
        assert_eq!(cutting.wip_quantity, Decimal::from(100));
        assert_eq!(cutting.remaining_quantity, Decimal::from(100));
        assert_eq!(cutting.total_catches, 2);
        assert_eq!(cutting.remaining_catches, 1);

        // Nothing cut yet, so the next stage has no quantity available;
        // its catch pool mirrors what entered cutting.
        let next = &stages[2];
        assert_eq!(next.initial_quantity, Decimal::ZERO);
        assert_eq!(next.total_catches, 2);
        assert_eq!(next.remaining_catches, 2);
    }

    #[test]
    fn test_booklet_post_cutting_divides_by_series() {
        let pipeline = Pipeline::from_entries(vec![
            entry(3, 1),
            entry(2, 2),
            entry(4, 3),
            entry(5, 4),
            entry(6, 5),
        ]);
        let project = project(1, Some(4));
        let constants = PipelineConstants::default();
        let all = &[3, 2, 4, 5, 6];
        let sheets = vec![sheet(1, 400, all), sheet(2, 400, all), sheet(3, 100, all), sheet(4, 100, all)];
        let txs = vec![
            // Digital printing completed on two catches of 400 each.
            tx(10, 1, 3, 2),
            tx(11, 2, 3, 2),
            // Offset and cutting each completed on one catch of 400.
            tx(12, 1, 2, 2),
            tx(13, 1, 4, 2),
            // Four series-level completions at the post-cutting stage.
            tx(14, 1, 5, 2),
            tx(15, 2, 5, 2),
            tx(16, 3, 5, 2),
            tx(17, 4, 5, 2),
        ];
        let stages = pipeline_statistics(&input(&pipeline, &project, &sheets, &txs, &constants), "1");

        // Offset (before cutting, booklet) carries forward from digital.
        let offset = &stages[1];
        assert_eq!(offset.initial_quantity, Decimal::from(800));
        assert_eq!(offset.total_catches, 2);
        assert_eq!(offset.remaining_catches, 1);

        // Cutting draws from offset's completions.
        let cutting = &stages[2];
        assert_eq!(cutting.initial_quantity, Decimal::from(400));
        assert_eq!(cutting.total_catches, 1);
        assert_eq!(cutting.remaining_quantity, Decimal::ZERO);

        // The stage after cutting: both printing routes feed in quarters
        // and its own tallies deflate by the series count.
        let gathering = &stages[3];
        assert_eq!(gathering.initial_quantity, Decimal::from(300));
        assert_eq!(gathering.completed_count, 1);
        assert_eq!(
            gathering.completed_quantity,
            Decimal::from(1000) / Decimal::from(4)
        );
        // 1/4 + 2/4 truncate to zero catches fed through.
        assert_eq!(gathering.total_catches, 0);
        assert_eq!(gathering.remaining_catches, 0);

        // Beyond cutting: carries from the adjusted predecessor.
        let numbering = &stages[4];
        assert_eq!(numbering.initial_quantity, Decimal::from(250));
        assert_eq!(numbering.total_catches, 1);
        assert_eq!(numbering.remaining_catches, 1);
    }

    #[test]
    fn test_digital_stage_reads_entry_feed() {
        // Digital printing sits mid-pipeline; its pool comes from the
        // first stage's completions on digitally routed catches.
        let pipeline = Pipeline::from_entries(vec![entry(15, 1), entry(3, 2), entry(6, 3)]);
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let sheets = vec![sheet(1, 250, &[15, 3, 6]), sheet(2, 150, &[15, 6])];
        let txs = vec![tx(10, 1, 15, 2), tx(11, 2, 15, 2), tx(12, 1, 3, 1)];
        let stages = pipeline_statistics(&input(&pipeline, &project, &sheets, &txs, &constants), "1");

        let digital = &stages[1];
        assert_eq!(digital.initial_quantity, Decimal::from(250));
        assert_eq!(digital.total_catches, 1);
        assert_eq!(digital.wip_quantity, Decimal::from(250));
        assert_eq!(digital.remaining_quantity, Decimal::ZERO);
        assert_eq!(digital.remaining_catches, 0);
    }

    #[test]
    fn test_booklet_without_cutting_stage_is_untouched() {
        let pipeline = Pipeline::from_entries(vec![entry(3, 1), entry(6, 2)]);
        let project = project(1, Some(2));
        let constants = PipelineConstants::default();
        let sheets = vec![sheet(1, 100, &[3, 6])];
        let txs = vec![tx(10, 1, 3, 2), tx(11, 1, 6, 1)];
        let stages = pipeline_statistics(&input(&pipeline, &project, &sheets, &txs, &constants), "1");

        // No cutting sequence, so none of the booklet arms apply.
        let second = &stages[1];
        assert_eq!(second.initial_quantity, Decimal::from(100));
        assert_eq!(second.wip_count, 1);
    }

    #[test]
    fn test_paper_without_cutting_still_carries_forward() {
        let pipeline = Pipeline::from_entries(vec![entry(2, 1), entry(6, 2)]);
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let sheets = vec![sheet(1, 100, &[2, 6]), sheet(2, 100, &[2, 6])];
        let txs = vec![tx(10, 1, 2, 2)];
        let stages = pipeline_statistics(&input(&pipeline, &project, &sheets, &txs, &constants), "1");

        let second = &stages[1];
        assert_eq!(second.initial_quantity, Decimal::from(100));
        assert_eq!(second.total_catches, 1);
        assert_eq!(second.remaining_catches, 1);
    }

    #[test]
    fn test_independent_stage_observes_its_anchor() {
        let mut independent = entry(9, 3);
        independent.process_type = ProcessType::Independent;
        independent.range_start = Some(1);
        let pipeline = Pipeline::from_entries(vec![entry(2, 1), entry(6, 2), independent]);
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let sheets = vec![sheet(1, 100, &[2, 6, 9]), sheet(2, 100, &[2, 6, 9])];
        let txs = vec![tx(10, 1, 2, 2), tx(11, 2, 2, 2), tx(12, 1, 6, 2)];
        let stages = pipeline_statistics(&input(&pipeline, &project, &sheets, &txs, &constants), "1");

        // Anchored to sequence 1, not its own predecessor.
        let anchored = &stages[2];
        assert_eq!(anchored.initial_quantity, Decimal::from(200));
        assert_eq!(anchored.total_catches, 2);
    }

    #[test]
    fn test_no_field_goes_negative() {
        let pipeline = Pipeline::from_entries(vec![entry(2, 1), entry(6, 2)]);
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let sheets = vec![sheet(1, 100, &[2, 6])];
        // Downstream completed more than upstream fed it.
        let txs = vec![tx(10, 1, 6, 2)];
        let stages = pipeline_statistics(&input(&pipeline, &project, &sheets, &txs, &constants), "1");

        for stage in &stages {
            assert!(stage.remaining_quantity >= Decimal::ZERO);
            assert!(stage.remaining_catches >= 0);
            assert!(stage.initial_quantity >= Decimal::ZERO);
            assert!(stage.total_catches >= 0);
        }
    }

    #[test]
    fn test_catches_at_status_zero_includes_untouched() {
        let sheets = vec![sheet(1, 100, &[2]), sheet(2, 100, &[2]), sheet(3, 100, &[6])];
        let txs = vec![tx(10, 1, 2, 2)];
        let pending = catches_at_status(&sheets, &txs, "1", 2, 0);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].catch_no, "C2");
        assert_eq!(pending[0].status, 0);
    }

    #[test]
    fn test_catches_at_status_matches_exact_status() {
        let sheets = vec![sheet(1, 100, &[2]), sheet(2, 100, &[2])];
        let txs = vec![tx(10, 1, 2, 2), tx(11, 2, 2, 1)];
        let completed = catches_at_status(&sheets, &txs, "1", 2, 2);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].quantity_sheet_id, 1);

        let wip = catches_at_status(&sheets, &txs, "1", 2, 1);
        assert_eq!(wip.len(), 1);
        assert_eq!(wip[0].quantity_sheet_id, 2);
    }

    #[test]
    fn test_catches_at_status_respects_process_routing() {
        let sheets = vec![sheet(1, 100, &[6])];
        let none = catches_at_status(&sheets, &[], "1", 2, 0);
        assert!(none.is_empty());
    }
}
