//! Process-train statistics tests for the Exam Production Tracking
//! Platform
//!
//! Feature: exam-production-tracking
//! Tests for the per-stage pipeline statistics including:
//! - Property 8: Stage Non-Negativity
//! - Property 9: First-Stage Conservation
//! - Property 10: Carry-Forward Pool

use std::str::FromStr;

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    catches_at_status, pipeline_statistics, Pipeline, PipelineConstants, PipelineEntry,
    ProcessTransaction, ProcessType, Project, QuantitySheet, StatisticsInput,
};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn project(type_id: i32, no_of_series: Option<i32>) -> Project {
    Project {
        project_id: 101,
        name: "Spring Term 2026".into(),
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

/// Build transactions for a paper pipeline from a per-sheet-per-stage
/// code: 0-2 are transaction statuses, 3 means no transaction at all.
fn transactions_from_codes(
    stage_processes: &[i32],
    codes: &[Vec<u8>],
    sheet_count: usize,
) -> Vec<ProcessTransaction> {
    let mut transactions = Vec::new();
    let mut next_id = 100;
    for (s, row) in codes.iter().enumerate().take(sheet_count) {
        for (p, &code) in row.iter().enumerate().take(stage_processes.len()) {
            if code < 3 {
                transactions.push(tx(next_id, s as i32 + 1, stage_processes[p], i32::from(code)));
                next_id += 1;
            }
        }
    }
    transactions
}

// ============================================================================
// Property 8: Stage Non-Negativity
// ============================================================================
// Whatever the recorded transactions say, no stage of the process train
// SHALL report a negative count or quantity; over-reporting downstream
// stages clamp to zero instead of going negative.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 8: Stage Non-Negativity
    #[test]
    fn property_8_no_stage_field_negative(
        quantities in proptest::collection::vec(50i64..=500, 1..=4),
        codes in proptest::collection::vec(proptest::collection::vec(0u8..4, 3), 4),
    ) {
        let stage_processes = [2, 5, 6];
        let pipeline = Pipeline::from_entries(
            stage_processes
                .iter()
                .enumerate()
                .map(|(i, &id)| entry(id, i as i32 + 1))
                .collect(),
        );
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let sheets: Vec<QuantitySheet> = quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| sheet(i as i32 + 1, q, &[2, 5, 6]))
            .collect();
        let transactions = transactions_from_codes(&stage_processes, &codes, sheets.len());

        let stages = pipeline_statistics(
            &input(&pipeline, &project, &sheets, &transactions, &constants),
            "1",
        );

        for stage in &stages {
            prop_assert!(stage.wip_count >= 0, "wip count negative at {}", stage.process_id);
            prop_assert!(stage.completed_count >= 0);
            prop_assert!(stage.total_catches >= 0);
            prop_assert!(stage.remaining_catches >= 0);
            prop_assert!(
                stage.wip_quantity >= Decimal::ZERO,
                "wip quantity negative at {}",
                stage.process_id
            );
            prop_assert!(stage.completed_quantity >= Decimal::ZERO);
            prop_assert!(stage.initial_quantity >= Decimal::ZERO);
            prop_assert!(
                stage.remaining_quantity >= Decimal::ZERO,
                "remaining quantity negative at {}",
                stage.process_id
            );
        }
    }
}

// ============================================================================
// Property 9: First-Stage Conservation
// ============================================================================
// The first stage keeps its raw tallies: its pool is exactly the
// quantity of its own transactions, so WIP + completed + remaining
// SHALL add back up to the initial quantity.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 9: First-Stage Conservation
    #[test]
    fn property_9_first_stage_conserves_quantity(
        quantities in proptest::collection::vec(50i64..=500, 1..=4),
        codes in proptest::collection::vec(proptest::collection::vec(0u8..4, 3), 4),
    ) {
        let stage_processes = [2, 5, 6];
        let pipeline = Pipeline::from_entries(
            stage_processes
                .iter()
                .enumerate()
                .map(|(i, &id)| entry(id, i as i32 + 1))
                .collect(),
        );
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let sheets: Vec<QuantitySheet> = quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| sheet(i as i32 + 1, q, &[2, 5, 6]))
            .collect();
        let transactions = transactions_from_codes(&stage_processes, &codes, sheets.len());

        let stages = pipeline_statistics(
            &input(&pipeline, &project, &sheets, &transactions, &constants),
            "1",
        );

        let first = &stages[0];
        prop_assert_eq!(
            first.wip_quantity + first.completed_quantity + first.remaining_quantity,
            first.initial_quantity,
            "first stage must conserve its own quantity pool"
        );
    }
}

// ============================================================================
// Property 10: Carry-Forward Pool
// ============================================================================
// On a paper pipeline a stage's available pool SHALL equal what its
// predecessor has completed: downstream never sees more work than
// upstream produced.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 10: Carry-Forward Pool
    #[test]
    fn property_10_pool_follows_predecessor_completions(
        quantities in proptest::collection::vec(50i64..=500, 1..=4),
        codes in proptest::collection::vec(proptest::collection::vec(0u8..4, 2), 4),
    ) {
        let stage_processes = [2, 6];
        let pipeline = Pipeline::from_entries(vec![entry(2, 1), entry(6, 2)]);
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let sheets: Vec<QuantitySheet> = quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| sheet(i as i32 + 1, q, &[2, 6]))
            .collect();
        let transactions = transactions_from_codes(&stage_processes, &codes, sheets.len());

        let stages = pipeline_statistics(
            &input(&pipeline, &project, &sheets, &transactions, &constants),
            "1",
        );

        prop_assert_eq!(
            stages[1].initial_quantity,
            stages[0].completed_quantity,
            "second stage pool must equal first stage completions"
        );
        prop_assert_eq!(stages[1].total_catches, stages[0].completed_count);
    }
}

// ============================================================================
// Unit Tests: Booklet Series Division
// ============================================================================

mod booklet_series {
    use super::*;

    #[test]
    fn post_cutting_stage_feeds_in_quarters_and_deflates_by_series() {
        // Two-series booklet plan: digital and offset printing routes
        // meet at cutting, then binding works per series.
        let pipeline = Pipeline::from_entries(vec![
            entry(3, 1),
            entry(2, 2),
            entry(4, 3),
            entry(7, 4),
        ]);
        let project = project(1, Some(2));
        let constants = PipelineConstants::default();
        let all = &[3, 2, 4, 7];
        let sheets = vec![sheet(1, 400, all), sheet(2, 200, all)];
        let transactions = vec![
            // Both catches through digital printing.
            tx(10, 1, 3, 2),
            tx(11, 2, 3, 2),
            // The larger catch through offset and cutting.
            tx(12, 1, 2, 2),
            tx(13, 1, 4, 2),
            // Binding: one series-level completion, one in progress.
            tx(14, 1, 7, 2),
            tx(15, 2, 7, 1),
        ];

        let stages = pipeline_statistics(
            &input(&pipeline, &project, &sheets, &transactions, &constants),
            "1",
        );

        // Offset carries forward from digital's completions.
        let offset = &stages[1];
        assert_eq!(offset.initial_quantity, dec("600"));
        assert_eq!(offset.total_catches, 2);
        assert_eq!(offset.remaining_quantity, dec("200"));
        assert_eq!(offset.remaining_catches, 1);

        // Cutting draws from offset.
        let cutting = &stages[2];
        assert_eq!(cutting.initial_quantity, dec("400"));
        assert_eq!(cutting.total_catches, 1);
        assert_eq!(cutting.remaining_quantity, Decimal::ZERO);

        // Binding: both printing routes feed in quarters (600/4 + 400/4)
        // and its own tallies deflate by the two series.
        let binding = &stages[3];
        assert_eq!(binding.initial_quantity, dec("250"));
        assert_eq!(binding.completed_quantity, dec("200"));
        assert_eq!(binding.wip_quantity, dec("100"));
        assert_eq!(binding.completed_count, 0);
        assert_eq!(binding.wip_count, 0);
        // 1/4 and 2/4 both truncate to zero catches fed through.
        assert_eq!(binding.total_catches, 0);
        // 250 - 100 - 200 clamps at zero instead of going negative.
        assert_eq!(binding.remaining_quantity, Decimal::ZERO);
        assert_eq!(binding.remaining_catches, 0);
    }

    #[test]
    fn remapped_well_known_ids_drive_the_same_branches() {
        // Same plan as above with every structural id remapped; the
        // engine must key its branches off the constants, not the
        // seeded ids.
        let constants = PipelineConstants {
            ctp_process_id: 21,
            offset_printing_process_id: 22,
            digital_printing_process_id: 23,
            cutting_process_id: 24,
            completion_process_id: 32,
            dispatch_process_id: 34,
            booklet_type_id: 9,
            paper_type_id: 8,
            booklet_quarter_divisor: 4,
        };
        let pipeline = Pipeline::from_entries(vec![
            entry(23, 1),
            entry(22, 2),
            entry(24, 3),
            entry(27, 4),
        ]);
        let project = project(constants.booklet_type_id, Some(2));
        let all = &[23, 22, 24, 27];
        let sheets = vec![sheet(1, 400, all), sheet(2, 200, all)];
        let transactions = vec![
            tx(10, 1, 23, 2),
            tx(11, 2, 23, 2),
            tx(12, 1, 22, 2),
            tx(13, 1, 24, 2),
            tx(14, 1, 27, 2),
            tx(15, 2, 27, 1),
        ];

        let stages = pipeline_statistics(
            &input(&pipeline, &project, &sheets, &transactions, &constants),
            "1",
        );

        let binding = &stages[3];
        assert_eq!(binding.initial_quantity, dec("250"));
        assert_eq!(binding.completed_quantity, dec("200"));
        assert_eq!(binding.wip_quantity, dec("100"));
        assert_eq!(binding.total_catches, 0);
        assert_eq!(binding.remaining_quantity, Decimal::ZERO);
    }

    #[test]
    fn paper_projects_never_divide_by_series() {
        let pipeline = Pipeline::from_entries(vec![entry(2, 1), entry(4, 2), entry(7, 3)]);
        // Series count set but the project is paper type.
        let project = project(2, Some(4));
        let constants = PipelineConstants::default();
        let sheets = vec![sheet(1, 400, &[2, 4, 7])];
        let transactions = vec![tx(10, 1, 2, 2), tx(11, 1, 4, 2), tx(12, 1, 7, 2)];

        let stages = pipeline_statistics(
            &input(&pipeline, &project, &sheets, &transactions, &constants),
            "1",
        );

        let after_cutting = &stages[2];
        assert_eq!(after_cutting.completed_quantity, dec("400"));
        assert_eq!(after_cutting.completed_count, 1);
    }
}

// ============================================================================
// Unit Tests: Independent Stages
// ============================================================================

mod independent_stages {
    use super::*;

    #[test]
    fn independent_stage_draws_from_its_anchor_sequence() {
        let mut verification = entry(11, 4);
        verification.process_type = ProcessType::Independent;
        verification.range_start = Some(2);

        let pipeline = Pipeline::from_entries(vec![
            entry(2, 1),
            entry(5, 2),
            entry(6, 3),
            verification,
        ]);
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let route = &[2, 5, 6, 11];
        let sheets = vec![sheet(1, 100, route), sheet(2, 100, route)];
        let transactions = vec![
            tx(10, 1, 2, 2),
            tx(11, 2, 2, 2),
            // Anchor stage completed one catch; its neighbour completed both.
            tx(12, 1, 5, 2),
            tx(13, 1, 6, 2),
            tx(14, 2, 6, 2),
        ];

        let stages = pipeline_statistics(
            &input(&pipeline, &project, &sheets, &transactions, &constants),
            "1",
        );

        // Verification observes sequence 2, not the stage before it.
        let anchored = &stages[3];
        assert_eq!(anchored.initial_quantity, dec("100"));
        assert_eq!(anchored.total_catches, 1);
    }
}

// ============================================================================
// Unit Tests: Catch Board Lookups
// ============================================================================

mod catch_board {
    use super::*;

    #[test]
    fn status_zero_includes_catches_with_no_transaction() {
        let sheets = vec![sheet(1, 100, &[2]), sheet(2, 100, &[2])];
        let transactions = vec![tx(10, 1, 2, 1)];

        let untouched = catches_at_status(&sheets, &transactions, "1", 2, 0);
        assert_eq!(untouched.len(), 1);
        assert_eq!(untouched[0].catch_no, "C2");
        assert_eq!(untouched[0].status, 0);
    }

    #[test]
    fn stray_transactions_on_unrouted_sheets_stay_invisible() {
        // The sheet is not routed through process 5, so even a recorded
        // transaction there never surfaces on the board.
        let sheets = vec![sheet(1, 100, &[2])];
        let transactions = vec![tx(10, 1, 5, 2)];

        assert!(catches_at_status(&sheets, &transactions, "1", 5, 2).is_empty());
        assert!(catches_at_status(&sheets, &transactions, "1", 5, 0).is_empty());
    }

    #[test]
    fn other_lots_never_bleed_in() {
        let mut other_lot = sheet(2, 100, &[2]);
        other_lot.lot_no = "2".into();
        let sheets = vec![sheet(1, 100, &[2]), other_lot];

        let result = catches_at_status(&sheets, &[], "1", 2, 0);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].quantity_sheet_id, 1);
    }
}

// ============================================================================
// Serialization Tests
// ============================================================================

mod payload_shapes {
    use super::*;

    #[test]
    fn stage_statistics_serializes_camel_case() {
        let pipeline = Pipeline::from_entries(vec![entry(2, 1)]);
        let project = project(2, None);
        let constants = PipelineConstants::default();
        let sheets = vec![sheet(1, 100, &[2])];
        let transactions = vec![tx(10, 1, 2, 2)];

        let stages = pipeline_statistics(
            &input(&pipeline, &project, &sheets, &transactions, &constants),
            "1",
        );
        let value = serde_json::to_value(&stages[0]).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("processId"));
        assert!(object.contains_key("wipCount"));
        assert!(object.contains_key("completedQuantity"));
        assert!(object.contains_key("remainingCatches"));
    }

    #[test]
    fn catch_board_serializes_camel_case() {
        let sheets = vec![sheet(1, 100, &[2])];
        let result = catches_at_status(&sheets, &[], "1", 2, 0);
        let value = serde_json::to_value(&result[0]).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("quantitySheetId"));
        assert!(object.contains_key("catchNo"));
        assert!(object.contains_key("examDate"));
    }
}
