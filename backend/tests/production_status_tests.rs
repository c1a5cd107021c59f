//! Production status tests for the Exam Production Tracking Platform
//!
//! Feature: exam-production-tracking
//! Tests for the under-production and pending-process derivations:
//! - Property 11: Dispatch Departure Clears the Backlog
//! - Property 12: Lot Aggregation Totals

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    catch_status, pending_process, under_production, CatchStatus, Dispatch, PendingProcessFilter,
    ProcessTransaction, Project, QuantitySheet,
};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn project(id: i32, group_id: i32) -> Project {
    Project {
        project_id: id,
        name: format!("Project {id}"),
        description: None,
        type_id: 1,
        group_id,
        no_of_series: None,
        series_name: None,
        status: true,
    }
}

fn sheet(id: i32, project_id: i32, lot_no: &str, quantity: i64, exam_date: &str) -> QuantitySheet {
    QuantitySheet {
        quantity_sheet_id: id,
        project_id,
        lot_no: lot_no.into(),
        catch_no: format!("C{id}"),
        paper: None,
        course: None,
        subject: None,
        inner_envelope: None,
        outer_envelope: None,
        exam_date: exam_date.into(),
        exam_time: None,
        quantity: Decimal::from(quantity),
        pages: None,
        percentage_catch: Decimal::ZERO,
        process_ids: vec![2, 12],
        status: 1,
        stop_catch: 0,
    }
}

fn tx(id: i32, sheet_id: i32, process_id: i32, status: i32) -> ProcessTransaction {
    ProcessTransaction {
        transaction_id: id,
        project_id: 100,
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

fn dispatch(project_id: i32, lot_no: &str, departed: bool, dated: bool) -> Dispatch {
    Dispatch {
        id: 1,
        project_id,
        lot_no: lot_no.into(),
        process_id: 14,
        box_count: None,
        messenger_name: None,
        messenger_mobile: None,
        dispatch_mode: None,
        vehicle_number: None,
        driver_name: None,
        driver_mobile: None,
        status: departed,
        dispatch_date: dated.then(|| Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap()),
        created_at: Utc::now(),
        updated_at: None,
    }
}

// ============================================================================
// Property 11: Dispatch Departure Clears the Backlog
// ============================================================================
// A lot stays under production exactly while its dispatch has not
// departed: no dispatch row or a pending row with a planned date keeps
// it listed; a departed row, or a pending row with no date, clears it.
// Kinds: 0 = no dispatch, 1 = pending with date, 2 = departed,
// 3 = pending without date.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 11: Dispatch Departure Clears the Backlog
    #[test]
    fn property_11_only_undeparted_lots_listed(
        dispatch_kinds in proptest::collection::vec(0u8..4, 4),
        catch_counts in proptest::collection::vec(1usize..=3, 4),
    ) {
        let projects = vec![project(100, 5)];
        let mut sheets = Vec::new();
        let mut next_id = 1;
        for (lot_index, &count) in catch_counts.iter().enumerate() {
            let lot_no = (lot_index + 1).to_string();
            for _ in 0..count {
                sheets.push(sheet(next_id, 100, &lot_no, 100, "01-03-2026"));
                next_id += 1;
            }
        }
        let dispatches: Vec<Dispatch> = dispatch_kinds
            .iter()
            .enumerate()
            .filter_map(|(lot_index, &kind)| {
                let lot_no = (lot_index + 1).to_string();
                match kind {
                    1 => Some(dispatch(100, &lot_no, false, true)),
                    2 => Some(dispatch(100, &lot_no, true, true)),
                    3 => Some(dispatch(100, &lot_no, false, false)),
                    _ => None,
                }
            })
            .collect();

        let result = under_production(&projects, &sheets, &dispatches, 88);

        for (lot_index, &kind) in dispatch_kinds.iter().enumerate() {
            let lot_no = (lot_index + 1).to_string();
            let listed = result.iter().any(|l| l.lot_no == lot_no);
            let expected = matches!(kind, 0 | 1);
            prop_assert_eq!(
                listed,
                expected,
                "lot {} with dispatch kind {} listed={}",
                lot_no,
                kind,
                listed
            );
        }
    }
}

// ============================================================================
// Property 12: Lot Aggregation Totals
// ============================================================================
// Each listed lot SHALL total exactly its active catches: catch count,
// quantity sum, and the min/max parseable exam dates.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 12: Lot Aggregation Totals
    #[test]
    fn property_12_lot_totals_match_active_sheets(
        quantities in proptest::collection::vec(1i64..=5000, 1..=6),
        inactive_mask in proptest::collection::vec(any::<bool>(), 6),
    ) {
        let projects = vec![project(100, 5)];
        let sheets: Vec<QuantitySheet> = quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| {
                let mut s = sheet(i as i32 + 1, 100, "1", q, "01-03-2026");
                if inactive_mask[i] {
                    s.status = 0;
                }
                s
            })
            .collect();

        let active: Vec<&QuantitySheet> = sheets.iter().filter(|s| s.status == 1).collect();
        let result = under_production(&projects, &sheets, &[], 88);

        if active.is_empty() {
            prop_assert!(result.is_empty(), "a lot with no active catches must not appear");
        } else {
            prop_assert_eq!(result.len(), 1);
            let lot = &result[0];
            prop_assert_eq!(lot.total_catches, active.len() as i64);
            let expected: Decimal = active.iter().map(|s| s.quantity).sum();
            prop_assert_eq!(lot.total_quantity, expected);
        }
    }

    /// Property 12 variant: the date range spans min to max and ignores
    /// unparseable exam dates.
    #[test]
    fn property_12_date_range_spans_parseable_dates(
        days in proptest::collection::vec(1u32..=28, 1..=5),
        junk_count in 0usize..3,
    ) {
        let projects = vec![project(100, 5)];
        let mut sheets: Vec<QuantitySheet> = days
            .iter()
            .enumerate()
            .map(|(i, &day)| {
                sheet(i as i32 + 1, 100, "1", 100, &format!("{day:02}-03-2026"))
            })
            .collect();
        for j in 0..junk_count {
            sheets.push(sheet(100 + j as i32, 100, "1", 100, "awaiting schedule"));
        }

        let result = under_production(&projects, &sheets, &[], 88);
        prop_assert_eq!(result.len(), 1);

        let min_day = *days.iter().min().unwrap();
        let max_day = *days.iter().max().unwrap();
        prop_assert_eq!(
            result[0].from_date,
            NaiveDate::from_ymd_opt(2026, 3, min_day)
        );
        prop_assert_eq!(result[0].to_date, NaiveDate::from_ymd_opt(2026, 3, max_day));
    }

    /// Lower-bound filter: projects under the floor never surface.
    #[test]
    fn property_12_project_floor_is_exclusive_below(
        project_id in 1i32..200,
        floor in 1i32..200,
    ) {
        let projects = vec![project(project_id, 5)];
        let sheets = vec![sheet(1, project_id, "1", 100, "01-03-2026")];
        let result = under_production(&projects, &sheets, &[], floor);
        prop_assert_eq!(result.is_empty(), project_id < floor);
    }
}

// ============================================================================
// Property Tests: Catch Board Status
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A catch reads Completed exactly when the completion process has a
    /// completed transaction, whatever else was recorded.
    #[test]
    fn catch_status_completed_iff_completion_process_done(
        codes in proptest::collection::vec((1i32..=14, 0i32..=2), 0..6),
    ) {
        let s = sheet(1, 100, "1", 200, "01-03-2026");
        let transactions: Vec<ProcessTransaction> = codes
            .iter()
            .enumerate()
            .map(|(i, &(process_id, status))| tx(i as i32 + 10, 1, process_id, status))
            .collect();

        let status = catch_status(&s, &transactions, 12);
        let completion_done = transactions
            .iter()
            .any(|t| t.process_id == 12 && t.status == 2);

        prop_assert_eq!(
            status == CatchStatus::Completed,
            completion_done,
            "board status {:?} disagrees with completion transactions",
            status
        );
        if transactions.is_empty() {
            prop_assert_eq!(status, CatchStatus::Pending);
        }
    }
}

// ============================================================================
// Unit Tests: Pending Process Backlog
// ============================================================================

mod pending_backlog {
    use super::*;

    fn group_filter() -> PendingProcessFilter {
        PendingProcessFilter {
            group_id: 5,
            project_id: None,
            lot_no: None,
            process_id: None,
        }
    }

    #[test]
    fn any_dispatch_record_blocks_the_lot() {
        // Dispatch rows block pending work by their existence; even a
        // still-pending planned dispatch takes the lot off the backlog.
        let projects = vec![project(100, 5)];
        let sheets = vec![sheet(1, 100, "1", 200, "01-03-2026")];
        let transactions = vec![tx(10, 1, 2, 1)];
        let planned = vec![dispatch(100, "1", false, true)];

        let result = pending_process(
            &group_filter(),
            &projects,
            &sheets,
            &transactions,
            &planned,
            &HashMap::new(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn dispatch_lot_matching_ignores_case() {
        let projects = vec![project(100, 5)];
        let sheets = vec![sheet(1, 100, "Lot-A", 200, "01-03-2026")];
        let transactions = vec![tx(10, 1, 2, 1)];
        let dispatches = vec![dispatch(100, "LOT-A", true, true)];

        let result = pending_process(
            &group_filter(),
            &projects,
            &sheets,
            &transactions,
            &dispatches,
            &HashMap::new(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn last_activity_comes_from_the_newest_transaction() {
        let projects = vec![project(100, 5)];
        let sheets = vec![
            sheet(1, 100, "1", 200, "01-03-2026"),
            sheet(2, 100, "1", 300, "01-03-2026"),
        ];
        // Two open transactions under the same process; the group stamp
        // follows the highest transaction id's latest log entry.
        let transactions = vec![tx(10, 1, 2, 1), tx(11, 2, 2, 1)];
        let older = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2026, 3, 4, 17, 30, 0).unwrap();
        let logs: HashMap<i32, DateTime<Utc>> = HashMap::from([(10, older), (11, newer)]);

        let result = pending_process(
            &group_filter(),
            &projects,
            &sheets,
            &transactions,
            &[],
            &logs,
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].total_catch_count, 2);
        assert_eq!(result[0].total_quantity, dec("500"));
        assert_eq!(result[0].last_logged_at, Some(newer));
    }

    #[test]
    fn process_filter_adds_catch_details() {
        let projects = vec![project(100, 5)];
        let sheets = vec![
            sheet(1, 100, "1", 200, "01-03-2026"),
            sheet(2, 100, "1", 300, "01-03-2026"),
        ];
        let transactions = vec![tx(10, 1, 2, 1), tx(11, 2, 5, 1)];

        let unfiltered = pending_process(
            &group_filter(),
            &projects,
            &sheets,
            &transactions,
            &[],
            &HashMap::new(),
        );
        assert_eq!(unfiltered.len(), 2);
        assert!(unfiltered.iter().all(|g| g.catch_details.is_none()));

        let mut filter = group_filter();
        filter.process_id = Some(2);
        let filtered = pending_process(
            &filter,
            &projects,
            &sheets,
            &transactions,
            &[],
            &HashMap::new(),
        );
        assert_eq!(filtered.len(), 1);
        let details = filtered[0].catch_details.as_ref().unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].catch_no, "C1");
        assert_eq!(details[0].quantity, dec("200"));
    }

    #[test]
    fn other_groups_projects_never_appear() {
        let projects = vec![project(100, 5), project(200, 9)];
        let sheets = vec![
            sheet(1, 100, "1", 200, "01-03-2026"),
            sheet(2, 200, "1", 400, "01-03-2026"),
        ];
        let transactions = vec![tx(10, 1, 2, 1), tx(11, 2, 2, 1)];

        let result = pending_process(
            &group_filter(),
            &projects,
            &sheets,
            &transactions,
            &[],
            &HashMap::new(),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].project_id, 100);
    }

    #[test]
    fn completed_transactions_never_pend() {
        let projects = vec![project(100, 5)];
        let sheets = vec![sheet(1, 100, "1", 200, "01-03-2026")];
        let transactions = vec![tx(10, 1, 2, 2)];

        let result = pending_process(
            &group_filter(),
            &projects,
            &sheets,
            &transactions,
            &[],
            &HashMap::new(),
        );
        assert!(result.is_empty());
    }
}

// ============================================================================
// Unit Tests: Board Status Labels
// ============================================================================

mod board_labels {
    use super::*;

    #[test]
    fn status_labels_for_the_dashboard() {
        assert_eq!(CatchStatus::Pending.label(), "Pending");
        assert_eq!(CatchStatus::Running.label(), "Running");
        assert_eq!(CatchStatus::Completed.label(), "Completed");
    }

    #[test]
    fn unfinished_completion_entry_still_reads_pending() {
        // Only a stub row under the completion process exists; nothing
        // has actually run, so the board shows Pending.
        let s = sheet(1, 100, "1", 200, "01-03-2026");
        let stub = vec![tx(10, 1, 12, 0)];
        assert_eq!(catch_status(&s, &stub, 12), CatchStatus::Pending);
    }

    #[test]
    fn under_production_serializes_camel_case() {
        let projects = vec![project(100, 5)];
        let sheets = vec![sheet(1, 100, "1", 200, "01-03-2026")];
        let result = under_production(&projects, &sheets, &[], 88);
        let value = serde_json::to_value(&result[0]).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("projectName"));
        assert!(object.contains_key("lotNo"));
        assert!(object.contains_key("totalCatches"));
        assert!(object.contains_key("fromDate"));
    }
}
