//! Reporting tests for the Exam Production Tracking Platform
//!
//! Feature: exam-production-tracking
//! Tests for the report date filters and completion-event scanning:
//! - Property 15: Report Date Strictness
//! - Property 16: Quick-Completion Window

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use shared::{parse_exam_date, parse_report_date, EventLog, STATUS_UPDATED_EVENT, TRANSACTION_CATEGORY};
use uuid::Uuid;

/// Window rule applied when pairing completion marks on one transaction:
/// the two events must sit strictly inside the configured window,
/// whichever order they were logged in.
fn is_quick_pair(first: DateTime<Utc>, second: DateTime<Utc>, window_minutes: i64) -> bool {
    (second - first).num_seconds().abs() < window_minutes * 60
}

fn completion_mark(transaction_id: i32, logged_at: DateTime<Utc>) -> EventLog {
    EventLog {
        event_id: 1,
        event: STATUS_UPDATED_EVENT.into(),
        category: TRANSACTION_CATEGORY.into(),
        transaction_id: Some(transaction_id),
        old_value: Some("1".into()),
        new_value: Some("2".into()),
        logged_at,
        event_triggered_by: Uuid::nil(),
    }
}

// ============================================================================
// Property 15: Report Date Strictness
// ============================================================================
// Report filters accept dd-MM-yyyy and nothing else; free-text exam
// dates parse leniently across the operator-entry formats.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 15: Report Date Strictness
    /// Any calendar date round-trips through the report format.
    #[test]
    fn property_15_report_dates_round_trip(
        year in 2020i32..2035,
        month in 1u32..=12,
        day in 1u32..=28,
    ) {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let formatted = date.format("%d-%m-%Y").to_string();
        prop_assert_eq!(parse_report_date(&formatted), Ok(date));

        // The same date in ISO form is rejected by the strict filter.
        let iso = date.format("%Y-%m-%d").to_string();
        prop_assert!(parse_report_date(&iso).is_err());
    }

    /// Property 15 variant: exam dates accept every operator-entry
    /// format and agree on the parsed value.
    #[test]
    fn property_15_exam_dates_accept_entry_formats(
        year in 2020i32..2035,
        month in 1u32..=12,
        day in 1u32..=28,
    ) {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let dashed = date.format("%d-%m-%Y").to_string();
        let slashed = date.format("%d/%m/%Y").to_string();
        let iso = date.format("%Y-%m-%d").to_string();

        prop_assert_eq!(parse_exam_date(&dashed), Some(date));
        prop_assert_eq!(parse_exam_date(&slashed), Some(date));
        prop_assert_eq!(parse_exam_date(&iso), Some(date));
    }
}

// ============================================================================
// Property 16: Quick-Completion Window
// ============================================================================
// The quick-completion report flags pairs of completion marks landing
// suspiciously close together. The rule is symmetric in event order and
// the window bound itself does not match.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 16: Quick-Completion Window
    /// Pairing is symmetric: log order never changes the verdict.
    #[test]
    fn property_16_window_is_symmetric(
        offset_seconds in -3600i64..=3600,
        window_minutes in 1i64..=30,
    ) {
        let base = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let other = base + Duration::seconds(offset_seconds);
        prop_assert_eq!(
            is_quick_pair(base, other, window_minutes),
            is_quick_pair(other, base, window_minutes),
            "pairing verdict changed with event order at offset {}s",
            offset_seconds
        );
    }

    /// Property 16 variant: the window is an open bound.
    #[test]
    fn property_16_window_bound_excluded(
        window_minutes in 1i64..=30,
    ) {
        let base = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let at_bound = base + Duration::seconds(window_minutes * 60);
        let just_inside = base + Duration::seconds(window_minutes * 60 - 1);

        prop_assert!(!is_quick_pair(base, at_bound, window_minutes));
        prop_assert!(is_quick_pair(base, just_inside, window_minutes));
    }
}

// ============================================================================
// Unit Tests: Report Date Filters
// ============================================================================

mod report_date_filters {
    use super::*;

    #[test]
    fn report_filter_trims_whitespace() {
        assert_eq!(
            parse_report_date(" 01-01-2026 "),
            Ok(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
        );
    }

    #[test]
    fn report_filter_rejects_malformed_input() {
        assert!(parse_report_date("01/01/2026").is_err());
        assert!(parse_report_date("01-01").is_err());
        assert!(parse_report_date("").is_err());
        assert!(parse_report_date("tomorrow").is_err());
    }

    #[test]
    fn exam_dates_tolerate_garbage_silently() {
        assert_eq!(parse_exam_date("TBD"), None);
        assert_eq!(parse_exam_date("31-02-2026"), None);
        assert_eq!(parse_exam_date(""), None);
    }
}

// ============================================================================
// Unit Tests: Completion Mark Scanning
// ============================================================================

mod completion_marks {
    use super::*;

    #[test]
    fn daily_report_counts_only_completion_marks() {
        let base = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let mut wip_entry = completion_mark(900, base);
        wip_entry.new_value = Some("1".into());
        let mut remark_entry = completion_mark(901, base);
        remark_entry.event = "Remarks added".into();

        let trail = vec![
            completion_mark(900, base),
            wip_entry,
            completion_mark(901, base + Duration::minutes(3)),
            remark_entry,
        ];

        let completions = trail.iter().filter(|e| e.marks_completion()).count();
        assert_eq!(completions, 2);
    }

    #[test]
    fn repeated_completions_on_one_transaction_pair_up() {
        // A transaction reopened and completed again within the window
        // is exactly what the quick-completion report surfaces.
        let base = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let first = completion_mark(900, base);
        let second = completion_mark(900, base + Duration::minutes(2));

        assert_eq!(first.transaction_id, second.transaction_id);
        assert!(is_quick_pair(first.logged_at, second.logged_at, 5));
        assert!(!is_quick_pair(first.logged_at, second.logged_at, 1));
    }
}
