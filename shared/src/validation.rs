//! Validation and defensive-parsing utilities for the Exam Production
//! Tracking Platform
//!
//! Exam dates arrive as free text typed by data-entry operators, so every
//! consumer parses them defensively and drops what it cannot read.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Formats accepted for free-text exam dates, tried in order.
const EXAM_DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// The strict format required for report date filters.
pub const REPORT_DATE_FORMAT: &str = "%d-%m-%Y";

// ============================================================================
// Defensive Parsing
// ============================================================================

/// Parse a free-text exam date. Returns None for anything unreadable;
/// callers exclude unparseable dates from min/max ranges.
pub fn parse_exam_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    EXAM_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Parse a report date filter, which must be dd-MM-yyyy exactly.
pub fn parse_report_date(raw: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(raw.trim(), REPORT_DATE_FORMAT)
        .map_err(|_| "Invalid date format. Use dd-MM-yyyy")
}

/// Parse an alarm reference. Alarm ids are stored as strings where "0",
/// empty, or junk all mean "no alarm".
pub fn parse_alarm_id(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
        .filter(|id| *id != 0)
}

/// Normalized key for case-insensitive lot comparisons (dispatch rows
/// and quantity sheets disagree on lot-number casing).
pub fn lot_key(lot_no: &str) -> String {
    lot_no.trim().to_lowercase()
}

// ============================================================================
// Input Validations
// ============================================================================

/// Validate that a lot number is present
pub fn validate_lot_no(lot_no: &str) -> Result<(), &'static str> {
    if lot_no.trim().is_empty() {
        return Err("Lot number cannot be empty");
    }
    Ok(())
}

/// Validate a quantity is non-negative
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate a process weightage is within percentage bounds
pub fn validate_weightage(weightage: Decimal) -> Result<(), &'static str> {
    if weightage < Decimal::ZERO {
        return Err("Weightage cannot be negative");
    }
    if weightage > Decimal::from(100) {
        return Err("Weightage cannot exceed 100");
    }
    Ok(())
}

/// Validate a transaction status code
pub fn validate_transaction_status(status: i32) -> Result<(), &'static str> {
    if !(0..=2).contains(&status) {
        return Err("Transaction status must be 0 (pending), 1 (WIP) or 2 (completed)");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Defensive Parsing Tests
    // ========================================================================

    #[test]
    fn test_parse_exam_date_primary_format() {
        assert_eq!(
            parse_exam_date("15-03-2025"),
            NaiveDate::from_ymd_opt(2025, 3, 15)
        );
    }

    #[test]
    fn test_parse_exam_date_alternate_formats() {
        assert_eq!(
            parse_exam_date("15/03/2025"),
            NaiveDate::from_ymd_opt(2025, 3, 15)
        );
        assert_eq!(
            parse_exam_date("2025-03-15"),
            NaiveDate::from_ymd_opt(2025, 3, 15)
        );
    }

    #[test]
    fn test_parse_exam_date_trims_whitespace() {
        assert_eq!(
            parse_exam_date("  01-01-2026 "),
            NaiveDate::from_ymd_opt(2026, 1, 1)
        );
    }

    #[test]
    fn test_parse_exam_date_garbage() {
        assert_eq!(parse_exam_date(""), None);
        assert_eq!(parse_exam_date("TBD"), None);
        assert_eq!(parse_exam_date("32-01-2025"), None);
        assert_eq!(parse_exam_date("2025"), None);
    }

    #[test]
    fn test_parse_report_date_strict() {
        assert!(parse_report_date("01-12-2025").is_ok());
        assert!(parse_report_date("2025-12-01").is_err());
        assert!(parse_report_date("1/12/2025").is_err());
        assert!(parse_report_date("").is_err());
    }

    #[test]
    fn test_parse_alarm_id() {
        assert_eq!(parse_alarm_id(Some("7")), Some(7));
        assert_eq!(parse_alarm_id(Some(" 12 ")), Some(12));
        assert_eq!(parse_alarm_id(Some("0")), None);
        assert_eq!(parse_alarm_id(Some("none")), None);
        assert_eq!(parse_alarm_id(Some("")), None);
        assert_eq!(parse_alarm_id(None), None);
    }

    #[test]
    fn test_lot_key_case_insensitive() {
        assert_eq!(lot_key("LOT-1"), lot_key("lot-1"));
        assert_eq!(lot_key(" Lot-2 "), "lot-2");
    }

    // ========================================================================
    // Input Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_lot_no() {
        assert!(validate_lot_no("1").is_ok());
        assert!(validate_lot_no("   ").is_err());
        assert!(validate_lot_no("").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(Decimal::ZERO).is_ok());
        assert!(validate_quantity(Decimal::from(4000)).is_ok());
        assert!(validate_quantity(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_weightage_bounds() {
        assert!(validate_weightage(Decimal::ZERO).is_ok());
        assert!(validate_weightage(Decimal::from(100)).is_ok());
        assert!(validate_weightage(Decimal::from(101)).is_err());
        assert!(validate_weightage(Decimal::from(-5)).is_err());
    }

    #[test]
    fn test_validate_transaction_status() {
        assert!(validate_transaction_status(0).is_ok());
        assert!(validate_transaction_status(1).is_ok());
        assert!(validate_transaction_status(2).is_ok());
        assert!(validate_transaction_status(3).is_err());
        assert!(validate_transaction_status(-1).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("operator@1").is_ok());
        assert!(validate_password("short").is_err());
    }
}
