//! Quantity sheet ("catch") models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catch: one unit of printable content inside a lot.
///
/// `process_ids` is the set of pipeline processes this catch must pass
/// through — a membership test, not a single foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantitySheet {
    pub quantity_sheet_id: i32,
    pub project_id: i32,
    pub lot_no: String,
    pub catch_no: String,
    pub paper: Option<String>,
    pub course: Option<String>,
    pub subject: Option<String>,
    pub inner_envelope: Option<String>,
    pub outer_envelope: Option<i32>,
    /// Free text, parsed defensively (`validation::parse_exam_date`)
    pub exam_date: String,
    pub exam_time: Option<String>,
    pub quantity: Decimal,
    pub pages: Option<i32>,
    /// Catch-level weight; typically sums to 100 within a lot
    pub percentage_catch: Decimal,
    pub process_ids: Vec<i32>,
    /// 1 = active/in-scope
    pub status: i32,
    /// Nonzero stops the catch: excluded from percentage aggregation
    /// but still counted by pipeline statistics
    pub stop_catch: i32,
}

impl QuantitySheet {
    pub fn is_active(&self) -> bool {
        self.status == 1
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_catch != 0
    }

    pub fn requires_process(&self, process_id: i32) -> bool {
        self.process_ids.contains(&process_id)
    }
}
