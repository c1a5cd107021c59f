//! Dispatch records for completed lots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dispatch of one lot of a project to the destination centre.
///
/// One row per (project_id, lot_no); re-submitting replaces the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispatch {
    pub id: i32,
    pub project_id: i32,
    pub lot_no: String,
    /// Process under which the dispatch was recorded; the pipeline's
    /// dispatch process id marks the lot complete for aggregation.
    pub process_id: i32,
    pub box_count: Option<i32>,
    pub messenger_name: Option<String>,
    pub messenger_mobile: Option<String>,
    pub dispatch_mode: Option<String>,
    pub vehicle_number: Option<String>,
    pub driver_name: Option<String>,
    pub driver_mobile: Option<String>,
    /// True once the consignment has physically left
    pub status: bool,
    pub dispatch_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Dispatch {
    /// Whether this record marks the given lot of its project as
    /// dispatched under the given process.
    pub fn covers(&self, lot_no: &str, process_id: i32) -> bool {
        self.lot_no == lot_no && self.process_id == process_id
    }

    /// Planned but not yet departed.
    pub fn is_pending(&self) -> bool {
        !self.status && self.dispatch_date.is_some()
    }
}
