//! Audit event log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category written for every transaction-lifecycle entry and filtered
/// on by the production reports.
pub const TRANSACTION_CATEGORY: &str = "Transaction";

/// Category written for dispatch lifecycle entries.
pub const DISPATCH_CATEGORY: &str = "Dispatch";

/// Event name recorded when a transaction's status field changes.
pub const STATUS_UPDATED_EVENT: &str = "Status updated";

/// One append-only audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    pub event_id: i32,
    pub event: String,
    pub category: String,
    pub transaction_id: Option<i32>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub logged_at: DateTime<Utc>,
    pub event_triggered_by: Uuid,
}

impl EventLog {
    /// Whether this entry records a transaction reaching completed status.
    pub fn marks_completion(&self) -> bool {
        self.event == STATUS_UPDATED_EVENT && self.new_value.as_deref() == Some("2")
    }
}
