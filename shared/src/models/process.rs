//! Process master data and pipeline membership

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ProcessType;

/// A production process (printing, cutting, packaging, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub id: i32,
    pub name: String,
    /// Default weightage suggested when the process joins a pipeline
    pub weightage: Decimal,
    pub status: bool,
    pub process_type: ProcessType,
    /// For independent processes: the sequence this one depends on
    pub range_start: Option<i32>,
    pub range_end: Option<i32>,
}

/// Membership of a process in a project's pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectProcess {
    pub id: i32,
    pub project_id: i32,
    pub process_id: i32,
    /// Percentage points this process contributes to catch completion
    pub weightage: Decimal,
    /// Position in the pipeline, unique per project
    pub sequence: i32,
    /// Operators assigned to work this process
    pub user_ids: Vec<Uuid>,
}
