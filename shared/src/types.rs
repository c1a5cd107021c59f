//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Lifecycle states of a process transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Wip,
    Completed,
}

impl TransactionStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(TransactionStatus::Pending),
            1 => Some(TransactionStatus::Wip),
            2 => Some(TransactionStatus::Completed),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            TransactionStatus::Pending => 0,
            TransactionStatus::Wip => 1,
            TransactionStatus::Completed => 2,
        }
    }
}

/// How a process relates to its predecessor in the pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    /// Depends on the immediately preceding sequence number
    #[default]
    Sequential,
    /// Depends on the process at its `range_start` sequence instead
    Independent,
}

impl ProcessType {
    /// Parses the stored tag; anything other than "Independent" is
    /// treated as sequential.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("Independent") => ProcessType::Independent,
            _ => ProcessType::Sequential,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ProcessType::Sequential => "Sequential",
            ProcessType::Independent => "Independent",
        }
    }
}

/// Which quantity sheets an aggregation considers in scope.
///
/// The project-wide completion rollup keeps stopped catches in the
/// percentages; the combined lot report drops them. Both behaviors are
/// intentional and must stay distinguishable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CatchScope {
    IncludeStopped,
    ExcludeStopped,
}

/// Production status of a catch as shown on the status board
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CatchStatus {
    Pending,
    Running,
    Completed,
}

impl CatchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CatchStatus::Pending => "Pending",
            CatchStatus::Running => "Running",
            CatchStatus::Completed => "Completed",
        }
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.per_page as u64
    }

    pub fn total_pages(&self, total_items: u64) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        total_items.div_ceil(self.per_page as u64) as u32
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// Date range for report queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}
