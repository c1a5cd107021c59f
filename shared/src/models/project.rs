//! Project and group models

use serde::{Deserialize, Serialize};

/// An examination-material production project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i32,
    pub name: String,
    pub description: Option<String>,
    /// 1 = booklet, 2 = loose paper (see `PipelineConstants`)
    pub type_id: i32,
    pub group_id: i32,
    /// Number of parallel series (A/B/C/...) the catches are printed in
    pub no_of_series: Option<i32>,
    /// Characters of this string label the series
    pub series_name: Option<String>,
    pub status: bool,
}

impl Project {
    /// Series divisor for per-series normalization. Zero or negative
    /// stored values degrade to 1 rather than a division fault.
    pub fn series_divisor(&self) -> i64 {
        match self.no_of_series {
            Some(n) if n > 0 => n as i64,
            _ => 1,
        }
    }
}

/// An organizational group owning projects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub status: bool,
}
