//! Project pipeline: the ordered, weighted process chain
//!
//! Aggregation never reads the process master directly; callers load the
//! project's process rows into a [`Pipeline`] and every engine works off
//! that. Entries are kept sorted by sequence.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProcessType;

/// One process stage of a project's pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEntry {
    pub process_id: i32,
    pub process_name: String,
    pub sequence: i32,
    pub weightage: Decimal,
    pub process_type: ProcessType,
    /// For independent stages: the sequence they observe instead of
    /// their own predecessor.
    pub range_start: Option<i32>,
}

/// A project's process chain, sorted by sequence.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    entries: Vec<PipelineEntry>,
}

impl Pipeline {
    pub fn from_entries(mut entries: Vec<PipelineEntry>) -> Self {
        entries.sort_by_key(|e| e.sequence);
        Self { entries }
    }

    pub fn entries(&self) -> &[PipelineEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn first(&self) -> Option<&PipelineEntry> {
        self.entries.first()
    }

    pub fn contains(&self, process_id: i32) -> bool {
        self.find_process(process_id).is_some()
    }

    pub fn find_process(&self, process_id: i32) -> Option<&PipelineEntry> {
        self.entries.iter().find(|e| e.process_id == process_id)
    }

    pub fn find_by_sequence(&self, sequence: i32) -> Option<&PipelineEntry> {
        self.entries.iter().find(|e| e.sequence == sequence)
    }

    /// The entry sitting `offset` sequence steps from the given process,
    /// or None when either end of the hop is missing.
    pub fn find_by_sequence_offset(&self, process_id: i32, offset: i32) -> Option<&PipelineEntry> {
        let sequence = self.sequence_of(process_id)?;
        self.find_by_sequence(sequence + offset)
    }

    pub fn sequence_of(&self, process_id: i32) -> Option<i32> {
        self.find_process(process_id).map(|e| e.sequence)
    }

    pub fn weightage_of(&self, process_id: i32) -> Option<Decimal> {
        self.find_process(process_id).map(|e| e.weightage)
    }

    /// The cutting stage, if this project has one.
    pub fn cutting_stage(&self, constants: &PipelineConstants) -> Option<&PipelineEntry> {
        self.find_process(constants.cutting_process_id)
    }

    /// Sequence of the cutting stage, if this project has one.
    pub fn cutting_sequence(&self, constants: &PipelineConstants) -> Option<i32> {
        self.cutting_stage(constants).map(|e| e.sequence)
    }
}

/// Well-known process and type ids.
///
/// These identify the structural stages the engines branch on. They are
/// stable master data, overridable through configuration for deployments
/// that seed the process table differently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConstants {
    pub ctp_process_id: i32,
    pub offset_printing_process_id: i32,
    pub digital_printing_process_id: i32,
    pub cutting_process_id: i32,
    pub completion_process_id: i32,
    pub dispatch_process_id: i32,
    pub booklet_type_id: i32,
    pub paper_type_id: i32,
    /// Divisor applied when a booklet project's post-cutting feed is
    /// composed from printed-sheet counts.
    pub booklet_quarter_divisor: i64,
}

impl Default for PipelineConstants {
    fn default() -> Self {
        Self {
            ctp_process_id: 1,
            offset_printing_process_id: 2,
            digital_printing_process_id: 3,
            cutting_process_id: 4,
            completion_process_id: 12,
            dispatch_process_id: 14,
            booklet_type_id: 1,
            paper_type_id: 2,
            booklet_quarter_divisor: 4,
        }
    }
}
