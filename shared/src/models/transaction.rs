//! Process transaction models and the audit field diff

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One execution attempt of a process on a catch.
///
/// At most one current row exists per (quantity_sheet_id, lot_no,
/// process_id); repeated submissions update in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessTransaction {
    pub transaction_id: i32,
    pub project_id: i32,
    pub quantity_sheet_id: i32,
    pub process_id: i32,
    pub lot_no: String,
    pub interim_quantity: Decimal,
    pub remarks: Option<String>,
    pub voice_recording: Option<String>,
    pub zone_id: i32,
    pub machine_id: i32,
    /// 0 = pending, 1 = WIP, 2 = completed
    pub status: i32,
    /// Alarm reference as stored: numeric string, "0" or empty for none
    pub alarm_id: Option<String>,
    pub team_ids: Vec<i32>,
}

impl ProcessTransaction {
    pub fn is_completed(&self) -> bool {
        self.status == 2
    }

    pub fn is_wip(&self) -> bool {
        self.status == 1
    }
}

/// The fields a process-execution submission may change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub interim_quantity: Decimal,
    pub remarks: Option<String>,
    pub voice_recording: Option<String>,
    pub zone_id: i32,
    pub machine_id: i32,
    pub status: i32,
    pub alarm_id: Option<String>,
    pub team_ids: Vec<i32>,
}

impl TransactionPatch {
    /// One-line summary logged when a new transaction is created.
    pub fn creation_summary(&self) -> String {
        format!(
            "TeamId: {}, ZoneId: {}, MachineId: {}",
            join_team_ids(&self.team_ids),
            self.zone_id,
            self.machine_id
        )
    }
}

/// A single audited field change, recorded to the event log as
/// "{field} updated" or "{field} added".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub old_value: Option<String>,
    pub new_value: String,
}

impl FieldChange {
    pub fn event(&self) -> String {
        match self.old_value {
            Some(_) => format!("{} updated", self.field),
            None => format!("{} added", self.field),
        }
    }
}

pub fn join_team_ids(team_ids: &[i32]) -> String {
    team_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Diff an existing transaction against an incoming patch.
///
/// Field names match the historical audit trail, which reports filter on
/// (for example "Status updated" with new value "2"). A field going from
/// a value to nothing is not recorded; that mirrors the existing trail.
pub fn diff_transaction(existing: &ProcessTransaction, patch: &TransactionPatch) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    record(
        &mut changes,
        "InterimQuantity",
        Some(existing.interim_quantity.to_string()),
        Some(patch.interim_quantity.to_string()),
    );
    record(&mut changes, "Remarks", existing.remarks.clone(), patch.remarks.clone());
    record(
        &mut changes,
        "VoiceRecording",
        existing.voice_recording.clone(),
        patch.voice_recording.clone(),
    );
    record(
        &mut changes,
        "ZoneId",
        Some(existing.zone_id.to_string()),
        Some(patch.zone_id.to_string()),
    );
    record(
        &mut changes,
        "MachineId",
        Some(existing.machine_id.to_string()),
        Some(patch.machine_id.to_string()),
    );
    record(
        &mut changes,
        "Status",
        Some(existing.status.to_string()),
        Some(patch.status.to_string()),
    );
    record(&mut changes, "AlarmId", existing.alarm_id.clone(), patch.alarm_id.clone());
    record(
        &mut changes,
        "TeamId",
        Some(join_team_ids(&existing.team_ids)),
        Some(join_team_ids(&patch.team_ids)),
    );

    changes
}

/// Field list logged when a fanned-out transaction row is inserted:
/// every populated field becomes an "added" entry.
pub fn insertion_changes(created: &ProcessTransaction) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    let mut add = |field: &'static str, value: Option<String>| {
        if let Some(new_value) = value {
            changes.push(FieldChange {
                field,
                old_value: None,
                new_value,
            });
        }
    };

    add("TransactionId", Some(created.transaction_id.to_string()));
    add("InterimQuantity", Some(created.interim_quantity.to_string()));
    add("Remarks", created.remarks.clone());
    add("VoiceRecording", created.voice_recording.clone());
    add("ProjectId", Some(created.project_id.to_string()));
    add("QuantitysheetId", Some(created.quantity_sheet_id.to_string()));
    add("ProcessId", Some(created.process_id.to_string()));
    add("ZoneId", Some(created.zone_id.to_string()));
    add("MachineId", Some(created.machine_id.to_string()));
    add("Status", Some(created.status.to_string()));
    add("AlarmId", created.alarm_id.clone());
    add("LotNo", Some(created.lot_no.clone()));
    add("TeamId", Some(join_team_ids(&created.team_ids)));

    changes
}

fn record(
    changes: &mut Vec<FieldChange>,
    field: &'static str,
    old: Option<String>,
    new: Option<String>,
) {
    match (old, new) {
        (Some(old_value), Some(new_value)) if old_value != new_value => {
            changes.push(FieldChange {
                field,
                old_value: Some(old_value),
                new_value,
            });
        }
        (None, Some(new_value)) => changes.push(FieldChange {
            field,
            old_value: None,
            new_value,
        }),
        _ => {}
    }
}
