//! Process execution submissions.
//!
//! A submission is a find-or-create keyed on (quantity_sheet_id, lot_no,
//! process_id), run inside a database transaction. Single-sheet processes
//! (printing and cutting stages, configurable) target exactly the submitted
//! sheet; every other process fans out across all sheets sharing the
//! submitted catch's (catch_no, lot_no, project_id), so one scan at the
//! binding table marks the whole catch. Every field change lands in the
//! event log.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::{
    diff_transaction, insertion_changes, FieldChange, ProcessTransaction, TransactionPatch,
    TRANSACTION_CATEGORY,
};
use shared::validation::{validate_lot_no, validate_quantity, validate_transaction_status};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct TransactionService {
    db: PgPool,
    single_sheet_process_names: Vec<String>,
}

/// Database row for process_transactions
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    transaction_id: i32,
    project_id: i32,
    quantity_sheet_id: i32,
    process_id: i32,
    lot_no: String,
    interim_quantity: Decimal,
    remarks: Option<String>,
    voice_recording: Option<String>,
    zone_id: i32,
    machine_id: i32,
    status: i32,
    alarm_id: Option<String>,
    team_ids: Vec<i32>,
}

impl From<TransactionRow> for ProcessTransaction {
    fn from(row: TransactionRow) -> Self {
        ProcessTransaction {
            transaction_id: row.transaction_id,
            project_id: row.project_id,
            quantity_sheet_id: row.quantity_sheet_id,
            process_id: row.process_id,
            lot_no: row.lot_no,
            interim_quantity: row.interim_quantity,
            remarks: row.remarks,
            voice_recording: row.voice_recording,
            zone_id: row.zone_id,
            machine_id: row.machine_id,
            status: row.status,
            alarm_id: row.alarm_id,
            team_ids: row.team_ids,
        }
    }
}

/// One process-execution submission from the floor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTransactionInput {
    pub project_id: i32,
    pub quantity_sheet_id: i32,
    pub process_id: i32,
    pub lot_no: String,
    pub interim_quantity: Decimal,
    pub remarks: Option<String>,
    pub voice_recording: Option<String>,
    pub zone_id: i32,
    pub machine_id: i32,
    pub status: i32,
    pub alarm_id: Option<String>,
    #[serde(default)]
    pub team_ids: Vec<i32>,
}

impl SaveTransactionInput {
    fn validate(&self) -> AppResult<()> {
        if let Err(message) = validate_lot_no(&self.lot_no) {
            return Err(AppError::Validation {
                field: "lotNo".to_string(),
                message: message.to_string(),
                message_hi: "लॉट नंबर अमान्य है".to_string(),
            });
        }
        if let Err(message) = validate_quantity(self.interim_quantity) {
            return Err(AppError::Validation {
                field: "interimQuantity".to_string(),
                message: message.to_string(),
                message_hi: "मात्रा अमान्य है".to_string(),
            });
        }
        if let Err(message) = validate_transaction_status(self.status) {
            return Err(AppError::Validation {
                field: "status".to_string(),
                message: message.to_string(),
                message_hi: "स्थिति अमान्य है".to_string(),
            });
        }
        Ok(())
    }

    fn patch(&self) -> TransactionPatch {
        TransactionPatch {
            interim_quantity: self.interim_quantity,
            remarks: self.remarks.clone(),
            voice_recording: self.voice_recording.clone(),
            zone_id: self.zone_id,
            machine_id: self.machine_id,
            status: self.status,
            alarm_id: self.alarm_id.clone(),
            team_ids: self.team_ids.clone(),
        }
    }
}

/// Tally of rows touched by one submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTransactionResult {
    pub created: usize,
    pub updated: usize,
    pub transaction_ids: Vec<i32>,
}

impl TransactionService {
    pub fn new(db: PgPool, single_sheet_process_names: Vec<String>) -> Self {
        Self {
            db,
            single_sheet_process_names,
        }
    }

    /// Record a process execution, creating or updating transaction rows
    /// and writing the audit trail for every changed field.
    pub async fn save(
        &self,
        user_id: Uuid,
        input: SaveTransactionInput,
    ) -> AppResult<SaveTransactionResult> {
        input.validate()?;

        // The process must exist before any write happens.
        let process_name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM processes WHERE id = $1",
        )
        .bind(input.process_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Validation {
            field: "processId".to_string(),
            message: "Invalid ProcessId".to_string(),
            message_hi: "प्रक्रिया आईडी अमान्य है".to_string(),
        })?;

        let single_sheet = self
            .single_sheet_process_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&process_name));

        let mut tx = self.db.begin().await?;

        let mut result = SaveTransactionResult {
            created: 0,
            updated: 0,
            transaction_ids: Vec::new(),
        };

        if single_sheet {
            self.upsert_for_sheet(&mut tx, user_id, &input, input.quantity_sheet_id, true, &mut result)
                .await?;
        } else {
            // Fan out across every sheet of the submitted catch.
            let catch_no = sqlx::query_scalar::<_, String>(
                "SELECT catch_no FROM quantity_sheets WHERE quantity_sheet_id = $1",
            )
            .bind(input.quantity_sheet_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("QuantitySheet".to_string()))?;

            let sheet_ids = sqlx::query_scalar::<_, i32>(
                r#"
                SELECT quantity_sheet_id FROM quantity_sheets
                WHERE catch_no = $1 AND lot_no = $2 AND project_id = $3
                ORDER BY quantity_sheet_id
                "#,
            )
            .bind(&catch_no)
            .bind(&input.lot_no)
            .bind(input.project_id)
            .fetch_all(&mut *tx)
            .await?;

            if sheet_ids.is_empty() {
                return Err(AppError::NotFound(
                    "Matching QuantitySheet".to_string(),
                ));
            }

            for sheet_id in sheet_ids {
                self.upsert_for_sheet(&mut tx, user_id, &input, sheet_id, false, &mut result)
                    .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            project_id = input.project_id,
            process_id = input.process_id,
            lot_no = %input.lot_no,
            created = result.created,
            updated = result.updated,
            "transaction submission processed"
        );

        Ok(result)
    }

    /// Find-or-create one transaction row for one sheet.
    ///
    /// Updates log one event per changed field. Creations for single-sheet
    /// processes log a one-line summary; fanned-out creations log every
    /// populated field, matching the shape the historical trail carries.
    async fn upsert_for_sheet(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        input: &SaveTransactionInput,
        sheet_id: i32,
        single_sheet: bool,
        result: &mut SaveTransactionResult,
    ) -> AppResult<()> {
        let patch = input.patch();

        let query = r#"
            SELECT transaction_id, project_id, quantity_sheet_id, process_id, lot_no,
                   interim_quantity, remarks, voice_recording, zone_id, machine_id,
                   status, alarm_id, team_ids
            FROM process_transactions
            WHERE quantity_sheet_id = $1 AND lot_no = $2 AND process_id = $3
        "#;
        let existing = sqlx::query_as::<_, TransactionRow>(query)
            .bind(sheet_id)
            .bind(&input.lot_no)
            .bind(input.process_id)
            .fetch_optional(&mut **tx)
            .await?
            .map(ProcessTransaction::from);

        match existing {
            Some(current) => {
                let changes = diff_transaction(&current, &patch);

                sqlx::query(
                    r#"
                    UPDATE process_transactions
                    SET interim_quantity = $1, remarks = $2, voice_recording = $3,
                        zone_id = $4, machine_id = $5, status = $6, alarm_id = $7,
                        team_ids = $8, updated_at = NOW()
                    WHERE transaction_id = $9
                    "#,
                )
                .bind(patch.interim_quantity)
                .bind(&patch.remarks)
                .bind(&patch.voice_recording)
                .bind(patch.zone_id)
                .bind(patch.machine_id)
                .bind(patch.status)
                .bind(&patch.alarm_id)
                .bind(&patch.team_ids)
                .bind(current.transaction_id)
                .execute(&mut **tx)
                .await?;

                for change in &changes {
                    self.log_change(tx, user_id, current.transaction_id, change)
                        .await?;
                }

                result.updated += 1;
                result.transaction_ids.push(current.transaction_id);
            }
            None => {
                let transaction_id = sqlx::query_scalar::<_, i32>(
                    r#"
                    INSERT INTO process_transactions
                        (project_id, quantity_sheet_id, process_id, lot_no, interim_quantity,
                         remarks, voice_recording, zone_id, machine_id, status, alarm_id, team_ids)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    RETURNING transaction_id
                    "#,
                )
                .bind(input.project_id)
                .bind(sheet_id)
                .bind(input.process_id)
                .bind(&input.lot_no)
                .bind(patch.interim_quantity)
                .bind(&patch.remarks)
                .bind(&patch.voice_recording)
                .bind(patch.zone_id)
                .bind(patch.machine_id)
                .bind(patch.status)
                .bind(&patch.alarm_id)
                .bind(&patch.team_ids)
                .fetch_one(&mut **tx)
                .await?;

                if single_sheet {
                    self.log_event(
                        tx,
                        user_id,
                        transaction_id,
                        "Transaction created",
                        None,
                        Some(&patch.creation_summary()),
                    )
                    .await?;
                } else {
                    let created = ProcessTransaction {
                        transaction_id,
                        project_id: input.project_id,
                        quantity_sheet_id: sheet_id,
                        process_id: input.process_id,
                        lot_no: input.lot_no.clone(),
                        interim_quantity: patch.interim_quantity,
                        remarks: patch.remarks.clone(),
                        voice_recording: patch.voice_recording.clone(),
                        zone_id: patch.zone_id,
                        machine_id: patch.machine_id,
                        status: patch.status,
                        alarm_id: patch.alarm_id.clone(),
                        team_ids: patch.team_ids.clone(),
                    };
                    for change in insertion_changes(&created) {
                        self.log_change(tx, user_id, transaction_id, &change).await?;
                    }
                }

                result.created += 1;
                result.transaction_ids.push(transaction_id);
            }
        }

        Ok(())
    }

    async fn log_change(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        transaction_id: i32,
        change: &FieldChange,
    ) -> AppResult<()> {
        self.log_event(
            tx,
            user_id,
            transaction_id,
            &change.event(),
            change.old_value.as_deref(),
            Some(&change.new_value),
        )
        .await
    }

    async fn log_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        transaction_id: i32,
        event: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO event_logs (event, category, transaction_id, old_value, new_value, event_triggered_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event)
        .bind(TRANSACTION_CATEGORY)
        .bind(transaction_id)
        .bind(old_value)
        .bind(new_value)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// All transactions for a project, optionally narrowed to one lot.
    pub async fn list_for_project(
        &self,
        project_id: i32,
        lot_no: Option<&str>,
    ) -> AppResult<Vec<ProcessTransaction>> {
        let query = r#"
            SELECT transaction_id, project_id, quantity_sheet_id, process_id, lot_no,
                   interim_quantity, remarks, voice_recording, zone_id, machine_id,
                   status, alarm_id, team_ids
            FROM process_transactions
            WHERE project_id = $1 AND ($2::TEXT IS NULL OR lot_no = $2)
            ORDER BY transaction_id
        "#;
        let rows = sqlx::query_as::<_, TransactionRow>(query)
            .bind(project_id)
            .bind(lot_no)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(ProcessTransaction::from).collect())
    }
}
