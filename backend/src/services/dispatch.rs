//! Dispatch records, the terminal shipment event of a (project, lot).
//!
//! Submitting a dispatch for a key that already has one replaces the old
//! row, so the table always holds exactly one row per (project_id, lot_no).
//! The completion aggregator reads these rows to decide when the dispatch
//! stage of a lot counts as earned.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::BTreeSet;
use uuid::Uuid;

use shared::models::{Dispatch, DISPATCH_CATEGORY};
use shared::validation::{parse_exam_date, validate_lot_no};

use crate::error::{AppError, AppResult};
use crate::services::snapshot;

#[derive(Clone)]
pub struct DispatchService {
    db: PgPool,
}

/// One dispatch submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchInput {
    pub project_id: i32,
    pub lot_no: String,
    pub process_id: i32,
    pub box_count: Option<i32>,
    pub messenger_name: Option<String>,
    pub messenger_mobile: Option<String>,
    pub dispatch_mode: Option<String>,
    pub vehicle_number: Option<String>,
    pub driver_name: Option<String>,
    pub driver_mobile: Option<String>,
    #[serde(default)]
    pub status: bool,
    pub dispatch_date: Option<DateTime<Utc>>,
}

impl DispatchInput {
    fn validate(&self) -> AppResult<()> {
        if let Err(message) = validate_lot_no(&self.lot_no) {
            return Err(AppError::Validation {
                field: "lotNo".to_string(),
                message: message.to_string(),
                message_hi: "लॉट नंबर अमान्य है".to_string(),
            });
        }
        Ok(())
    }
}

/// One of today's dispatches with the quantities it carries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchDaySummary {
    pub id: i32,
    pub project_id: i32,
    pub lot_no: String,
    pub box_count: Option<i32>,
    pub dispatch_date: Option<DateTime<Utc>>,
    pub quantity_sheet_summary: LotSheetSummary,
}

/// Catch count, quantity and exam-date range of one dispatched lot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotSheetSummary {
    pub total_catches: usize,
    pub total_quantity: Decimal,
    pub exam_from: Option<NaiveDate>,
    pub exam_to: Option<NaiveDate>,
}

impl DispatchService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Every dispatch on record, newest first.
    pub async fn list(&self) -> AppResult<Vec<Dispatch>> {
        snapshot::load_all_dispatches(&self.db).await
    }

    /// One dispatch by id.
    pub async fn get(&self, id: i32) -> AppResult<Dispatch> {
        snapshot::load_dispatch(&self.db, id).await
    }

    /// All dispatches of a project.
    pub async fn list_for_project(&self, project_id: i32) -> AppResult<Vec<Dispatch>> {
        snapshot::load_project_dispatches(&self.db, project_id).await
    }

    /// Dispatches of one (project, lot).
    pub async fn list_for_lot(&self, project_id: i32, lot_no: &str) -> AppResult<Vec<Dispatch>> {
        snapshot::load_lot_dispatches(&self.db, project_id, lot_no).await
    }

    /// Record a dispatch. An existing row for the same (project_id, lot_no)
    /// is removed first, so the key keeps exactly one row.
    pub async fn upsert(&self, user_id: Uuid, input: DispatchInput) -> AppResult<Dispatch> {
        input.validate()?;

        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM dispatches WHERE project_id = $1 AND lot_no = $2")
            .bind(input.project_id)
            .bind(&input.lot_no)
            .execute(&mut *tx)
            .await?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO dispatches
                (project_id, lot_no, process_id, box_count, messenger_name, messenger_mobile,
                 dispatch_mode, vehicle_number, driver_name, driver_mobile, status, dispatch_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id
            "#,
        )
        .bind(input.project_id)
        .bind(&input.lot_no)
        .bind(input.process_id)
        .bind(input.box_count)
        .bind(&input.messenger_name)
        .bind(&input.messenger_mobile)
        .bind(&input.dispatch_mode)
        .bind(&input.vehicle_number)
        .bind(&input.driver_name)
        .bind(&input.driver_mobile)
        .bind(input.status)
        .bind(input.dispatch_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO event_logs (event, category, event_triggered_by) VALUES ($1, $2, $3)",
        )
        .bind("Created a new dispatch")
        .bind(DISPATCH_CATEGORY)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            project_id = input.project_id,
            lot_no = %input.lot_no,
            dispatch_id = id,
            "dispatch recorded"
        );

        snapshot::load_dispatch(&self.db, id).await
    }

    /// Full update of one dispatch by id.
    pub async fn update(&self, user_id: Uuid, id: i32, input: DispatchInput) -> AppResult<Dispatch> {
        input.validate()?;

        let updated = sqlx::query(
            r#"
            UPDATE dispatches
            SET project_id = $1, lot_no = $2, process_id = $3, box_count = $4,
                messenger_name = $5, messenger_mobile = $6, dispatch_mode = $7,
                vehicle_number = $8, driver_name = $9, driver_mobile = $10,
                status = $11, dispatch_date = $12, updated_at = NOW()
            WHERE id = $13
            "#,
        )
        .bind(input.project_id)
        .bind(&input.lot_no)
        .bind(input.process_id)
        .bind(input.box_count)
        .bind(&input.messenger_name)
        .bind(&input.messenger_mobile)
        .bind(&input.dispatch_mode)
        .bind(&input.vehicle_number)
        .bind(&input.driver_name)
        .bind(&input.driver_mobile)
        .bind(input.status)
        .bind(input.dispatch_date)
        .bind(id)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Dispatch".to_string()));
        }

        sqlx::query(
            "INSERT INTO event_logs (event, category, event_triggered_by) VALUES ($1, $2, $3)",
        )
        .bind(format!("Updated dispatch with ID {id}"))
        .bind(DISPATCH_CATEGORY)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        snapshot::load_dispatch(&self.db, id).await
    }

    /// Remove one dispatch by id.
    pub async fn delete(&self, user_id: Uuid, id: i32) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM dispatches WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Dispatch".to_string()));
        }

        sqlx::query(
            "INSERT INTO event_logs (event, category, event_triggered_by) VALUES ($1, $2, $3)",
        )
        .bind(format!("Deleted dispatch with ID {id}"))
        .bind(DISPATCH_CATEGORY)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Today's dispatches with the catch count, total quantity and exam-date
    /// range of each dispatched lot.
    pub async fn today_summary(&self) -> AppResult<Vec<DispatchDaySummary>> {
        let start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);

        let dispatches = snapshot::load_dispatches_between(&self.db, start, end).await?;
        if dispatches.is_empty() {
            return Ok(Vec::new());
        }

        let project_ids: Vec<i32> = dispatches
            .iter()
            .map(|d| d.project_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let lot_nos: Vec<String> = dispatches
            .iter()
            .map(|d| d.lot_no.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let sheets = snapshot::load_sheets_for_lots(&self.db, &project_ids, &lot_nos).await?;

        let summaries = dispatches
            .into_iter()
            .map(|dispatch| {
                let lot_sheets: Vec<_> = sheets
                    .iter()
                    .filter(|s| s.project_id == dispatch.project_id && s.lot_no == dispatch.lot_no)
                    .collect();

                let total_quantity = lot_sheets.iter().map(|s| s.quantity).sum();
                let exam_dates: Vec<NaiveDate> = lot_sheets
                    .iter()
                    .filter_map(|s| parse_exam_date(&s.exam_date))
                    .collect();

                DispatchDaySummary {
                    id: dispatch.id,
                    project_id: dispatch.project_id,
                    lot_no: dispatch.lot_no,
                    box_count: dispatch.box_count,
                    dispatch_date: dispatch.dispatch_date,
                    quantity_sheet_summary: LotSheetSummary {
                        total_catches: lot_sheets.len(),
                        total_quantity,
                        exam_from: exam_dates.iter().min().copied(),
                        exam_to: exam_dates.iter().max().copied(),
                    },
                }
            })
            .collect();

        Ok(summaries)
    }
}
