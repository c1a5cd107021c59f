//! Pipeline statistics service
//!
//! Loads a project snapshot and runs the process-train engine for one
//! lot, plus the per-process catch drill-down behind each train stage.

use sqlx::PgPool;

use crate::config::Config;
use crate::error::AppResult;
use crate::services::snapshot;
use shared::pipeline::PipelineConstants;
use shared::statistics::{
    catches_at_status, pipeline_statistics, CatchProcessStatus, StageStatistics, StatisticsInput,
};

/// Statistics service
#[derive(Clone)]
pub struct StatisticsService {
    db: PgPool,
    constants: PipelineConstants,
}

impl StatisticsService {
    /// Create a new StatisticsService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            constants: config.pipeline.clone(),
        }
    }

    /// Process-train statistics for one (project, lot)
    pub async fn process_train(
        &self,
        project_id: i32,
        lot_no: &str,
    ) -> AppResult<Vec<StageStatistics>> {
        let project = snapshot::load_project(&self.db, project_id).await?;
        let pipeline = snapshot::load_pipeline(&self.db, project_id).await?;
        let sheets = snapshot::load_project_sheets(&self.db, project_id).await?;
        let transactions = snapshot::load_project_transactions(&self.db, project_id).await?;

        let input = StatisticsInput {
            pipeline: &pipeline,
            project: &project,
            sheets: &sheets,
            transactions: &transactions,
            constants: &self.constants,
        };

        Ok(pipeline_statistics(&input, lot_no))
    }

    /// Catches of a lot sitting at one status under one process
    pub async fn catches_at_status(
        &self,
        project_id: i32,
        lot_no: &str,
        process_id: i32,
        status: i32,
    ) -> AppResult<Vec<CatchProcessStatus>> {
        snapshot::load_project(&self.db, project_id).await?;
        let sheets = snapshot::load_project_sheets(&self.db, project_id).await?;
        let transactions = snapshot::load_project_transactions(&self.db, project_id).await?;

        Ok(catches_at_status(
            &sheets,
            &transactions,
            lot_no,
            process_id,
            status,
        ))
    }
}
