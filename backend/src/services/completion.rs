//! Completion aggregation service
//!
//! Fetches a project snapshot and runs the shared completion engines
//! over it. Nothing here mutates state; every call recomputes from the
//! current rows.

use serde::Serialize;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::project::ProjectService;
use crate::services::snapshot;
use rust_decimal::Decimal;
use shared::completion::{
    combined_percentages, process_percentages, project_completion, CombinedPercentages,
    CompletionInputs, ProjectProcessPercentages,
};
use shared::pipeline::PipelineConstants;
use shared::types::CatchScope;

/// Completion service
#[derive(Clone)]
pub struct CompletionService {
    db: PgPool,
    constants: PipelineConstants,
}

/// One project's rollup in the dashboard listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCompletionSummary {
    pub project_id: i32,
    pub project_name: String,
    pub completion_percentage: Decimal,
    pub project_total_quantity: Decimal,
}

/// Full per-lot rollup for one project
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCompletionView {
    pub project_id: i32,
    pub project_name: String,
    pub completion_percentage: Decimal,
    pub total_quantity: Decimal,
    pub lot_percentages: std::collections::BTreeMap<String, Decimal>,
    pub lot_quantities: std::collections::BTreeMap<String, Decimal>,
}

impl CompletionService {
    /// Create a new CompletionService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            constants: config.pipeline.clone(),
        }
    }

    /// Weighted completion rollup for one project, stopped catches
    /// included
    pub async fn project_completion(&self, project_id: i32) -> AppResult<ProjectCompletionView> {
        let project = snapshot::load_project(&self.db, project_id).await?;
        let pipeline = snapshot::load_pipeline(&self.db, project_id).await?;
        let sheets = snapshot::load_project_sheets(&self.db, project_id).await?;
        let transactions = snapshot::load_project_transactions(&self.db, project_id).await?;
        let dispatches = snapshot::load_project_dispatches(&self.db, project_id).await?;

        let inputs = CompletionInputs {
            pipeline: &pipeline,
            sheets: &sheets,
            transactions: &transactions,
            dispatches: &dispatches,
            constants: &self.constants,
        };
        let completion = project_completion(&inputs, CatchScope::IncludeStopped);

        Ok(ProjectCompletionView {
            project_id,
            project_name: project.name,
            completion_percentage: completion.completion_percentage,
            total_quantity: completion.total_quantity,
            lot_percentages: completion.lot_percentages,
            lot_quantities: completion.lot_quantities,
        })
    }

    /// Completion summaries across the user's projects.
    ///
    /// A starred project jumps to the front of the first page without
    /// counting against the page size, so the pinned card never pushes
    /// a project off the dashboard.
    pub async fn all_project_completions(
        &self,
        user: &AuthUser,
        page: u32,
        page_size: u32,
        starred_project_id: Option<i32>,
    ) -> AppResult<Vec<ProjectCompletionSummary>> {
        let projects = ProjectService::new(self.db.clone())
            .projects_for_user(user)
            .await?;
        let mut all_ids: Vec<i32> = projects.iter().map(|p| p.project_id).collect();

        let mut page_ids: Vec<i32> = Vec::new();
        if let Some(starred) = starred_project_id {
            if all_ids.contains(&starred) {
                if page <= 1 {
                    page_ids.push(starred);
                }
                all_ids.retain(|&id| id != starred);
            }
        }

        let offset = (page.saturating_sub(1) as usize) * page_size as usize;
        page_ids.extend(all_ids.into_iter().skip(offset).take(page_size as usize));

        let mut summaries = Vec::with_capacity(page_ids.len());
        for project_id in page_ids {
            let view = self.project_completion(project_id).await?;
            summaries.push(ProjectCompletionSummary {
                project_id: view.project_id,
                project_name: view.project_name,
                completion_percentage: view.completion_percentage,
                project_total_quantity: view.total_quantity,
            });
        }

        Ok(summaries)
    }

    /// Combined per-lot percentages, stopped catches excluded
    pub async fn combined_percentages(&self, project_id: i32) -> AppResult<CombinedPercentages> {
        // Ensure the project exists before computing over empty rows
        snapshot::load_project(&self.db, project_id).await?;
        let pipeline = snapshot::load_pipeline(&self.db, project_id).await?;
        let sheets = snapshot::load_project_sheets(&self.db, project_id).await?;
        let transactions = snapshot::load_project_transactions(&self.db, project_id).await?;
        let dispatches = snapshot::load_project_dispatches(&self.db, project_id).await?;

        let inputs = CompletionInputs {
            pipeline: &pipeline,
            sheets: &sheets,
            transactions: &transactions,
            dispatches: &dispatches,
            constants: &self.constants,
        };

        Ok(combined_percentages(&inputs))
    }

    /// Per-process progress across a project's lots
    pub async fn process_percentages(&self, project_id: i32) -> AppResult<ProjectProcessPercentages> {
        snapshot::load_project(&self.db, project_id).await?;
        let pipeline = snapshot::load_pipeline(&self.db, project_id).await?;
        let sheets = snapshot::load_project_sheets(&self.db, project_id).await?;
        let transactions = snapshot::load_project_transactions(&self.db, project_id).await?;
        let dispatches = snapshot::load_project_dispatches(&self.db, project_id).await?;

        let inputs = CompletionInputs {
            pipeline: &pipeline,
            sheets: &sheets,
            transactions: &transactions,
            dispatches: &dispatches,
            constants: &self.constants,
        };

        Ok(process_percentages(&inputs))
    }
}
