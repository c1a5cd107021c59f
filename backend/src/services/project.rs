//! Project listing and cascade lookups
//!
//! The selection cascade on every report screen: groups, then projects
//! within a group, then lot numbers, then catch numbers. Project
//! visibility is role gated.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::BTreeSet;
use uuid::Uuid;

use shared::models::{Group, ProjectProcess};

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::snapshot;

/// Project service for listings and cascades
#[derive(Clone)]
pub struct ProjectService {
    db: PgPool,
}

/// Project entry in listing responses
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ProjectSummary {
    pub project_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub type_id: i32,
    pub group_id: i32,
    pub no_of_series: Option<i32>,
    pub series_name: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ProjectProcessRow {
    id: i32,
    project_id: i32,
    process_id: i32,
    weightage: Decimal,
    sequence: i32,
    user_ids: Vec<Uuid>,
}

impl From<ProjectProcessRow> for ProjectProcess {
    fn from(row: ProjectProcessRow) -> Self {
        ProjectProcess {
            id: row.id,
            project_id: row.project_id,
            process_id: row.process_id,
            weightage: row.weightage,
            sequence: row.sequence,
            user_ids: row.user_ids,
        }
    }
}

const PROJECT_SUMMARY_COLUMNS: &str =
    "p.project_id, p.name, p.description, p.type_id, p.group_id, p.no_of_series, p.series_name";

impl ProjectService {
    /// Create a new ProjectService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List projects visible to the user.
    ///
    /// Elevated roles see every active project. Operators only see
    /// projects whose pipeline assigns them, and only while the project
    /// still has active sheets.
    pub async fn projects_for_user(&self, user: &AuthUser) -> AppResult<Vec<ProjectSummary>> {
        self.projects_for_user_in_group(user, None).await
    }

    /// Same role gating, restricted to one group
    pub async fn projects_for_user_in_group(
        &self,
        user: &AuthUser,
        group_id: Option<i32>,
    ) -> AppResult<Vec<ProjectSummary>> {
        let projects = if user.has_full_project_access() {
            let query = format!(
                "SELECT {PROJECT_SUMMARY_COLUMNS} FROM projects p \
                 WHERE p.status = true AND ($1::INTEGER IS NULL OR p.group_id = $1) \
                 ORDER BY p.project_id DESC"
            );
            sqlx::query_as::<_, ProjectSummary>(&query)
                .bind(group_id)
                .fetch_all(&self.db)
                .await?
        } else {
            let query = format!(
                r#"
                SELECT DISTINCT {PROJECT_SUMMARY_COLUMNS}
                FROM projects p
                JOIN project_processes pp ON pp.project_id = p.project_id
                WHERE p.status = true
                  AND ($1::INTEGER IS NULL OR p.group_id = $1)
                  AND $2 = ANY(pp.user_ids)
                  AND EXISTS (
                      SELECT 1 FROM quantity_sheets q
                      WHERE q.project_id = p.project_id AND q.status = 1
                  )
                ORDER BY p.project_id DESC
                "#
            );
            sqlx::query_as::<_, ProjectSummary>(&query)
                .bind(group_id)
                .bind(user.user_id)
                .fetch_all(&self.db)
                .await?
        };

        Ok(projects)
    }

    /// List active groups for the cascade root
    pub async fn list_groups(&self) -> AppResult<Vec<Group>> {
        let rows = sqlx::query_as::<_, (i32, String, bool)>(
            "SELECT id, name, status FROM groups WHERE status = true ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, status)| Group { id, name, status })
            .collect())
    }

    /// Distinct lot numbers of a project's active sheets
    pub async fn lot_numbers(&self, project_id: i32) -> AppResult<Vec<String>> {
        let lots = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT lot_no FROM quantity_sheets \
             WHERE project_id = $1 AND status = 1 AND lot_no <> '' \
             ORDER BY lot_no",
        )
        .bind(project_id)
        .fetch_all(&self.db)
        .await?;

        Ok(lots)
    }

    /// Distinct catch numbers within a lot
    pub async fn catch_numbers(&self, project_id: i32, lot_no: &str) -> AppResult<Vec<String>> {
        let catches = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT catch_no FROM quantity_sheets \
             WHERE project_id = $1 AND lot_no = $2 AND status = 1 \
             ORDER BY catch_no",
        )
        .bind(project_id)
        .bind(lot_no)
        .fetch_all(&self.db)
        .await?;

        Ok(catches)
    }

    /// Pipeline membership rows of a project, ordered by sequence
    async fn pipeline_memberships(&self, project_id: i32) -> AppResult<Vec<ProjectProcess>> {
        let rows = sqlx::query_as::<_, ProjectProcessRow>(
            "SELECT id, project_id, process_id, weightage, sequence, user_ids \
             FROM project_processes WHERE project_id = $1 ORDER BY sequence",
        )
        .bind(project_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Operators assigned to any stage of a project's pipeline, resolved
    /// to names
    pub async fn assigned_operators(&self, project_id: i32) -> AppResult<Vec<(Uuid, String)>> {
        let memberships = self.pipeline_memberships(project_id).await?;
        let operator_ids: Vec<Uuid> = memberships
            .iter()
            .flat_map(|pp| pp.user_ids.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut operators = snapshot::load_user_names(&self.db, &operator_ids).await?;
        operators.sort_by(|a, b| a.1.cmp(&b.1));

        Ok(operators)
    }
}
