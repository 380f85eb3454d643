//! UpdateBoard command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::{ids_at, logged};
use crate::relation::PROJECT_BOARDS;
use crate::store::{from_document, Patch};
use crate::types::{BoardId, ProjectId};
use crate::validate::require_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Rename a board and/or move it to another project
#[operation(verb = "update", noun = "board", description = "Rename a board or move it to another project")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateBoard {
    /// The board ID
    pub id: BoardId,
    /// New name
    pub name: Option<String>,
    /// Destination project
    pub project: Option<ProjectId>,
    /// Index in the destination project's board list
    pub position: Option<usize>,
}

impl UpdateBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            project: None,
            position: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<ProjectId>, position: Option<usize>) -> Self {
        self.project = Some(project.into());
        self.position = position;
        self
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let mut patch = Patch::new();
        if let Some(name) = &self.name {
            patch = patch.set("name", require_text("name", name)?);
        }

        // The move checks the destination before anything is written.
        let mut board = match &self.project {
            Some(project) => from_document(
                ctx.move_child(&PROJECT_BOARDS, self.id.as_str(), project.as_str(), self.position)
                    .await?,
            )?,
            None => ctx.boards().get(&self.id).await?,
        };
        if !patch.is_empty() {
            board = ctx.boards().update(&self.id, &patch).await?;
        }
        Ok(serde_json::to_value(board)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for UpdateBoard {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        let mut ids = vec![self.id.to_string()];
        ids.extend(ids_at(result, &["project"]));
        ids
    }
}
