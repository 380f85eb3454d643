//! AddBoard command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::{ids_at, logged};
use crate::relation::PROJECT_BOARDS;
use crate::types::{Board, ProjectId, UserId};
use crate::validate::require_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Create a board, linked into its project's board list when it has one
#[operation(verb = "add", noun = "board", description = "Create a board in a project or for a user")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddBoard {
    /// The board name
    pub name: String,
    /// Project the board belongs to
    pub project: Option<ProjectId>,
    /// User who owns the board
    pub owner: Option<UserId>,
}

impl AddBoard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project: None,
            owner: None,
        }
    }

    pub fn in_project(mut self, project: impl Into<ProjectId>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn owned_by(mut self, owner: impl Into<UserId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let mut board = Board::new(require_text("name", &self.name)?);
        if let Some(owner) = &self.owner {
            if !ctx.users().exists(owner).await? {
                return Err(PlanError::not_found("user", owner.as_str()));
            }
            board = board.owned_by(owner.clone());
        }

        let board = match &self.project {
            Some(project) => {
                ctx.create_child_and_link(
                    &board.in_project(project.clone()),
                    &PROJECT_BOARDS,
                    project.as_str(),
                )
                .await?
            }
            None => ctx.boards().insert(&board).await?,
        };
        Ok(serde_json::to_value(board)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for AddBoard {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        ids_at(result, &["id", "project"])
    }
}
