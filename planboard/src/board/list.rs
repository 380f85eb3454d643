//! ListBoards command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::store::Filter;
use crate::types::{ProjectId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List boards, optionally filtered by project and/or owner
#[operation(verb = "list", noun = "board", description = "List boards with optional project and owner filters")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListBoards {
    /// Only boards in this project
    pub project: Option<ProjectId>,
    /// Only boards owned by this user
    pub owner: Option<UserId>,
}

impl ListBoards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_project(mut self, project: impl Into<ProjectId>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn owned_by(mut self, owner: impl Into<UserId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    async fn fetch(&self, ctx: &PlanContext) -> Result<Value> {
        let mut filter = Filter::all();
        if let Some(project) = &self.project {
            filter = filter.eq("project", project.as_str());
        }
        if let Some(owner) = &self.owner {
            filter = filter.eq("owner", owner.as_str());
        }
        let boards = ctx.boards().find(&filter).await?;
        Ok(serde_json::json!({
            "boards": boards,
            "count": boards.len()
        }))
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for ListBoards {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        ExecutionResult::unlogged(self.fetch(ctx).await)
    }
}
