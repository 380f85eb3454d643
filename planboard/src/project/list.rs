//! ListProjects command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::store::Filter;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List projects, optionally only those a user belongs to
#[operation(verb = "list", noun = "project", description = "List projects with an optional member filter")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListProjects {
    /// Only projects with this member
    pub user: Option<UserId>,
}

impl ListProjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(user: impl Into<UserId>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }

    async fn fetch(&self, ctx: &PlanContext) -> Result<Value> {
        let filter = match &self.user {
            Some(user) => Filter::all().contains("users", user.as_str()),
            None => Filter::all(),
        };
        let projects = ctx.projects().find(&filter).await?;
        Ok(serde_json::json!({
            "projects": projects,
            "count": projects.len()
        }))
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for ListProjects {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        ExecutionResult::unlogged(self.fetch(ctx).await)
    }
}
