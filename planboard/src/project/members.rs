//! JoinProject and LeaveProject commands
//!
//! Membership is a list on the project with no foreign key on the user, so
//! both sides are maintained from the project.

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::logged;
use crate::relation::PROJECT_MEMBERS;
use crate::types::{ProjectId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Add a user to a project's members
#[operation(verb = "join", noun = "project", description = "Add a user to a project's members")]
#[derive(Debug, Deserialize, Serialize)]
pub struct JoinProject {
    /// The project ID
    pub id: ProjectId,
    /// The user joining
    pub user: UserId,
}

impl JoinProject {
    pub fn new(id: impl Into<ProjectId>, user: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            user: user.into(),
        }
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        if !ctx.users().exists(&self.user).await? {
            return Err(PlanError::not_found("user", self.user.as_str()));
        }
        let project = ctx
            .backrefs()
            .attach_child(&PROJECT_MEMBERS, self.id.as_str(), self.user.as_str())
            .await?;
        Ok(Value::Object(project))
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for JoinProject {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string(), self.user.to_string()]
    }
}

/// Remove a user from a project's members
#[operation(verb = "leave", noun = "project", description = "Remove a user from a project's members")]
#[derive(Debug, Deserialize, Serialize)]
pub struct LeaveProject {
    /// The project ID
    pub id: ProjectId,
    /// The user leaving
    pub user: UserId,
}

impl LeaveProject {
    pub fn new(id: impl Into<ProjectId>, user: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            user: user.into(),
        }
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        ctx.projects().get(&self.id).await?;
        ctx.backrefs()
            .detach_child(&PROJECT_MEMBERS, self.id.as_str(), self.user.as_str())
            .await?;
        let project = ctx.projects().get(&self.id).await?;
        Ok(serde_json::to_value(project)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for LeaveProject {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string(), self.user.to_string()]
    }
}
