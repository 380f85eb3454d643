//! UpdateProject command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::logged;
use crate::store::Patch;
use crate::types::ProjectId;
use crate::validate::require_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Rename a project
#[operation(verb = "update", noun = "project", description = "Update a project's name")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateProject {
    /// The project ID
    pub id: ProjectId,
    /// New name
    pub name: Option<String>,
}

impl UpdateProject {
    pub fn new(id: impl Into<ProjectId>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let mut patch = Patch::new();
        if let Some(name) = &self.name {
            patch = patch.set("name", require_text("name", name)?);
        }
        let project = if patch.is_empty() {
            ctx.projects().get(&self.id).await?
        } else {
            ctx.projects().update(&self.id, &patch).await?
        };
        Ok(serde_json::to_value(project)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for UpdateProject {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}
