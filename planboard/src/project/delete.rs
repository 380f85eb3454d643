//! DeleteProject command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::integrity::RootRef;
use crate::processor::logged;
use crate::types::ProjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Delete a project together with its boards, cards and comments
#[operation(verb = "delete", noun = "project", description = "Delete a project and everything on its boards")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteProject {
    /// The project ID
    pub id: ProjectId,
}

impl DeleteProject {
    pub fn new(id: impl Into<ProjectId>) -> Self {
        Self { id: id.into() }
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let report = ctx
            .delete_root_and_cascade(&RootRef::Project(self.id.clone()))
            .await?;
        Ok(serde_json::to_value(report)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for DeleteProject {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::AddBoard;
    use crate::card::AddCard;
    use crate::project::AddProject;

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let ctx = PlanContext::in_memory();
        let project = AddProject::new("Launch")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let project_id = project["id"].as_str().unwrap().to_string();
        let board = AddBoard::new("Backlog")
            .in_project(project_id.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        AddCard::new(board["id"].as_str().unwrap(), "Write docs")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let report = DeleteProject::new(project_id.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(report["deleted_root"]["id"], project_id.as_str());
        assert_eq!(report["counts"]["boards"], 1);
        assert_eq!(report["counts"]["cards"], 1);
        assert_eq!(report["counts"]["comments"], 0);
    }

    #[tokio::test]
    async fn test_delete_missing_project_is_logged_failure() {
        let ctx = PlanContext::in_memory();
        let result = DeleteProject::new(ProjectId::new()).execute(&ctx).await;
        assert!(result.should_log());
        let (value, entry) = result.split();
        assert!(value.unwrap_err().is_not_found());
        assert!(entry.unwrap().is_error());
    }
}
