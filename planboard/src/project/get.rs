//! GetProject command

use crate::assemble::{Assembler, Depth};
use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::types::ProjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Get a project, expanded to the requested depth
#[operation(verb = "get", noun = "project", description = "Get a project with optional nested boards, cards and comments")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetProject {
    /// The project ID
    pub id: ProjectId,
    /// root, boards, cards, comments or authors
    #[serde(default)]
    pub depth: Depth,
}

impl GetProject {
    pub fn new(id: impl Into<ProjectId>) -> Self {
        Self {
            id: id.into(),
            depth: Depth::Root,
        }
    }

    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = depth;
        self
    }

    async fn fetch(&self, ctx: &PlanContext) -> Result<Value> {
        let view = Assembler::new(ctx.store())
            .project(&self.id, self.depth)
            .await?;
        Ok(serde_json::to_value(view)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for GetProject {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        ExecutionResult::unlogged(self.fetch(ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::AddBoard;
    use crate::project::AddProject;

    #[tokio::test]
    async fn test_get_project_with_boards() {
        let ctx = PlanContext::in_memory();
        let project = AddProject::new("Launch")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let id = project["id"].as_str().unwrap();
        AddBoard::new("Backlog")
            .in_project(id)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = GetProject::new(id).execute(&ctx).await;
        assert!(!result.should_log());
        let shallow = result.into_result().unwrap();
        assert_eq!(shallow["project"]["name"], "Launch");
        assert!(shallow.get("boards").is_none());

        let deep = GetProject::new(id)
            .with_depth(Depth::Boards)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(deep["boards"][0]["board"]["name"], "Backlog");
    }

    #[tokio::test]
    async fn test_get_missing_and_malformed() {
        let ctx = PlanContext::in_memory();
        let err = GetProject::new(ProjectId::new())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(err.is_not_found());

        let err = GetProject::new("not-an-id")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidIdentifier { .. }));
    }
}
