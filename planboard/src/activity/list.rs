//! ListActivity command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Read the activity log, newest first
#[operation(verb = "list", noun = "activity", description = "List recent activity, globally or for one entity")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListActivity {
    /// Maximum number of entries
    pub limit: Option<usize>,
    /// Only activity that touched this entity id
    pub entity: Option<String>,
}

impl ListActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn for_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    async fn fetch(&self, ctx: &PlanContext) -> Result<Value> {
        let entries = match &self.entity {
            Some(entity) => ctx.read_entity_log(entity, self.limit).await?,
            None => ctx.read_activity(self.limit).await?,
        };
        Ok(serde_json::json!({
            "entries": entries,
            "count": entries.len()
        }))
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for ListActivity {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        ExecutionResult::unlogged(self.fetch(ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::PlanOperationProcessor;
    use crate::project::{AddProject, GetProject};
    use planboard_operations::OperationProcessor;

    #[tokio::test]
    async fn test_list_activity() {
        let ctx = PlanContext::in_memory();
        let processor = PlanOperationProcessor::with_actor("ada");

        let project = processor
            .process(&AddProject::new("Launch"), &ctx)
            .await
            .unwrap();
        let id = project["id"].as_str().unwrap();
        processor
            .process(&GetProject::new(id), &ctx)
            .await
            .unwrap();
        processor
            .process(&AddProject::new("Second"), &ctx)
            .await
            .unwrap();

        let all = ListActivity::new().execute(&ctx).await.into_result().unwrap();
        assert_eq!(all["count"], 2);
        assert_eq!(all["entries"][0]["op"], "add project");
        assert_eq!(all["entries"][0]["actor"], "ada");

        let limited = ListActivity::new()
            .with_limit(1)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(limited["count"], 1);

        let for_project = ListActivity::new()
            .for_entity(id)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(for_project["count"], 1);
        assert_eq!(for_project["entries"][0]["output"]["name"], "Launch");
    }
}
