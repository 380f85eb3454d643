//! AddProject command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::logged;
use crate::types::{Project, UserId};
use crate::validate::require_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Create a project, optionally with initial members
#[operation(verb = "add", noun = "project", description = "Create a new project")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddProject {
    /// The project name
    pub name: String,
    /// Users to add as members
    #[serde(default, alias = "members")]
    pub users: Vec<UserId>,
}

impl AddProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            users: Vec::new(),
        }
    }

    pub fn with_member(mut self, user: impl Into<UserId>) -> Self {
        self.users.push(user.into());
        self
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let mut project = Project::new(require_text("name", &self.name)?);
        for user in &self.users {
            if !ctx.users().exists(user).await? {
                return Err(PlanError::not_found("user", user.as_str()));
            }
            project = project.with_member(user.clone());
        }
        let project = ctx.projects().insert(&project).await?;
        Ok(serde_json::to_value(project)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for AddProject {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        crate::processor::ids_at(result, &["id"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;

    #[tokio::test]
    async fn test_add_project() {
        let ctx = PlanContext::in_memory();
        let result = AddProject::new("  Launch ")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["name"], "Launch");
        assert_eq!(result["boards"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_add_project_with_members() {
        let ctx = PlanContext::in_memory();
        let ada = ctx
            .users()
            .insert(&User::new("ada@example.com").with_password_hash("h"))
            .await
            .unwrap();

        let result = AddProject::new("Launch")
            .with_member(ada.id.clone())
            .with_member(ada.id.clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["users"], serde_json::json!([ada.id.as_str()]));
    }

    #[tokio::test]
    async fn test_unknown_member_rejected() {
        let ctx = PlanContext::in_memory();
        let err = AddProject::new("Launch")
            .with_member(UserId::new())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let ctx = PlanContext::in_memory();
        let result = AddProject::new(" ").execute(&ctx).await;
        assert!(result.should_log());
        assert!(matches!(
            result.into_result(),
            Err(PlanError::InvalidValue { .. })
        ));
    }
}
