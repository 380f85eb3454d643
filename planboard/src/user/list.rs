//! ListUsers command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::store::Filter;
use crate::types::UserProfile;
use crate::validate::normalize_email;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List user profiles, optionally looking one up by email
#[operation(verb = "list", noun = "user", description = "List users with an optional email filter")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListUsers {
    /// Only the user with this email
    pub email: Option<String>,
}

impl ListUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }

    async fn fetch(&self, ctx: &PlanContext) -> Result<Value> {
        let filter = match &self.email {
            Some(email) => Filter::all().eq("email", normalize_email(email)?),
            None => Filter::all(),
        };
        let users: Vec<UserProfile> = ctx
            .users()
            .find(&filter)
            .await?
            .iter()
            .map(UserProfile::from)
            .collect();
        Ok(serde_json::json!({
            "users": users,
            "count": users.len()
        }))
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for ListUsers {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        ExecutionResult::unlogged(self.fetch(ctx).await)
    }
}
