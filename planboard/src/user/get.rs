//! GetUser command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::types::{UserId, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Get a user's public profile
#[operation(verb = "get", noun = "user", description = "Get a user's profile")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetUser {
    /// The user ID
    pub id: UserId,
}

impl GetUser {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self { id: id.into() }
    }

    async fn fetch(&self, ctx: &PlanContext) -> Result<Value> {
        let user = ctx.users().get(&self.id).await?;
        Ok(serde_json::to_value(UserProfile::from(&user))?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for GetUser {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        ExecutionResult::unlogged(self.fetch(ctx).await)
    }
}
