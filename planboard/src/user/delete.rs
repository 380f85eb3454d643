//! DeleteUser command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::integrity::RootRef;
use crate::processor::logged;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Delete a user with their comments and owned boards
#[operation(verb = "delete", noun = "user", description = "Delete a user, their comments and the boards they own")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteUser {
    /// The user ID
    pub id: UserId,
}

impl DeleteUser {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self { id: id.into() }
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let mut report = ctx
            .delete_root_and_cascade(&RootRef::User(self.id.clone()))
            .await?;
        report.deleted_root.remove("password_hash");
        Ok(serde_json::to_value(report)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for DeleteUser {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}
