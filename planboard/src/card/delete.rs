//! DeleteCard command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::integrity::RootRef;
use crate::processor::{ids_at, logged};
use crate::types::CardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Delete a card and its comments
#[operation(verb = "delete", noun = "card", description = "Delete a card and its comments")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteCard {
    /// The card ID
    pub id: CardId,
}

impl DeleteCard {
    pub fn new(id: impl Into<CardId>) -> Self {
        Self { id: id.into() }
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let report = ctx
            .delete_root_and_cascade(&RootRef::Card(self.id.clone()))
            .await?;
        Ok(serde_json::to_value(report)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for DeleteCard {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        let mut ids = vec![self.id.to_string()];
        ids.extend(ids_at(result, &["deleted_root.board"]));
        ids
    }
}
