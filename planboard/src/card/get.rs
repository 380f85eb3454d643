//! GetCard command

use crate::assemble::{Assembler, Depth};
use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::types::CardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Get a card, optionally with its comments and their authors
#[operation(verb = "get", noun = "card", description = "Get a card with optional comments and authors")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetCard {
    /// The card ID
    pub id: CardId,
    /// root, comments or authors
    #[serde(default)]
    pub depth: Depth,
}

impl GetCard {
    pub fn new(id: impl Into<CardId>) -> Self {
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
        let view = Assembler::new(ctx.store()).card(&self.id, self.depth).await?;
        Ok(serde_json::to_value(view)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for GetCard {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        ExecutionResult::unlogged(self.fetch(ctx).await)
    }
}
