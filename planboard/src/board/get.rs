//! GetBoard command

use crate::assemble::{Assembler, Depth};
use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::types::BoardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Get a board, optionally with its cards, comments and comment authors
#[operation(verb = "get", noun = "board", description = "Get a board with optional nested cards and comments")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetBoard {
    /// The board ID
    pub id: BoardId,
    /// root, cards, comments or authors
    #[serde(default)]
    pub depth: Depth,
}

impl GetBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
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
            .board(&self.id, self.depth)
            .await?;
        Ok(serde_json::to_value(view)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for GetBoard {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        ExecutionResult::unlogged(self.fetch(ctx).await)
    }
}
