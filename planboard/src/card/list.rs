//! ListCards command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::store::Filter;
use crate::types::{BoardId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List cards, optionally filtered by board and/or assignee
#[operation(verb = "list", noun = "card", description = "List cards with optional board and assignee filters")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListCards {
    /// Only cards on this board
    pub board: Option<BoardId>,
    /// Only cards assigned to this user
    pub assignee: Option<UserId>,
}

impl ListCards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_board(mut self, board: impl Into<BoardId>) -> Self {
        self.board = Some(board.into());
        self
    }

    pub fn assigned_to(mut self, user: impl Into<UserId>) -> Self {
        self.assignee = Some(user.into());
        self
    }

    async fn fetch(&self, ctx: &PlanContext) -> Result<Value> {
        let mut filter = Filter::all();
        if let Some(board) = &self.board {
            filter = filter.eq("board", board.as_str());
        }
        if let Some(assignee) = &self.assignee {
            filter = filter.eq("assignee", assignee.as_str());
        }
        let cards = ctx.cards().find(&filter).await?;
        Ok(serde_json::json!({
            "cards": cards,
            "count": cards.len()
        }))
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for ListCards {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        ExecutionResult::unlogged(self.fetch(ctx).await)
    }
}
