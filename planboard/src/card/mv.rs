//! MoveCard command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::logged;
use crate::relation::BOARD_CARDS;
use crate::store::{from_document, Document};
use crate::types::{BoardId, Card, CardId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Move a card to a board, or to a new position on its own board
#[operation(verb = "move", noun = "card", description = "Move a card to another board or position")]
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveCard {
    /// The card ID
    pub id: CardId,
    /// Destination board
    pub board: BoardId,
    /// Index in the destination board's card list (end when omitted)
    pub position: Option<usize>,
}

impl MoveCard {
    pub fn new(id: impl Into<CardId>, board: impl Into<BoardId>) -> Self {
        Self {
            id: id.into(),
            board: board.into(),
            position: None,
        }
    }

    pub fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let card = ctx.cards().get(&self.id).await?;
        let card = relocate(ctx, &card, &self.board, self.position).await?;
        Ok(serde_json::to_value(card)?)
    }
}

/// Put `card` on `board` at `position`.
///
/// A different board is a reparent. The same board with a position is a
/// reorder of its list. The same board without a position changes nothing.
pub(super) async fn relocate(
    ctx: &PlanContext,
    card: &Card,
    board: &BoardId,
    position: Option<usize>,
) -> Result<Card> {
    if &card.board != board {
        let moved: Document = ctx
            .move_child(&BOARD_CARDS, card.id.as_str(), board.as_str(), position)
            .await?;
        return from_document(moved);
    }
    if let Some(position) = position {
        ctx.reorder_child(&BOARD_CARDS, card.id.as_str(), board.as_str(), position)
            .await?;
    }
    Ok(card.clone())
}

#[async_trait]
impl Execute<PlanContext, PlanError> for MoveCard {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string(), self.board.to_string()]
    }
}
