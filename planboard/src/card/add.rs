//! AddCard command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::{ids_at, logged};
use crate::relation::BOARD_CARDS;
use crate::types::{BoardId, Card, UserId};
use crate::validate::require_text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Create a card at the end of a board
#[operation(verb = "add", noun = "card", description = "Create a card at the end of a board")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddCard {
    /// Board the card belongs to
    pub board: BoardId,
    /// The card title
    pub title: String,
    /// Detailed description
    pub description: Option<String>,
    /// Picture URL
    pub picture: Option<String>,
    /// Due date (RFC 3339)
    pub due_on: Option<DateTime<Utc>>,
    /// User the card is assigned to
    pub assignee: Option<UserId>,
}

impl AddCard {
    pub fn new(board: impl Into<BoardId>, title: impl Into<String>) -> Self {
        Self {
            board: board.into(),
            title: title.into(),
            description: None,
            picture: None,
            due_on: None,
            assignee: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_on(mut self, due_on: DateTime<Utc>) -> Self {
        self.due_on = Some(due_on);
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<UserId>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let mut card = Card::new(self.board.clone(), require_text("title", &self.title)?);
        if let Some(description) = &self.description {
            card = card.with_description(description.clone());
        }
        card.picture = self.picture.clone();
        card.due_on = self.due_on;
        if let Some(assignee) = &self.assignee {
            if !ctx.users().exists(assignee).await? {
                return Err(PlanError::not_found("user", assignee.as_str()));
            }
            card = card.with_assignee(assignee.clone());
        }

        let card = ctx
            .create_child_and_link(&card, &BOARD_CARDS, self.board.as_str())
            .await?;
        Ok(serde_json::to_value(card)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for AddCard {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        ids_at(result, &["id", "board"])
    }
}
