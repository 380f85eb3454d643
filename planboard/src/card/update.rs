//! UpdateCard command

use super::mv::relocate;
use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::{ids_at, logged};
use crate::store::Patch;
use crate::types::{BoardId, CardId, UserId};
use crate::validate::require_text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Update card fields; a new board moves the card
#[operation(verb = "update", noun = "card", description = "Update a card's fields or move it to another board")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateCard {
    /// The card ID
    pub id: CardId,
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New picture URL
    pub picture: Option<String>,
    /// New due date (RFC 3339)
    pub due_on: Option<DateTime<Utc>>,
    /// New assignee
    pub assignee: Option<UserId>,
    /// Remove the current assignee
    #[serde(default)]
    pub clear_assignee: bool,
    /// Move to this board
    pub board: Option<BoardId>,
    /// Index in the board's card list
    pub position: Option<usize>,
}

impl UpdateCard {
    pub fn new(id: impl Into<CardId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<UserId>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn clear_assignee(mut self) -> Self {
        self.clear_assignee = true;
        self
    }

    pub fn with_board(mut self, board: impl Into<BoardId>, position: Option<usize>) -> Self {
        self.board = Some(board.into());
        self.position = position;
        self
    }

    async fn patch(&self, ctx: &PlanContext) -> Result<Patch> {
        let mut patch = Patch::new();
        if let Some(title) = &self.title {
            patch = patch.set("title", require_text("title", title)?);
        }
        if let Some(description) = &self.description {
            patch = patch.set("description", description.as_str());
        }
        if let Some(picture) = &self.picture {
            patch = patch.set("picture", picture.as_str());
        }
        if let Some(due_on) = &self.due_on {
            patch = patch.set("due_on", serde_json::to_value(due_on)?);
        }
        match (&self.assignee, self.clear_assignee) {
            (Some(_), true) => {
                return Err(PlanError::invalid_value(
                    "assignee",
                    "cannot set and clear the assignee together",
                ))
            }
            (Some(assignee), false) => {
                if !ctx.users().exists(assignee).await? {
                    return Err(PlanError::not_found("user", assignee.as_str()));
                }
                patch = patch.set("assignee", assignee.as_str());
            }
            (None, true) => patch = patch.set("assignee", Value::Null),
            (None, false) => {}
        }
        Ok(patch)
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let patch = self.patch(ctx).await?;
        let mut card = ctx.cards().get(&self.id).await?;

        // The move checks the destination before anything is written.
        if let Some(board) = &self.board {
            card = relocate(ctx, &card, board, self.position).await?;
        }
        if !patch.is_empty() {
            card = ctx.cards().update(&self.id, &patch).await?;
        }
        Ok(serde_json::to_value(card)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for UpdateCard {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        let mut ids = vec![self.id.to_string()];
        if self.board.is_some() {
            ids.extend(ids_at(result, &["board"]));
        }
        ids
    }
}
