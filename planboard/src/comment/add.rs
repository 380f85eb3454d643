//! AddComment command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::{ids_at, logged};
use crate::relation::CARD_COMMENTS;
use crate::types::{CardId, Comment, UserId};
use crate::validate::{require_text, validate_comment_refs};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Comment on a card
#[operation(verb = "add", noun = "comment", description = "Add a comment to a card")]
#[derive(Debug, Deserialize, Serialize)]
pub struct AddComment {
    /// Card being commented on
    pub card: CardId,
    /// Author of the comment
    pub created_by: UserId,
    /// Comment text
    pub content: String,
}

impl AddComment {
    pub fn new(
        card: impl Into<CardId>,
        created_by: impl Into<UserId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            card: card.into(),
            created_by: created_by.into(),
            content: content.into(),
        }
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let content = require_text("content", &self.content)?;
        validate_comment_refs(ctx.store(), &self.card, &self.created_by).await?;

        let comment = Comment::new(self.card.clone(), self.created_by.clone(), content);
        let comment = ctx
            .create_child_and_link(&comment, &CARD_COMMENTS, self.card.as_str())
            .await?;
        Ok(serde_json::to_value(comment)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for AddComment {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        ids_at(result, &["id", "card"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Board, Card, User};

    async fn card_and_author(ctx: &PlanContext) -> (CardId, UserId) {
        let board = ctx.boards().insert(&Board::new("b")).await.unwrap();
        let card = ctx
            .create_child_and_link(
                &Card::new(board.id.clone(), "c"),
                &crate::relation::BOARD_CARDS,
                board.id.as_str(),
            )
            .await
            .unwrap();
        let user = ctx
            .users()
            .insert(&User::new("ada@example.com").with_password_hash("h"))
            .await
            .unwrap();
        (card.id, user.id)
    }

    #[tokio::test]
    async fn test_add_comment_links_card() {
        let ctx = PlanContext::in_memory();
        let (card, author) = card_and_author(&ctx).await;

        let result = AddComment::new(card.clone(), author.clone(), "  looks good ")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["content"], "looks good");
        assert_eq!(result["created_by"], author.as_str());

        let card = ctx.cards().get(&card).await.unwrap();
        assert_eq!(card.comments.len(), 1);
        assert_eq!(card.comments[0].as_str(), result["id"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_unknown_author_writes_nothing() {
        let ctx = PlanContext::in_memory();
        let (card, _) = card_and_author(&ctx).await;

        let err = AddComment::new(card.clone(), UserId::new(), "hi")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(ctx.cards().get(&card).await.unwrap().comments.is_empty());
    }

    #[tokio::test]
    async fn test_blank_content_rejected() {
        let ctx = PlanContext::in_memory();
        let (card, author) = card_and_author(&ctx).await;
        let err = AddComment::new(card, author, "   ")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidValue { .. }));
    }
}
