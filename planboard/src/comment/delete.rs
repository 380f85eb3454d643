//! DeleteComment command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::integrity::RootRef;
use crate::processor::{ids_at, logged};
use crate::types::CommentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Delete a comment and detach it from its card
#[operation(verb = "delete", noun = "comment", description = "Delete a comment")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteComment {
    /// The comment ID
    pub id: CommentId,
}

impl DeleteComment {
    pub fn new(id: impl Into<CommentId>) -> Self {
        Self { id: id.into() }
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let report = ctx
            .delete_root_and_cascade(&RootRef::Comment(self.id.clone()))
            .await?;
        Ok(serde_json::to_value(report)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for DeleteComment {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        let mut ids = vec![self.id.to_string()];
        ids.extend(ids_at(result, &["deleted_root.card"]));
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::AddCard;
    use crate::comment::AddComment;
    use crate::types::{Board, CardId, User};

    #[tokio::test]
    async fn test_delete_comment_detaches() {
        let ctx = PlanContext::in_memory();
        let board = ctx.boards().insert(&Board::new("b")).await.unwrap();
        let ada = ctx
            .users()
            .insert(&User::new("ada@example.com").with_password_hash("h"))
            .await
            .unwrap();
        let card = AddCard::new(board.id.clone(), "c")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let card_id = CardId::from_string(card["id"].as_str().unwrap());
        let comment = AddComment::new(card_id.clone(), ada.id.clone(), "bye")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let report = DeleteComment::new(comment["id"].as_str().unwrap())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(report["counts"]["comments"], 1);
        assert!(ctx.cards().get(&card_id).await.unwrap().comments.is_empty());

        let err = DeleteComment::new(comment["id"].as_str().unwrap())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
