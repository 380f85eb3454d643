//! GetComment command

use crate::assemble::{Assembler, Depth};
use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::types::CommentId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Get a comment; depth `authors` includes the author's public fields
#[operation(verb = "get", noun = "comment", description = "Get a comment, optionally with its author")]
#[derive(Debug, Deserialize, Serialize)]
pub struct GetComment {
    /// The comment ID
    pub id: CommentId,
    #[serde(default)]
    pub depth: Depth,
}

impl GetComment {
    pub fn new(id: impl Into<CommentId>) -> Self {
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
            .comment(&self.id, self.depth)
            .await?;
        Ok(serde_json::to_value(view)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for GetComment {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        ExecutionResult::unlogged(self.fetch(ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::AddCard;
    use crate::comment::AddComment;
    use crate::types::{Board, User};

    #[tokio::test]
    async fn test_get_comment_with_author() {
        let ctx = PlanContext::in_memory();
        let board = ctx.boards().insert(&Board::new("b")).await.unwrap();
        let ada = ctx
            .users()
            .insert(
                &User::new("ada@example.com")
                    .with_name("Ada")
                    .with_password_hash("h"),
            )
            .await
            .unwrap();
        let card = AddCard::new(board.id.clone(), "c")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let comment = AddComment::new(card["id"].as_str().unwrap(), ada.id.clone(), "hi")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let id = comment["id"].as_str().unwrap();

        let plain = GetComment::new(id).execute(&ctx).await.into_result().unwrap();
        assert_eq!(plain["comment"]["content"], "hi");
        assert!(plain.get("author").is_none());

        let full = GetComment::new(id)
            .with_depth(Depth::Authors)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(full["author"]["name"], "Ada");
        assert!(full["author"].get("password_hash").is_none());
    }
}
