//! UpdateComment command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::processor::logged;
use crate::store::Patch;
use crate::types::CommentId;
use crate::validate::require_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Edit a comment's text
#[operation(verb = "update", noun = "comment", description = "Edit a comment's text")]
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateComment {
    /// The comment ID
    pub id: CommentId,
    /// Replacement text
    pub content: String,
}

impl UpdateComment {
    pub fn new(id: impl Into<CommentId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let patch = Patch::new().set("content", require_text("content", &self.content)?);
        let comment = ctx.comments().update(&self.id, &patch).await?;
        Ok(serde_json::to_value(comment)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for UpdateComment {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CardId, Comment, UserId};

    #[tokio::test]
    async fn test_update_comment() {
        let ctx = PlanContext::in_memory();
        let comment = ctx
            .comments()
            .insert(&Comment::new(CardId::new(), UserId::new(), "typo"))
            .await
            .unwrap();

        let result = UpdateComment::new(comment.id.clone(), "fixed")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["content"], "fixed");

        let err = UpdateComment::new(CommentId::new(), "x")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
