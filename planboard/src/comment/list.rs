//! ListComments command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::store::Filter;
use crate::types::{CardId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List comments by card and/or author
#[operation(verb = "list", noun = "comment", description = "List comments with optional card and author filters")]
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListComments {
    /// Only comments on this card
    pub card: Option<CardId>,
    /// Only comments by this user
    pub created_by: Option<UserId>,
}

impl ListComments {
    pub fn on_card(card: impl Into<CardId>) -> Self {
        Self {
            card: Some(card.into()),
            created_by: None,
        }
    }

    pub fn by_author(created_by: impl Into<UserId>) -> Self {
        Self {
            card: None,
            created_by: Some(created_by.into()),
        }
    }

    async fn fetch(&self, ctx: &PlanContext) -> Result<Value> {
        let mut filter = Filter::all();
        if let Some(card) = &self.card {
            filter = filter.eq("card", card.as_str());
        }
        if let Some(created_by) = &self.created_by {
            filter = filter.eq("created_by", created_by.as_str());
        }
        let comments = ctx.comments().find(&filter).await?;
        Ok(serde_json::json!({
            "comments": comments,
            "count": comments.len()
        }))
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for ListComments {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        ExecutionResult::unlogged(self.fetch(ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Card, Comment, User};

    #[tokio::test]
    async fn test_list_comments_filters() {
        let ctx = PlanContext::in_memory();
        let ada = ctx
            .users()
            .insert(&User::new("ada@example.com").with_password_hash("h"))
            .await
            .unwrap();
        let bob = ctx
            .users()
            .insert(&User::new("bob@example.com").with_password_hash("h"))
            .await
            .unwrap();
        let card = ctx
            .cards()
            .insert(&Card::new(crate::types::BoardId::new(), "c"))
            .await
            .unwrap();
        for (author, text) in [(&ada, "one"), (&bob, "two"), (&ada, "three")] {
            ctx.comments()
                .insert(&Comment::new(card.id.clone(), author.id.clone(), text))
                .await
                .unwrap();
        }

        let on_card = ListComments::on_card(card.id.clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(on_card["count"], 3);

        let by_ada = ListComments::by_author(ada.id.clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(by_ada["count"], 2);
    }
}
