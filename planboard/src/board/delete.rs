//! DeleteBoard command

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::integrity::RootRef;
use crate::processor::{ids_at, logged};
use crate::types::BoardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use planboard_operations::{async_trait, operation, Execute, ExecutionResult};
use std::time::Instant;

/// Delete a board with its cards and their comments
#[operation(verb = "delete", noun = "board", description = "Delete a board, its cards and their comments")]
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteBoard {
    /// The board ID
    pub id: BoardId,
}

impl DeleteBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self { id: id.into() }
    }

    async fn apply(&self, ctx: &PlanContext) -> Result<Value> {
        let report = ctx
            .delete_root_and_cascade(&RootRef::Board(self.id.clone()))
            .await?;
        Ok(serde_json::to_value(report)?)
    }
}

#[async_trait]
impl Execute<PlanContext, PlanError> for DeleteBoard {
    async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
        let started = Instant::now();
        logged(self, started, self.apply(ctx).await)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        let mut ids = vec![self.id.to_string()];
        ids.extend(ids_at(result, &["deleted_root.project"]));
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::AddBoard;
    use crate::card::AddCard;
    use crate::types::Project;

    #[tokio::test]
    async fn test_delete_board_detaches_from_project() {
        let ctx = PlanContext::in_memory();
        let project = ctx.projects().insert(&Project::new("Launch")).await.unwrap();
        let board = AddBoard::new("Backlog")
            .in_project(project.id.clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let board_id = board["id"].as_str().unwrap();
        AddCard::new(board_id, "a").execute(&ctx).await.into_result().unwrap();
        AddCard::new(board_id, "b").execute(&ctx).await.into_result().unwrap();

        let report = DeleteBoard::new(board_id)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(report["counts"]["boards"], 1);
        assert_eq!(report["counts"]["cards"], 2);
        assert!(ctx.projects().get(&project.id).await.unwrap().boards.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_board() {
        let ctx = PlanContext::in_memory();
        let err = DeleteBoard::new(BoardId::new())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
