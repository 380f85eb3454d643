//! Mapping parsed operations onto command structs
//!
//! Parameters are deserialized straight into the command, so the command's
//! serde attributes (defaults, aliases) are the whole parameter contract.

use crate::activity::ListActivity;
use crate::board::{AddBoard, DeleteBoard, GetBoard, ListBoards, UpdateBoard};
use crate::card::{AddCard, DeleteCard, GetCard, ListCards, MoveCard, UpdateCard};
use crate::comment::{AddComment, DeleteComment, GetComment, ListComments, UpdateComment};
use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::logging::Pretty;
use crate::processor::PlanOperationProcessor;
use crate::project::{
    AddProject, DeleteProject, GetProject, JoinProject, LeaveProject, ListProjects, UpdateProject,
};
use crate::types::{is_valid_operation, Noun, Operation, Verb};
use crate::user::{AddUser, DeleteUser, GetUser, LinkUser, ListUsers, UpdateUser};
use planboard_operations::{Execute, Operation as Described, OperationProcessor};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Execute one parsed operation through `processor`.
///
/// An `actor` on the operation takes precedence over the processor's.
pub async fn execute_operation(
    ctx: &PlanContext,
    processor: &PlanOperationProcessor,
    op: &Operation,
) -> Result<Value> {
    use Noun::*;
    use Verb::*;

    if !is_valid_operation(op.verb, op.noun) {
        return Err(PlanError::InvalidOperation {
            verb: op.verb.to_string(),
            noun: op.noun.to_string(),
        });
    }

    let processor = match &op.actor {
        Some(actor) => PlanOperationProcessor::with_actor(actor.clone()),
        None => processor.clone(),
    };
    debug!(op = %op.op_string(), actor = ?processor.actor(), "dispatching {}", Pretty(&op.params));

    match (op.verb, op.noun) {
        (Add, Project) => run::<AddProject>(ctx, &processor, op).await,
        (Get, Project) => run::<GetProject>(ctx, &processor, op).await,
        (List, Project) => run::<ListProjects>(ctx, &processor, op).await,
        (Update, Project) => run::<UpdateProject>(ctx, &processor, op).await,
        (Delete, Project) => run::<DeleteProject>(ctx, &processor, op).await,
        (Join, Project) => run::<JoinProject>(ctx, &processor, op).await,
        (Leave, Project) => run::<LeaveProject>(ctx, &processor, op).await,

        (Add, Board) => run::<AddBoard>(ctx, &processor, op).await,
        (Get, Board) => run::<GetBoard>(ctx, &processor, op).await,
        (List, Board) => run::<ListBoards>(ctx, &processor, op).await,
        (Update, Board) => run::<UpdateBoard>(ctx, &processor, op).await,
        (Delete, Board) => run::<DeleteBoard>(ctx, &processor, op).await,

        (Add, Card) => run::<AddCard>(ctx, &processor, op).await,
        (Get, Card) => run::<GetCard>(ctx, &processor, op).await,
        (List, Card) => run::<ListCards>(ctx, &processor, op).await,
        (Update, Card) => run::<UpdateCard>(ctx, &processor, op).await,
        (Move, Card) => run::<MoveCard>(ctx, &processor, op).await,
        (Delete, Card) => run::<DeleteCard>(ctx, &processor, op).await,

        (Add, Comment) => run::<AddComment>(ctx, &processor, op).await,
        (Get, Comment) => run::<GetComment>(ctx, &processor, op).await,
        (List, Comment) => run::<ListComments>(ctx, &processor, op).await,
        (Update, Comment) => run::<UpdateComment>(ctx, &processor, op).await,
        (Delete, Comment) => run::<DeleteComment>(ctx, &processor, op).await,

        (Add, User) => run::<AddUser>(ctx, &processor, op).await,
        (Get, User) => run::<GetUser>(ctx, &processor, op).await,
        (List, User) => run::<ListUsers>(ctx, &processor, op).await,
        (Update, User) => run::<UpdateUser>(ctx, &processor, op).await,
        (Delete, User) => run::<DeleteUser>(ctx, &processor, op).await,
        (Link, User) => run::<LinkUser>(ctx, &processor, op).await,

        (List, Activity) => run::<ListActivity>(ctx, &processor, op).await,

        (verb, noun) => Err(PlanError::InvalidOperation {
            verb: verb.to_string(),
            noun: noun.to_string(),
        }),
    }
}

/// Execute operations in order, stopping at the first failure
pub async fn execute_operations(
    ctx: &PlanContext,
    processor: &PlanOperationProcessor,
    ops: &[Operation],
) -> Result<Vec<Value>> {
    let mut results = Vec::with_capacity(ops.len());
    for op in ops {
        results.push(execute_operation(ctx, processor, op).await?);
    }
    Ok(results)
}

/// One instance of every command, for listing verbs, nouns and parameters
pub fn operations() -> Vec<Box<dyn Described + Send + Sync>> {
    vec![
        Box::new(AddProject::new("")),
        Box::new(GetProject::new("")),
        Box::new(ListProjects::new()),
        Box::new(UpdateProject::new("")),
        Box::new(DeleteProject::new("")),
        Box::new(JoinProject::new("", "")),
        Box::new(LeaveProject::new("", "")),
        Box::new(AddBoard::new("")),
        Box::new(GetBoard::new("")),
        Box::new(ListBoards::new()),
        Box::new(UpdateBoard::new("")),
        Box::new(DeleteBoard::new("")),
        Box::new(AddCard::new("", "")),
        Box::new(GetCard::new("")),
        Box::new(ListCards::default()),
        Box::new(UpdateCard::new("")),
        Box::new(MoveCard::new("", "")),
        Box::new(DeleteCard::new("")),
        Box::new(AddComment::new("", "", "")),
        Box::new(GetComment::new("")),
        Box::new(ListComments::default()),
        Box::new(UpdateComment::new("", "")),
        Box::new(DeleteComment::new("")),
        Box::new(AddUser::new("", "")),
        Box::new(GetUser::new("")),
        Box::new(ListUsers::new()),
        Box::new(UpdateUser::new("")),
        Box::new(DeleteUser::new("")),
        Box::new(LinkUser::new("", "", "")),
        Box::new(ListActivity::new()),
    ]
}

async fn run<T>(ctx: &PlanContext, processor: &PlanOperationProcessor, op: &Operation) -> Result<Value>
where
    T: DeserializeOwned + Execute<PlanContext, PlanError>,
{
    let command: T = serde_json::from_value(Value::Object(op.params.clone()))
        .map_err(|e| PlanError::parse(format!("{}: {e}", op.op_string())))?;
    processor.process(&command, ctx).await
}
