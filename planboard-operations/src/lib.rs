//! # Planboard Operations
//!
//! Commands in planboard are plain structs whose fields are the parameters.
//! The `#[operation]` attribute derives the [`Operation`] metadata (verb, noun,
//! description, parameter list) from the struct itself, and the command's
//! behaviour lives in an [`Execute`] implementation for a given context type.
//!
//! ## Example
//!
//! ```ignore
//! use planboard_operations::*;
//!
//! #[operation(verb = "add", noun = "card", description = "Create a card on a board")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AddCard {
//!     /// Board the card belongs to
//!     pub board: BoardId,
//!     /// Card title
//!     pub title: String,
//! }
//!
//! #[async_trait]
//! impl Execute<PlanContext, PlanError> for AddCard {
//!     async fn execute(&self, ctx: &PlanContext) -> ExecutionResult<Value, PlanError> {
//!         // mutations return ExecutionResult::Logged, reads ExecutionResult::Unlogged
//!     }
//! }
//! ```
//!
//! An [`OperationProcessor`] runs a command and persists the resulting
//! [`LogEntry`] wherever the context keeps its audit trail.

mod execution_result;
mod log;
mod operation;
mod parameter;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use parameter::{ParamMeta, ParamType};
pub use processor::OperationProcessor;

pub use planboard_operations_macros::operation;

pub use async_trait::async_trait;
pub use serde_json::Value;
