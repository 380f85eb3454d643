//! Referential-integrity core for a project-planning backend
//!
//! Users own projects, projects hold boards, boards hold cards and cards hold
//! comments. Each parent keeps a list of child ids and each child keeps a
//! foreign key to its parent. This crate keeps the two sides consistent
//! across creates, moves and cascading deletes, on top of a plain per-kind
//! key-value store.
//!
//! ## Overview
//!
//! - **Foreign key wins** - readers discover children by foreign key; parent
//!   lists only decide order
//! - **Ordered, awaited writes** - every multi-step change is a fixed sequence
//!   of single-record writes, each awaited before the next
//! - **No transactions** - a failing step stops the sequence and earlier
//!   writes stay applied
//! - **Audited mutations** - every mutating command produces a log entry in
//!   the global activity log and the logs of the entities it touched
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use planboard::{board::AddBoard, card::AddCard, project::AddProject, Execute, PlanContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = PlanContext::open("/var/lib/planboard").await?;
//!
//! let project = AddProject::new("Launch").execute(&ctx).await.into_result()?;
//! let board = AddBoard::new("Backlog")
//!     .in_project(project["id"].as_str().unwrap_or_default())
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//! let card = AddCard::new(board["id"].as_str().unwrap_or_default(), "Ship it")
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//!
//! println!("Created card: {}", card["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! root/
//! ├── .lock                  # exclusive advisory lock
//! ├── users/{id}.json
//! ├── projects/{id}.json
//! ├── boards/{id}.json
//! ├── cards/{id}.json
//! ├── comments/{id}.json
//! └── activity/
//!     ├── current.jsonl      # global operation log
//!     └── entities/{id}.jsonl
//! ```

mod context;
mod error;
mod locks;
mod logging;
mod processor;
pub mod assemble;
pub mod dispatch;
pub mod integrity;
pub mod parse;
pub mod relation;
pub mod store;
pub mod types;
pub mod validate;

// Command modules
pub mod activity;
pub mod board;
pub mod card;
pub mod comment;
pub mod project;
pub mod user;

#[cfg(feature = "test-support")]
pub mod test_support;

// Re-export Execute trait and types from operations crate
pub use planboard_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use activity::ActivityLog;
pub use assemble::{Assembler, Depth};
pub use context::PlanContext;
pub use dispatch::{execute_operation, execute_operations, operations};
pub use error::{ErrorKind, PlanError, Result};
pub use integrity::{CascadeCounts, CascadeReport, RootRef};
pub use locks::{EntityLockGuard, EntityLocks};
pub use logging::Pretty;
pub use processor::PlanOperationProcessor;
pub use relation::{Relation, BOARD_CARDS, CARD_COMMENTS, PROJECT_BOARDS, PROJECT_MEMBERS};
pub use store::{EntityStore, FileStore, MemoryStore};

// Re-export commonly used types
pub use types::{
    Board, BoardId, Card, CardId, Comment, CommentId, Entity, EntityId, EntityKind, Noun,
    Operation as PlanOperation, Project, ProjectId, User, UserId, UserProfile, Verb,
};
