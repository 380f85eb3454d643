//! Core types for the planboard engine

mod card;
mod ids;
mod kind;
mod operation;
mod project;
mod user;

// Re-export all types
pub use card::{Card, Comment};
pub use ids::{validate_id, BoardId, CardId, CommentId, EntityId, ProjectId, UserId};
pub use kind::{Entity, EntityKind};
pub use operation::{is_valid_operation, Noun, Operation, Verb};
pub use project::{Board, Project};
pub use user::{User, UserProfile};
