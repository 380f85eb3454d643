//! Comment commands

mod add;
mod delete;
mod get;
mod list;
mod update;

pub use add::AddComment;
pub use delete::DeleteComment;
pub use get::GetComment;
pub use list::ListComments;
pub use update::UpdateComment;
