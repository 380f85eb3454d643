//! Board commands

mod add;
mod delete;
mod get;
mod list;
mod update;

pub use add::AddBoard;
pub use delete::DeleteBoard;
pub use get::GetBoard;
pub use list::ListBoards;
pub use update::UpdateBoard;
