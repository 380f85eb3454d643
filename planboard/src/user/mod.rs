//! User commands
//!
//! Outputs carry [`UserProfile`](crate::types::UserProfile)s; password
//! hashes never leave the store through these commands.

mod add;
mod delete;
mod get;
mod link;
mod list;
mod update;

pub use add::AddUser;
pub use delete::DeleteUser;
pub use get::GetUser;
pub use link::LinkUser;
pub use list::ListUsers;
pub use update::UpdateUser;
