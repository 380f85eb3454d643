//! Referential integrity across the Project → Board → Card → Comment graph
//!
//! Parents hold lists of child ids; children hold a foreign key to their
//! parent. The foreign key is the source of truth. The functions here issue
//! the ordered, individually-awaited store writes that keep the two in step:
//!
//! - [`BackReferences`]: attach, detach and positional insert on one parent
//! - [`create_child_and_link`]: insert a child and attach it
//! - [`reparent_child`]: move a child between parents
//! - [`Cascade`]: delete a root and its dependent closure
//!
//! Nothing here is transactional. A failing step returns its error and the
//! earlier steps stay applied.

mod backref;
mod cascade;
mod link;
mod reparent;

pub use backref::BackReferences;
pub use cascade::{Cascade, CascadeCounts, CascadeReport, RootRef};
pub use link::create_child_and_link;
pub use reparent::reparent_child;
