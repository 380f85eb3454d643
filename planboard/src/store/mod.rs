//! Entity store: per-kind key-value persistence
//!
//! Records are JSON documents keyed by their `id` field. The store performs
//! no cross-record effects; keeping parents and children consistent is the
//! job of [`crate::integrity`].
//!
//! Two backends ship with the crate:
//!
//! - [`MemoryStore`]: maps behind a `tokio::sync::RwLock`
//! - [`FileStore`]: one JSON file per record, atomic writes, directory lock
//!
//! ```text
//! data/
//! ├── .lock
//! ├── users/{id}.json
//! ├── projects/{id}.json
//! ├── boards/{id}.json
//! ├── cards/{id}.json
//! └── comments/{id}.json
//! ```

mod collection;
mod file;
mod filter;
mod memory;
mod patch;

pub use collection::{from_document, to_document, Collection};
pub use file::FileStore;
pub use filter::{lookup, Condition, Filter};
pub use memory::MemoryStore;
pub use patch::{FieldOp, Patch};

use crate::error::{PlanError, Result};
use crate::types::{validate_id, EntityKind};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A stored record
pub type Document = Map<String, Value>;

/// Persistence contract shared by every backend.
///
/// Every id argument is validated (`InvalidIdentifier`) before any lookup.
/// `find` returns records ordered by id.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetch one record
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Document>;

    /// All records matching `filter`
    async fn find(&self, kind: EntityKind, filter: &Filter) -> Result<Vec<Document>>;

    /// Store a new record, assigning a fresh id when it has none.
    /// Fails with `DuplicateId` if the id is taken.
    async fn insert(&self, kind: EntityKind, doc: Document) -> Result<Document>;

    /// Apply `patch` to one record and return the updated record
    async fn update_by_id(&self, kind: EntityKind, id: &str, patch: &Patch) -> Result<Document>;

    /// Remove one record and return it
    async fn delete_by_id(&self, kind: EntityKind, id: &str) -> Result<Document>;

    /// Remove every record matching `filter`, returning how many were removed
    async fn delete_many(&self, kind: EntityKind, filter: &Filter) -> Result<u64>;
}

/// The id of a record, if it has a string one
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

/// Ensure `doc` carries a valid id, generating one when absent
pub(crate) fn prepare_insert(mut doc: Document) -> Result<(String, Document)> {
    let id = match doc.get("id") {
        None | Some(Value::Null) => {
            let id = ulid::Ulid::new().to_string();
            doc.insert("id".to_string(), Value::String(id.clone()));
            id
        }
        Some(Value::String(id)) => {
            validate_id(id)?;
            id.clone()
        }
        Some(other) => return Err(PlanError::invalid_identifier(other.to_string())),
    };
    Ok((id, doc))
}
