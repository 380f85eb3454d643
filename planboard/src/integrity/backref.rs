//! Back-reference maintenance: keeping a parent's child-id list in step with
//! its children's foreign keys

use crate::error::{PlanError, Result};
use crate::relation::Relation;
use crate::store::{Document, EntityStore, Patch};
use tracing::{debug, warn};

/// Single-write edits to parent child-id lists
pub struct BackReferences<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> BackReferences<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    /// Append `child_id` to the parent's list unless already present
    pub async fn attach_child(
        &self,
        relation: &Relation,
        parent_id: &str,
        child_id: &str,
    ) -> Result<Document> {
        debug!(%relation, parent_id, child_id, "attach child");
        self.store
            .update_by_id(
                relation.parent,
                parent_id,
                &Patch::new().add_to_set(relation.list_field, child_id),
            )
            .await
    }

    /// Remove every occurrence of `child_id` from the parent's list.
    ///
    /// A missing parent is not an error: there is nothing left to clean.
    /// Calling this twice has the same effect as calling it once.
    pub async fn detach_child(
        &self,
        relation: &Relation,
        parent_id: &str,
        child_id: &str,
    ) -> Result<()> {
        self.detach_children(relation, parent_id, &[child_id]).await
    }

    /// Remove several children from one parent in a single write
    pub async fn detach_children(
        &self,
        relation: &Relation,
        parent_id: &str,
        child_ids: &[&str],
    ) -> Result<()> {
        debug!(%relation, parent_id, ?child_ids, "detach children");
        let patch = Patch::new().pull_all(relation.list_field, child_ids.iter().copied());
        match self
            .store
            .update_by_id(relation.parent, parent_id, &patch)
            .await
        {
            Ok(_) => Ok(()),
            Err(PlanError::NotFound { .. }) => {
                warn!(%relation, parent_id, "parent missing while detaching children");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Place `child_id` at `position` in the parent's list.
    ///
    /// Any existing occurrence is removed first; the position is then
    /// clamped to the length of the deduplicated list. One write.
    pub async fn insert_child_at(
        &self,
        relation: &Relation,
        parent_id: &str,
        child_id: &str,
        position: usize,
    ) -> Result<Document> {
        debug!(%relation, parent_id, child_id, position, "insert child");
        let patch = Patch::new()
            .pull(relation.list_field, child_id)
            .insert_at(relation.list_field, child_id, position);
        self.store
            .update_by_id(relation.parent, parent_id, &patch)
            .await
    }
}
