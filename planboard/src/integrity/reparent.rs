//! Moving a child from one parent to another

use super::BackReferences;
use crate::error::{PlanError, Result};
use crate::relation::Relation;
use crate::store::{Document, EntityStore, Patch};
use tracing::debug;

/// Move `child_id` from `old_parent_id` to `new_parent_id`.
///
/// Steps, each a separate write:
/// 1. equal parents (compared as plain strings) → no-op, the child is returned
/// 2. the new parent must exist (`NotFound`, nothing written), then the
///    child's foreign key is rewritten
/// 3. the child is inserted into the new parent's list at `position`
///    (appended when `None` or when the relation is unordered)
/// 4. the child is detached from the old parent's list
///
/// Between steps 3 and 4 the child id is listed under both parents.
pub async fn reparent_child(
    store: &dyn EntityStore,
    relation: &Relation,
    child_id: &str,
    old_parent_id: Option<&str>,
    new_parent_id: &str,
    position: Option<usize>,
) -> Result<Document> {
    let Some(foreign_key) = relation.foreign_key else {
        return Err(PlanError::InvalidOperation {
            verb: "reparent".to_string(),
            noun: relation.name.to_string(),
        });
    };

    if old_parent_id == Some(new_parent_id) {
        debug!(%relation, child_id, "reparent to same parent is a no-op");
        return store.get(relation.child, child_id).await;
    }

    store.get(relation.parent, new_parent_id).await?;

    let child = store
        .update_by_id(
            relation.child,
            child_id,
            &Patch::new().set(foreign_key, new_parent_id),
        )
        .await?;
    debug!(%relation, child_id, new_parent_id, "rewrote foreign key");

    let refs = BackReferences::new(store);
    let position = match position {
        Some(position) if relation.ordered => position,
        _ => usize::MAX,
    };
    refs.insert_child_at(relation, new_parent_id, child_id, position)
        .await?;

    if let Some(old_parent_id) = old_parent_id {
        refs.detach_child(relation, old_parent_id, child_id).await?;
    }
    debug!(%relation, child_id, ?old_parent_id, new_parent_id, "reparent complete");

    Ok(child)
}
