//! Creating a child and linking it into its parent's list

use super::BackReferences;
use crate::error::{PlanError, Result};
use crate::relation::Relation;
use crate::store::{document_id, Document, EntityStore};
use serde_json::Value;
use tracing::debug;

/// Insert `child` under `parent_id` and append it to the parent's list.
///
/// The parent must exist (`NotFound`, nothing written) and the child's
/// foreign key must already name `parent_id`. The insert and the attach are
/// two writes; if the attach fails the child stays inserted.
pub async fn create_child_and_link(
    store: &dyn EntityStore,
    child: Document,
    relation: &Relation,
    parent_id: &str,
) -> Result<Document> {
    store.get(relation.parent, parent_id).await?;

    if let Some(foreign_key) = relation.foreign_key {
        let points_at_parent = child.get(foreign_key).and_then(Value::as_str) == Some(parent_id);
        if !points_at_parent {
            return Err(PlanError::invalid_value(
                foreign_key,
                format!("must reference {} {parent_id}", relation.parent),
            ));
        }
    }

    let child = store.insert(relation.child, child).await?;
    let child_id = document_id(&child)
        .ok_or_else(|| PlanError::store(format!("inserted {} has no id", relation.child)))?;
    BackReferences::new(store)
        .attach_child(relation, parent_id, child_id)
        .await?;
    debug!(%relation, parent_id, child_id, "created and linked child");

    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::CARD_COMMENTS;
    use crate::store::MemoryStore;
    use crate::types::{CardId, EntityKind};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_create_and_link() {
        let store = MemoryStore::new();
        let card = store
            .insert(EntityKind::Card, doc(json!({"title": "c", "comments": []})))
            .await
            .unwrap();
        let card_id = document_id(&card).unwrap().to_string();

        let comment = create_child_and_link(
            &store,
            doc(json!({"content": "hi", "card": &card_id})),
            &CARD_COMMENTS,
            &card_id,
        )
        .await
        .unwrap();

        let card = store.get(EntityKind::Card, &card_id).await.unwrap();
        assert_eq!(card["comments"], json!([document_id(&comment).unwrap()]));
    }

    #[tokio::test]
    async fn test_missing_parent_writes_nothing() {
        let store = MemoryStore::new();
        let missing = CardId::new();
        let err = create_child_and_link(
            &store,
            doc(json!({"content": "hi", "card": missing.as_str()})),
            &CARD_COMMENTS,
            missing.as_str(),
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.count(EntityKind::Comment).await, 0);
    }

    #[tokio::test]
    async fn test_foreign_key_must_match_parent() {
        let store = MemoryStore::new();
        let card = store
            .insert(EntityKind::Card, doc(json!({"title": "c"})))
            .await
            .unwrap();
        let card_id = document_id(&card).unwrap().to_string();

        let err = create_child_and_link(
            &store,
            doc(json!({"content": "hi", "card": CardId::new().as_str()})),
            &CARD_COMMENTS,
            &card_id,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PlanError::InvalidValue { .. }));
        assert_eq!(store.count(EntityKind::Comment).await, 0);
    }
}
