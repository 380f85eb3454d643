//! Typed access to one collection of an [`EntityStore`]

use super::{Document, EntityStore, Filter, Patch};
use crate::error::{PlanError, Result};
use crate::types::{Entity, EntityId};
use serde_json::Value;
use std::marker::PhantomData;

/// A view of the store restricted to one entity type
pub struct Collection<'a, E> {
    store: &'a dyn EntityStore,
    _marker: PhantomData<fn() -> E>,
}

impl<'a, E: Entity> Collection<'a, E> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub async fn get(&self, id: &E::Id) -> Result<E> {
        from_document(self.store.get(E::KIND, id.as_str()).await?)
    }

    /// True if the record exists. Malformed ids are still an error.
    pub async fn exists(&self, id: &E::Id) -> Result<bool> {
        match self.store.get(E::KIND, id.as_str()).await {
            Ok(_) => Ok(true),
            Err(PlanError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<E>> {
        self.store
            .find(E::KIND, filter)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    pub async fn insert(&self, entity: &E) -> Result<E> {
        from_document(self.store.insert(E::KIND, to_document(entity)?).await?)
    }

    pub async fn update(&self, id: &E::Id, patch: &Patch) -> Result<E> {
        from_document(self.store.update_by_id(E::KIND, id.as_str(), patch).await?)
    }

    pub async fn delete(&self, id: &E::Id) -> Result<E> {
        from_document(self.store.delete_by_id(E::KIND, id.as_str()).await?)
    }

    pub async fn delete_many(&self, filter: &Filter) -> Result<u64> {
        self.store.delete_many(E::KIND, filter).await
    }
}

/// Serialize an entity into a store document
pub fn to_document<E: Entity>(entity: &E) -> Result<Document> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        _ => Err(PlanError::store(format!("{} is not a JSON object", E::KIND))),
    }
}

/// Deserialize a store document into an entity
pub fn from_document<E: Entity>(doc: Document) -> Result<E> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{Board, BoardId, Card};

    #[tokio::test]
    async fn test_typed_round_trip() {
        let store = MemoryStore::new();
        let cards: Collection<'_, Card> = Collection::new(&store);

        let board = BoardId::new();
        let card = cards
            .insert(&Card::new(board.clone(), "Write docs"))
            .await
            .unwrap();
        assert_eq!(cards.get(&card.id).await.unwrap(), card);

        let found = cards
            .find(&Filter::all().eq("board", board.as_str()))
            .await
            .unwrap();
        assert_eq!(found, vec![card.clone()]);

        let updated = cards
            .update(&card.id, &Patch::new().set("title", "Write more docs"))
            .await
            .unwrap();
        assert_eq!(updated.title, "Write more docs");
    }

    #[tokio::test]
    async fn test_exists() {
        let store = MemoryStore::new();
        let boards: Collection<'_, Board> = Collection::new(&store);
        let board = boards.insert(&Board::new("b")).await.unwrap();

        assert!(boards.exists(&board.id).await.unwrap());
        assert!(!boards.exists(&BoardId::new()).await.unwrap());
        assert!(boards.exists(&BoardId::from_string("x")).await.is_err());
    }
}
