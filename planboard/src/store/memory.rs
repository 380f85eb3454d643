//! In-memory store backend

use super::{prepare_insert, Document, EntityStore, Filter, Patch};
use crate::error::{PlanError, Result};
use crate::types::{validate_id, EntityKind};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Records held in memory, one ordered map per kind.
///
/// Each operation holds the lock for its whole read-modify-write, so a
/// single `update_by_id` is atomic with respect to other calls.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<EntityKind, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records of one kind
    pub async fn count(&self, kind: EntityKind) -> usize {
        self.records
            .read()
            .await
            .get(&kind)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Document> {
        validate_id(id)?;
        self.records
            .read()
            .await
            .get(&kind)
            .and_then(|records| records.get(id))
            .cloned()
            .ok_or_else(|| PlanError::not_found(kind, id))
    }

    async fn find(&self, kind: EntityKind, filter: &Filter) -> Result<Vec<Document>> {
        let records = self.records.read().await;
        Ok(records
            .get(&kind)
            .map(|records| {
                records
                    .values()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, kind: EntityKind, doc: Document) -> Result<Document> {
        let (id, doc) = prepare_insert(doc)?;
        let mut records = self.records.write().await;
        let collection = records.entry(kind).or_default();
        if collection.contains_key(&id) {
            return Err(PlanError::duplicate_id(kind, id));
        }
        collection.insert(id, doc.clone());
        Ok(doc)
    }

    async fn update_by_id(&self, kind: EntityKind, id: &str, patch: &Patch) -> Result<Document> {
        validate_id(id)?;
        let mut records = self.records.write().await;
        let current = records
            .get_mut(&kind)
            .and_then(|records| records.get_mut(id))
            .ok_or_else(|| PlanError::not_found(kind, id))?;

        let mut updated = current.clone();
        patch.apply(&mut updated)?;
        *current = updated.clone();
        Ok(updated)
    }

    async fn delete_by_id(&self, kind: EntityKind, id: &str) -> Result<Document> {
        validate_id(id)?;
        self.records
            .write()
            .await
            .get_mut(&kind)
            .and_then(|records| records.remove(id))
            .ok_or_else(|| PlanError::not_found(kind, id))
    }

    async fn delete_many(&self, kind: EntityKind, filter: &Filter) -> Result<u64> {
        let mut records = self.records.write().await;
        let Some(collection) = records.get_mut(&kind) else {
            return Ok(0);
        };
        let before = collection.len();
        collection.retain(|_, doc| !filter.matches(doc));
        Ok((before - collection.len()) as u64)
    }
}
