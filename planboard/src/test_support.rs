//! Store wrapper for exercising partial failures
//!
//! [`FaultyStore`] records every write it sees and can fail the Nth write,
//! or every write of one kind to one collection, with a store failure.

use crate::error::{PlanError, Result};
use crate::store::{document_id, Document, EntityStore, Filter, MemoryStore, Patch};
use crate::types::EntityKind;
use async_trait::async_trait;
use std::sync::Mutex;

/// The kind of a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Insert,
    Update,
    Delete,
    DeleteMany,
}

/// A write the store accepted (or refused)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub op: WriteOp,
    pub kind: EntityKind,
    /// Record id, empty for `DeleteMany`
    pub id: String,
}

#[derive(Default)]
struct Faults {
    writes: Vec<WriteRecord>,
    fail_at: Option<usize>,
    fail_on: Option<(WriteOp, EntityKind)>,
}

/// An in-memory store that can be told to fail
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    faults: Mutex<Faults>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th write from now (1-based)
    pub fn fail_at_write(&self, n: usize) {
        let mut faults = self.lock();
        faults.fail_at = Some(faults.writes.len() + n);
    }

    /// Fail every `op` on `kind`
    pub fn fail_on(&self, op: WriteOp, kind: EntityKind) {
        self.lock().fail_on = Some((op, kind));
    }

    /// Stop injecting faults
    pub fn heal(&self) {
        let mut faults = self.lock();
        faults.fail_at = None;
        faults.fail_on = None;
    }

    /// Writes attempted so far, refused ones included
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.lock().writes.clone()
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes.len()
    }

    /// Forget recorded writes
    pub fn reset_writes(&self) {
        self.lock().writes.clear();
    }

    pub async fn count(&self, kind: EntityKind) -> usize {
        self.inner.count(kind).await
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, op: WriteOp, kind: EntityKind, id: &str) -> Result<()> {
        let mut faults = self.lock();
        faults.writes.push(WriteRecord {
            op,
            kind,
            id: id.to_string(),
        });
        let nth = faults.writes.len();
        if faults.fail_at == Some(nth) || faults.fail_on == Some((op, kind)) {
            return Err(PlanError::store(format!(
                "injected fault on write {nth} ({op:?} {kind})"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for FaultyStore {
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Document> {
        self.inner.get(kind, id).await
    }

    async fn find(&self, kind: EntityKind, filter: &Filter) -> Result<Vec<Document>> {
        self.inner.find(kind, filter).await
    }

    async fn insert(&self, kind: EntityKind, doc: Document) -> Result<Document> {
        let id = document_id(&doc).unwrap_or_default().to_string();
        self.record(WriteOp::Insert, kind, &id)?;
        self.inner.insert(kind, doc).await
    }

    async fn update_by_id(&self, kind: EntityKind, id: &str, patch: &Patch) -> Result<Document> {
        self.record(WriteOp::Update, kind, id)?;
        self.inner.update_by_id(kind, id, patch).await
    }

    async fn delete_by_id(&self, kind: EntityKind, id: &str) -> Result<Document> {
        self.record(WriteOp::Delete, kind, id)?;
        self.inner.delete_by_id(kind, id).await
    }

    async fn delete_many(&self, kind: EntityKind, filter: &Filter) -> Result<u64> {
        self.record(WriteOp::DeleteMany, kind, "")?;
        self.inner.delete_many(kind, filter).await
    }
}
