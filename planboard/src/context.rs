//! PlanContext: everything an operation needs to run

use crate::activity::ActivityLog;
use crate::error::{PlanError, Result};
use crate::integrity::{self, BackReferences, Cascade, CascadeReport, RootRef};
use crate::locks::{EntityLockGuard, EntityLocks};
use crate::relation::Relation;
use crate::store::{
    from_document, to_document, Collection, Document, EntityStore, FileStore, MemoryStore,
};
use crate::types::{Board, Card, Comment, Entity, Project, User};
use planboard_config::{PlanboardConfig, StoreBackend};
use planboard_operations::LogEntry;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// The store, the audit trail and the per-entity locks shared by every
/// command.
///
/// Built from configuration with [`PlanContext::from_config`] or directly
/// with [`PlanContext::in_memory`] / [`PlanContext::open`].
pub struct PlanContext {
    store: Arc<dyn EntityStore>,
    activity: ActivityLog,
    locks: EntityLocks,
}

impl PlanContext {
    /// Wrap an existing store. Per-entity locks start disabled.
    pub fn new(store: Arc<dyn EntityStore>, activity: ActivityLog) -> Self {
        Self {
            store,
            activity,
            locks: EntityLocks::new(false),
        }
    }

    /// Memory store and memory activity log
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), ActivityLog::in_memory())
    }

    /// File store rooted at `root`, with the activity log under `root/activity`
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let store = FileStore::open(root).await?;
        let activity = ActivityLog::open(root.join("activity")).await?;
        Ok(Self::new(Arc::new(store), activity))
    }

    /// Build the context a configuration describes
    pub async fn from_config(config: &PlanboardConfig) -> Result<Self> {
        let ctx = match config.store.backend {
            StoreBackend::Memory => Self::in_memory(),
            StoreBackend::File => Self::open(&config.store.path).await?,
        };
        debug!(
            backend = %config.store.backend,
            serialize_per_entity = config.writes.serialize_per_entity,
            "built plan context"
        );
        Ok(ctx.with_serialized_writes(config.writes.serialize_per_entity))
    }

    /// Enable or disable per-entity locks for cascades and reparents
    pub fn with_serialized_writes(mut self, enabled: bool) -> Self {
        self.locks = EntityLocks::new(enabled);
        self
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    pub fn users(&self) -> Collection<'_, User> {
        Collection::new(self.store())
    }

    pub fn projects(&self) -> Collection<'_, Project> {
        Collection::new(self.store())
    }

    pub fn boards(&self) -> Collection<'_, Board> {
        Collection::new(self.store())
    }

    pub fn cards(&self) -> Collection<'_, Card> {
        Collection::new(self.store())
    }

    pub fn comments(&self) -> Collection<'_, Comment> {
        Collection::new(self.store())
    }

    pub fn backrefs(&self) -> BackReferences<'_> {
        BackReferences::new(self.store())
    }

    // =========================================================================
    // Integrity
    // =========================================================================

    /// Insert `child` and append it to `parent_id`'s list under `relation`
    pub async fn create_child_and_link<E: Entity>(
        &self,
        child: &E,
        relation: &Relation,
        parent_id: &str,
    ) -> Result<E> {
        let doc = to_document(child)?;
        let doc = integrity::create_child_and_link(self.store(), doc, relation, parent_id).await?;
        from_document(doc)
    }

    /// Delete `root` and its dependent closure
    pub async fn delete_root_and_cascade(&self, root: &RootRef) -> Result<CascadeReport> {
        let _guard = self.lock_entity(root.id()).await;
        Cascade::new(self.store()).delete_root_and_cascade(root).await
    }

    /// Move a child between two known parents
    pub async fn reparent_child(
        &self,
        relation: &Relation,
        child_id: &str,
        old_parent_id: Option<&str>,
        new_parent_id: &str,
        position: Option<usize>,
    ) -> Result<Document> {
        let _guard = self.lock_entity(child_id).await;
        integrity::reparent_child(
            self.store(),
            relation,
            child_id,
            old_parent_id,
            new_parent_id,
            position,
        )
        .await
    }

    /// Move a child to `new_parent_id`, reading its current parent from its
    /// foreign key under the same lock as the move itself.
    pub async fn move_child(
        &self,
        relation: &Relation,
        child_id: &str,
        new_parent_id: &str,
        position: Option<usize>,
    ) -> Result<Document> {
        let foreign_key = relation.foreign_key.ok_or_else(|| PlanError::InvalidOperation {
            verb: "move".to_string(),
            noun: relation.name.to_string(),
        })?;

        let _guard = self.lock_entity(child_id).await;
        let child = self.store.get(relation.child, child_id).await?;
        let old_parent_id = child
            .get(foreign_key)
            .and_then(Value::as_str)
            .map(str::to_string);

        integrity::reparent_child(
            self.store(),
            relation,
            child_id,
            old_parent_id.as_deref(),
            new_parent_id,
            position,
        )
        .await
    }

    /// Place a child at `position` within the parent it already has
    pub async fn reorder_child(
        &self,
        relation: &Relation,
        child_id: &str,
        parent_id: &str,
        position: usize,
    ) -> Result<Document> {
        let _guard = self.lock_entity(child_id).await;
        self.backrefs()
            .insert_child_at(relation, parent_id, child_id, position)
            .await
    }

    /// Hold the advisory lock on `id`, if per-entity locking is enabled
    pub async fn lock_entity(&self, id: &str) -> Option<EntityLockGuard> {
        self.locks.acquire(id).await
    }

    // =========================================================================
    // Activity logging
    // =========================================================================

    /// Append a log entry to the global activity log
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        self.activity.append(entry).await
    }

    /// Append a log entry to one entity's log
    pub async fn append_entity_log(&self, entity_id: &str, entry: &LogEntry) -> Result<()> {
        self.activity.append_for(entity_id, entry).await
    }

    /// Global activity, newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        self.activity.read(limit).await
    }

    /// One entity's activity, newest first
    pub async fn read_entity_log(
        &self,
        entity_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<LogEntry>> {
        self.activity.read_for(entity_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{BOARD_CARDS, PROJECT_BOARDS};
    use crate::types::EntityId;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_child_and_link_typed() {
        let ctx = PlanContext::in_memory();
        let project = ctx.projects().insert(&Project::new("Launch")).await.unwrap();

        let board = ctx
            .create_child_and_link(
                &Board::new("Backlog").in_project(project.id.clone()),
                &PROJECT_BOARDS,
                project.id.as_str(),
            )
            .await
            .unwrap();

        let project = ctx.projects().get(&project.id).await.unwrap();
        assert_eq!(project.boards, vec![board.id]);
    }

    #[tokio::test]
    async fn test_move_child_reads_old_parent() {
        let ctx = PlanContext::in_memory().with_serialized_writes(true);
        let a = ctx.boards().insert(&Board::new("A")).await.unwrap();
        let b = ctx.boards().insert(&Board::new("B")).await.unwrap();
        let card = ctx
            .create_child_and_link(&Card::new(a.id.clone(), "c"), &BOARD_CARDS, a.id.as_str())
            .await
            .unwrap();

        ctx.move_child(&BOARD_CARDS, card.id.as_str(), b.id.as_str(), Some(0))
            .await
            .unwrap();

        assert!(ctx.boards().get(&a.id).await.unwrap().cards.is_empty());
        assert_eq!(ctx.boards().get(&b.id).await.unwrap().cards, vec![card.id.clone()]);
        assert_eq!(ctx.cards().get(&card.id).await.unwrap().board, b.id);
    }

    #[tokio::test]
    async fn test_open_file_context() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("data");
        {
            let ctx = PlanContext::open(&root).await.unwrap();
            ctx.users()
                .insert(&User::new("ada@example.com").with_password_hash("h"))
                .await
                .unwrap();
        }
        assert!(root.join("users").is_dir());
        assert!(root.join("activity").is_dir());

        let ctx = PlanContext::open(&root).await.unwrap();
        let users = ctx
            .users()
            .find(&crate::store::Filter::all())
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].id.ensure_valid().is_ok());
    }

    #[tokio::test]
    async fn test_lock_entries_released_after_moves_and_deletes() {
        let ctx = PlanContext::in_memory().with_serialized_writes(true);
        let a = ctx.boards().insert(&Board::new("A")).await.unwrap();
        let b = ctx.boards().insert(&Board::new("B")).await.unwrap();

        for i in 0..50 {
            let card = ctx
                .create_child_and_link(
                    &Card::new(a.id.clone(), format!("card {i}")),
                    &BOARD_CARDS,
                    a.id.as_str(),
                )
                .await
                .unwrap();
            ctx.move_child(&BOARD_CARDS, card.id.as_str(), b.id.as_str(), Some(0))
                .await
                .unwrap();
            ctx.reorder_child(&BOARD_CARDS, card.id.as_str(), b.id.as_str(), 1)
                .await
                .unwrap();
            ctx.delete_root_and_cascade(&RootRef::Card(card.id))
                .await
                .unwrap();
        }

        assert!(ctx.boards().get(&b.id).await.unwrap().cards.is_empty());
        assert!(ctx.locks.is_empty());
    }

    #[tokio::test]
    async fn test_from_config_memory() {
        let mut config = PlanboardConfig::default();
        config.writes.serialize_per_entity = true;
        let ctx = PlanContext::from_config(&config).await.unwrap();
        assert!(ctx.lock_entity("x").await.is_some());
    }
}
