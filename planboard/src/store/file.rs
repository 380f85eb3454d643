//! File-backed store: one pretty-printed JSON document per record

use super::{prepare_insert, Document, EntityStore, Filter, Patch};
use crate::error::{PlanError, Result};
use crate::types::{validate_id, EntityKind};
use async_trait::async_trait;
use fs2::FileExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Store rooted at a data directory.
///
/// The directory is locked exclusively for the lifetime of the store, so a
/// second process (or a second `FileStore` on the same directory) fails with
/// `LockBusy`. Within the process, writes are serialized so a read-modify-write
/// in `update_by_id` cannot interleave with another write.
pub struct FileStore {
    root: PathBuf,
    writes: Mutex<()>,
    _lock: DirLock,
}

impl FileStore {
    /// Open (creating if needed) the data directory at `root`
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        for kind in EntityKind::ALL {
            fs::create_dir_all(root.join(kind.collection())).await?;
        }
        let lock = DirLock::acquire(&root.join(".lock"))?;
        tracing::debug!(root = %root.display(), "opened file store");

        Ok(Self {
            root,
            writes: Mutex::new(()),
            _lock: lock,
        })
    }

    /// The data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn kind_dir(&self, kind: EntityKind) -> PathBuf {
        self.root.join(kind.collection())
    }

    fn record_path(&self, kind: EntityKind, id: &str) -> PathBuf {
        self.kind_dir(kind).join(format!("{id}.json"))
    }

    async fn read_record(&self, kind: EntityKind, id: &str) -> Result<Document> {
        let path = self.record_path(kind, id);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PlanError::not_found(kind, id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_record(&self, kind: EntityKind, id: &str, doc: &Document) -> Result<()> {
        let content = serde_json::to_string_pretty(doc)?;
        atomic_write(&self.record_path(kind, id), content.as_bytes()).await
    }

    /// Every record of a kind, ordered by id
    async fn read_all(&self, kind: EntityKind) -> Result<Vec<Document>> {
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(self.kind_dir(kind)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();

        let mut docs = Vec::with_capacity(ids.len());
        for id in ids {
            match self.read_record(kind, &id).await {
                Ok(doc) => docs.push(doc),
                // removed between listing and reading
                Err(PlanError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(docs)
    }
}

#[async_trait]
impl EntityStore for FileStore {
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Document> {
        validate_id(id)?;
        self.read_record(kind, id).await
    }

    async fn find(&self, kind: EntityKind, filter: &Filter) -> Result<Vec<Document>> {
        let docs = self.read_all(kind).await?;
        Ok(docs.into_iter().filter(|doc| filter.matches(doc)).collect())
    }

    async fn insert(&self, kind: EntityKind, doc: Document) -> Result<Document> {
        let (id, doc) = prepare_insert(doc)?;
        let _guard = self.writes.lock().await;
        if fs::try_exists(self.record_path(kind, &id)).await? {
            return Err(PlanError::duplicate_id(kind, id));
        }
        self.write_record(kind, &id, &doc).await?;
        Ok(doc)
    }

    async fn update_by_id(&self, kind: EntityKind, id: &str, patch: &Patch) -> Result<Document> {
        validate_id(id)?;
        let _guard = self.writes.lock().await;
        let mut doc = self.read_record(kind, id).await?;
        patch.apply(&mut doc)?;
        self.write_record(kind, id, &doc).await?;
        Ok(doc)
    }

    async fn delete_by_id(&self, kind: EntityKind, id: &str) -> Result<Document> {
        validate_id(id)?;
        let _guard = self.writes.lock().await;
        let doc = self.read_record(kind, id).await?;
        fs::remove_file(self.record_path(kind, id)).await?;
        Ok(doc)
    }

    async fn delete_many(&self, kind: EntityKind, filter: &Filter) -> Result<u64> {
        let _guard = self.writes.lock().await;
        let mut removed = 0;
        for doc in self.read_all(kind).await? {
            if !filter.matches(&doc) {
                continue;
            }
            if let Some(id) = super::document_id(&doc) {
                fs::remove_file(self.record_path(kind, id)).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// RAII lock guard on the data directory - releases on drop
struct DirLock {
    file: std::fs::File,
}

impl DirLock {
    fn acquire(path: &Path) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { file }),
            Err(_) => Err(PlanError::LockBusy),
        }
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::document_id;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_layout_and_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path().join("data")).await.unwrap();

        let board = store
            .insert(EntityKind::Board, doc(json!({"name": "Roadmap", "cards": []})))
            .await
            .unwrap();
        let id = document_id(&board).unwrap().to_string();

        let path = temp.path().join("data/boards").join(format!("{id}.json"));
        assert!(path.exists());

        let loaded = store.get(EntityKind::Board, &id).await.unwrap();
        assert_eq!(loaded["name"], "Roadmap");
    }

    #[tokio::test]
    async fn test_update_delete_and_find() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).await.unwrap();

        let mut ids = Vec::new();
        for board in ["b1", "b1", "b2"] {
            let card = store
                .insert(EntityKind::Card, doc(json!({"board": board, "comments": []})))
                .await
                .unwrap();
            ids.push(document_id(&card).unwrap().to_string());
        }

        let updated = store
            .update_by_id(EntityKind::Card, &ids[0], &Patch::new().add_to_set("comments", "x"))
            .await
            .unwrap();
        assert_eq!(updated["comments"], json!(["x"]));

        let found = store
            .find(EntityKind::Card, &Filter::all().eq("board", "b1"))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        // ordered by id
        assert_eq!(document_id(&found[0]), Some(ids[0].as_str()));

        let removed = store
            .delete_many(EntityKind::Card, &Filter::all().eq("board", "b1"))
            .await
            .unwrap();
        assert_eq!(removed, 2);

        store.delete_by_id(EntityKind::Card, &ids[2]).await.unwrap();
        assert!(store
            .delete_by_id(EntityKind::Card, &ids[2])
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_directory_lock() {
        let temp = TempDir::new().unwrap();
        let first = FileStore::open(temp.path()).await.unwrap();

        let second = FileStore::open(temp.path()).await;
        assert!(matches!(second, Err(PlanError::LockBusy)));

        drop(first);
        let _third = FileStore::open(temp.path()).await.unwrap();
    }
}
