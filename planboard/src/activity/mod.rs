//! Audit trail of executed mutations
//!
//! One global log plus one log per affected entity. The file backend keeps
//! JSON lines under `activity/`:
//!
//! ```text
//! activity/
//!   current.jsonl          # every logged operation
//!   entities/{id}.jsonl    # operations that touched {id}
//! ```
//!
//! Reads return entries newest first.

mod list;

pub use list::ListActivity;

use crate::error::Result;
use crate::types::validate_id;
use planboard_operations::LogEntry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

pub struct ActivityLog {
    backend: Backend,
}

enum Backend {
    Memory(Mutex<MemoryLog>),
    File { dir: PathBuf, writes: Mutex<()> },
}

#[derive(Default)]
struct MemoryLog {
    global: Vec<LogEntry>,
    entities: HashMap<String, Vec<LogEntry>>,
}

impl ActivityLog {
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Mutex::new(MemoryLog::default())),
        }
    }

    /// Keep the log under `dir`, creating it if needed
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(dir.join("entities")).await?;
        Ok(Self {
            backend: Backend::File {
                dir,
                writes: Mutex::new(()),
            },
        })
    }

    /// Append to the global log
    pub async fn append(&self, entry: &LogEntry) -> Result<()> {
        match &self.backend {
            Backend::Memory(log) => log.lock().await.global.push(entry.clone()),
            Backend::File { dir, writes } => {
                let _guard = writes.lock().await;
                append_line(&dir.join("current.jsonl"), entry).await?;
            }
        }
        Ok(())
    }

    /// Append to the log of one entity
    pub async fn append_for(&self, entity_id: &str, entry: &LogEntry) -> Result<()> {
        validate_id(entity_id)?;
        match &self.backend {
            Backend::Memory(log) => log
                .lock()
                .await
                .entities
                .entry(entity_id.to_string())
                .or_default()
                .push(entry.clone()),
            Backend::File { dir, writes } => {
                let _guard = writes.lock().await;
                append_line(&entity_path(dir, entity_id), entry).await?;
            }
        }
        Ok(())
    }

    /// Global entries, newest first
    pub async fn read(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let entries = match &self.backend {
            Backend::Memory(log) => log.lock().await.global.clone(),
            Backend::File { dir, .. } => read_lines(&dir.join("current.jsonl")).await?,
        };
        Ok(newest_first(entries, limit))
    }

    /// Entries for one entity, newest first
    pub async fn read_for(&self, entity_id: &str, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        validate_id(entity_id)?;
        let entries = match &self.backend {
            Backend::Memory(log) => log
                .lock()
                .await
                .entities
                .get(entity_id)
                .cloned()
                .unwrap_or_default(),
            Backend::File { dir, .. } => read_lines(&entity_path(dir, entity_id)).await?,
        };
        Ok(newest_first(entries, limit))
    }
}

fn entity_path(dir: &Path, entity_id: &str) -> PathBuf {
    dir.join("entities").join(format!("{entity_id}.jsonl"))
}

fn newest_first(mut entries: Vec<LogEntry>, limit: Option<usize>) -> Vec<LogEntry> {
    entries.reverse();
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}

async fn append_line(path: &Path, entry: &LogEntry) -> Result<()> {
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

async fn read_lines(path: &Path) -> Result<Vec<LogEntry>> {
    if !fs::try_exists(path).await? {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path).await?;
    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping malformed activity line");
                None
            }
        })
        .collect())
}
