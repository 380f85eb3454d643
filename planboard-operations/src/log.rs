//! Audit trail records
//!
//! One [`LogEntry`] per executed mutation. Entries are appended as JSON lines
//! to the global activity log and to the log of every record the mutation
//! touched, so their serialized shape is stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ULID, so entries sort by creation time
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// "verb noun", as in `delete board`
    pub op: String,

    /// Command parameters after parsing
    pub input: Value,

    /// What the command returned; `{"error": "..."}` when it failed
    pub output: Value,

    /// User id or agent label; omitted when unattributed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Wall time spent in the command
    pub duration_ms: u64,
}

impl LogEntry {
    /// Stamp a fresh id and the current time onto an entry
    pub fn new(
        op: impl Into<String>,
        input: Value,
        output: Value,
        actor: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            actor,
            duration_ms,
        }
    }

    /// Attribute the entry, replacing any earlier actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// The entry records a command that failed
    pub fn is_error(&self) -> bool {
        self.output.get("error").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unattributed_entry_omits_actor() {
        let entry = LogEntry::new("delete board", json!({"id": "b"}), json!({}), None, 3);
        let line = serde_json::to_value(&entry).unwrap();
        assert!(line.get("actor").is_none());
        assert_eq!(line["op"], "delete board");

        let entry = entry.with_actor("ada");
        let back: LogEntry = serde_json::from_str(&serde_json::to_string(&entry).unwrap()).unwrap();
        assert_eq!(back.actor.as_deref(), Some("ada"));
        assert!(!back.is_error());
    }

    #[test]
    fn test_error_output_marks_failure() {
        let entry = LogEntry::new(
            "add card",
            json!({}),
            json!({"error": "board not found: b"}),
            None,
            0,
        );
        assert!(entry.is_error());
    }
}
