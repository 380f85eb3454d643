//! Planboard operation processor
//!
//! Runs a command, then writes its log entry to the global activity log and
//! to the log of every entity the command reports as affected.

use crate::context::PlanContext;
use crate::error::{PlanError, Result};
use crate::types::validate_id;
use planboard_operations::{Execute, ExecutionResult, LogEntry, Operation, OperationProcessor};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

/// Processor that records mutations in the context's activity log
#[derive(Debug, Default, Clone)]
pub struct PlanOperationProcessor {
    actor: Option<String>,
}

impl PlanOperationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute every log entry to `actor`
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }

    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

#[async_trait::async_trait]
impl OperationProcessor<PlanContext, PlanError> for PlanOperationProcessor {
    async fn process<T>(&self, operation: &T, ctx: &PlanContext) -> Result<Value>
    where
        T: Execute<PlanContext, PlanError> + Send + Sync,
    {
        let (result, log_entry) = operation.execute(ctx).await.split();

        let Some(mut entry) = log_entry else {
            return result;
        };
        if let Some(actor) = &self.actor {
            entry = entry.with_actor(actor.clone());
        }

        match &result {
            Ok(value) => {
                let affected = operation.affected_resource_ids(value);
                self.write_log(ctx, &entry, &affected).await?;
            }
            Err(error) => {
                // Record the failure against whatever the input named.
                let affected = operation.affected_resource_ids(&entry.input);
                if let Err(log_error) = self.write_log(ctx, &entry, &affected).await {
                    warn!(op = %entry.op, %error, %log_error, "failed to log failed operation");
                }
            }
        }
        result
    }

    async fn write_log(
        &self,
        ctx: &PlanContext,
        log_entry: &LogEntry,
        affected_resources: &[String],
    ) -> Result<()> {
        ctx.append_activity(log_entry).await?;
        for id in affected_resources {
            if validate_id(id).is_err() {
                debug!(id, "not logging against malformed id");
                continue;
            }
            ctx.append_entity_log(id, log_entry).await?;
        }
        debug!(op = %log_entry.op, affected = affected_resources.len(), "logged operation");
        Ok(())
    }
}

/// Wrap the outcome of a mutating command with its audit entry
pub(crate) fn logged<T>(command: &T, started: Instant, result: Result<Value>) -> ExecutionResult<Value, PlanError>
where
    T: Operation + Serialize,
{
    let input = serde_json::to_value(command).unwrap_or(Value::Null);
    ExecutionResult::mutation(command.op_string(), input, started, result)
}

/// String ids found at `keys` in `value`, looking one level into arrays.
///
/// Keys may be dotted (`deleted_root.id`).
pub(crate) fn ids_at(value: &Value, keys: &[&str]) -> Vec<String> {
    let mut ids = Vec::new();
    for key in keys {
        let found = key
            .split('.')
            .try_fold(value, |current, segment| current.get(segment));
        match found {
            Some(Value::String(id)) => ids.push(id.clone()),
            Some(Value::Array(items)) => ids.extend(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string),
            ),
            _ => {}
        }
    }
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ids_at() {
        let value = json!({
            "id": "a",
            "board": "b",
            "deleted_root": {"id": "c"},
            "users": ["d", "e"],
            "count": 3
        });
        assert_eq!(
            ids_at(&value, &["id", "board", "deleted_root.id", "users", "count", "missing"]),
            vec!["a", "b", "c", "d", "e"]
        );
    }

    #[test]
    fn test_with_actor() {
        let processor = PlanOperationProcessor::with_actor("ada");
        assert_eq!(processor.actor(), Some("ada"));
        assert_eq!(PlanOperationProcessor::new().actor(), None);
    }
}
