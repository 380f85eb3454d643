//! Operation processors: run a command, then persist its audit entry

use crate::{Execute, LogEntry};
use async_trait::async_trait;
use serde_json::Value;

/// Runs commands for a context type and records their log entries.
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    /// Execute `operation` and write its log entry, if any.
    async fn process<T>(&self, operation: &T, ctx: &C) -> Result<Value, E>
    where
        T: Execute<C, E> + Send + Sync;

    /// Persist a log entry for the given affected resources
    async fn write_log(
        &self,
        ctx: &C,
        log_entry: &LogEntry,
        affected_resources: &[String],
    ) -> Result<(), E>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExecutionResult, Operation, ParamMeta};
    use std::sync::Mutex;
    use std::time::Instant;

    struct Counter {
        entries: Mutex<Vec<LogEntry>>,
    }

    struct Bump;

    impl Operation for Bump {
        fn verb(&self) -> &'static str {
            "bump"
        }
        fn noun(&self) -> &'static str {
            "counter"
        }
        fn description(&self) -> &'static str {
            "Increment the counter"
        }
        fn parameters(&self) -> &'static [ParamMeta] {
            &[]
        }
    }

    #[async_trait]
    impl Execute<Counter, String> for Bump {
        async fn execute(&self, ctx: &Counter) -> ExecutionResult<Value, String> {
            let started = Instant::now();
            let count = ctx.entries.lock().map(|e| e.len()).unwrap_or(0);
            ExecutionResult::mutation(
                self.op_string(),
                Value::Null,
                started,
                Ok(Value::from(count + 1)),
            )
        }
    }

    struct Recording;

    #[async_trait]
    impl OperationProcessor<Counter, String> for Recording {
        async fn process<T>(&self, operation: &T, ctx: &Counter) -> Result<Value, String>
        where
            T: Execute<Counter, String> + Send + Sync,
        {
            let (result, entry) = operation.execute(ctx).await.split();
            if let Some(entry) = entry {
                self.write_log(ctx, &entry, &[]).await?;
            }
            result
        }

        async fn write_log(
            &self,
            ctx: &Counter,
            log_entry: &LogEntry,
            _affected_resources: &[String],
        ) -> Result<(), String> {
            ctx.entries
                .lock()
                .map_err(|e| e.to_string())?
                .push(log_entry.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_processor_records_log_entries() {
        let ctx = Counter {
            entries: Mutex::new(Vec::new()),
        };

        assert_eq!(Recording.process(&Bump, &ctx).await.unwrap(), 1);
        assert_eq!(Recording.process(&Bump, &ctx).await.unwrap(), 2);

        let entries = ctx.entries.lock().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].op, "bump counter");
    }
}
