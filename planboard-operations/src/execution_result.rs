//! Execution result types for operations

use crate::LogEntry;
use serde_json::{json, Value};
use std::fmt::Display;
use std::time::Instant;

/// Outcome of executing an operation
///
/// - `Logged`: a mutation that succeeded and must be audited
/// - `Unlogged`: a read with no side effects
/// - `Failed`: an error, logged when the operation was a mutation
pub enum ExecutionResult<T, E> {
    /// Operation succeeded and should be logged
    Logged { value: T, log_entry: LogEntry },
    /// Operation succeeded but no logging needed (read-only)
    Unlogged { value: T },
    /// Operation failed
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Extract the result (Ok or Err)
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Logged { value, .. } | Self::Unlogged { value } => Ok(value),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Get the value and log entry separately
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Check if this should be logged
    pub fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Logged { .. }
                | Self::Failed {
                    log_entry: Some(_),
                    ..
                }
        )
    }

    /// Wrap the outcome of a read-only operation. Errors are not logged.
    pub fn unlogged(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Unlogged { value },
            Err(error) => Self::Failed {
                error,
                log_entry: None,
            },
        }
    }
}

impl<E: Display> ExecutionResult<Value, E> {
    /// Wrap the outcome of a mutation, producing a log entry for both
    /// success and failure.
    ///
    /// `started` is the instant the operation began; the elapsed time is
    /// recorded in the entry.
    pub fn mutation(
        op: impl Into<String>,
        input: Value,
        started: Instant,
        result: Result<Value, E>,
    ) -> Self {
        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(value) => Self::Logged {
                log_entry: LogEntry::new(op, input, value.clone(), None, duration_ms),
                value,
            },
            Err(error) => {
                let output = json!({ "error": error.to_string() });
                Self::Failed {
                    log_entry: Some(LogEntry::new(op, input, output, None, duration_ms)),
                    error,
                }
            }
        }
    }
}
