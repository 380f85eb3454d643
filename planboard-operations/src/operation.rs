//! The `Operation` metadata trait and the `Execute` behaviour trait

use crate::{ExecutionResult, ParamMeta};
use async_trait::async_trait;
use serde_json::Value;

/// Static description of a command. Implemented by `#[operation]`.
pub trait Operation {
    /// The verb, e.g. "add"
    fn verb(&self) -> &'static str;

    /// The noun, e.g. "card"
    fn noun(&self) -> &'static str;

    /// One-line human description
    fn description(&self) -> &'static str;

    /// Parameters derived from the struct fields
    fn parameters(&self) -> &'static [ParamMeta];

    /// Canonical "verb noun" string used in logs and input parsing
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Execute a command against a context `C`, failing with `E`.
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    /// Run the command
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;

    /// Ids of the records this command touched, for per-record logs.
    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        Vec::new()
    }
}
