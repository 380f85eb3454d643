use super::print_output;
use crate::cli::Cli;
use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use anyhow::{Context, Result};
use planboard::{execute_operation, parse::parse_str, PlanContext, PlanError, PlanOperationProcessor};
use serde_json::{json, Value};
use std::io::Read;

/// Parse the input and run each operation in order.
///
/// Stops at the first failing operation. Results of the operations that ran
/// are printed either way; the failure is reported as a final
/// `{"error": ..., "kind": ...}` element.
pub async fn run(
    cli: &Cli,
    ctx: &PlanContext,
    processor: &PlanOperationProcessor,
    input: Option<&str>,
) -> Result<i32> {
    let input = match input {
        Some(input) => input.to_string(),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading operation from stdin")?;
            buffer
        }
    };

    let operations = match parse_str(&input) {
        Ok(operations) => operations,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(EXIT_USAGE);
        }
    };
    tracing::debug!(count = operations.len(), "parsed operations");

    let mut results = Vec::with_capacity(operations.len());
    let mut exit_code = EXIT_SUCCESS;
    for op in &operations {
        match execute_operation(ctx, processor, op).await {
            Ok(value) => results.push(value),
            Err(e) => {
                tracing::warn!(op = %op.op_string(), error = %e, "operation failed");
                results.push(error_value(&e));
                exit_code = EXIT_ERROR;
                break;
            }
        }
    }

    if !cli.quiet || exit_code != EXIT_SUCCESS {
        let output = if operations.len() == 1 {
            results.into_iter().next().unwrap_or(Value::Null)
        } else {
            Value::Array(results)
        };
        print_output(cli.format, &output)?;
    }
    Ok(exit_code)
}

fn error_value(error: &PlanError) -> Value {
    json!({
        "error": error.to_string(),
        "kind": error.kind()
    })
}
