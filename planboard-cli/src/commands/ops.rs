use super::print_output;
use crate::cli::Cli;
use crate::exit_codes::EXIT_SUCCESS;
use anyhow::Result;
use planboard::Operation;
use serde_json::{json, Value};

pub fn run(cli: &Cli) -> Result<i32> {
    let listed: Vec<Value> = planboard::operations()
        .iter()
        .map(|op| {
            json!({
                "op": op.op_string(),
                "description": op.description(),
                "parameters": op.parameters(),
            })
        })
        .collect();
    print_output(cli.format, &listed)?;
    Ok(EXIT_SUCCESS)
}
