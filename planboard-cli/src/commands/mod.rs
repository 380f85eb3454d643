//! Subcommand handlers

mod activity;
mod exec;
mod ops;

use crate::cli::{Cli, Commands, OutputFormat};
use anyhow::{Context, Result};
use planboard::{PlanContext, PlanOperationProcessor};
use planboard_config::PlanboardConfig;
use serde::Serialize;

/// Run the selected subcommand, returning the process exit code
pub async fn run(cli: &Cli, config: &PlanboardConfig) -> Result<i32> {
    match &cli.command {
        Commands::Exec { input } => {
            let ctx = open_context(config).await?;
            exec::run(cli, &ctx, &processor(cli), input.as_deref()).await
        }
        Commands::Activity { limit, entity } => {
            let ctx = open_context(config).await?;
            activity::run(cli, &ctx, *limit, entity.as_deref()).await
        }
        Commands::Ops => ops::run(cli),
    }
}

async fn open_context(config: &PlanboardConfig) -> Result<PlanContext> {
    PlanContext::from_config(config)
        .await
        .with_context(|| format!("opening {} store", config.store.backend))
}

fn processor(cli: &Cli) -> PlanOperationProcessor {
    match &cli.actor {
        Some(actor) => PlanOperationProcessor::with_actor(actor.clone()),
        None => PlanOperationProcessor::new(),
    }
}

/// Print `value` to stdout in the requested format
pub fn print_output<T: Serialize>(format: OutputFormat, value: &T) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml_ng::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
