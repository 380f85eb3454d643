use clap::Parser;
use std::process;

mod cli;
mod commands;
mod exit_codes;
mod logging;

use cli::Cli;
use exit_codes::{EXIT_ERROR, EXIT_USAGE};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match planboard_config::load_configuration(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: configuration: {e}");
            process::exit(EXIT_USAGE);
        }
    };
    logging::configure_logging(&cli, &config.logging);
    tracing::debug!(backend = %config.store.backend, "loaded configuration");

    let exit_code = match commands::run(&cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("command failed: {e:?}");
            eprintln!("Error: {e:#}");
            EXIT_ERROR
        }
    };
    process::exit(exit_code);
}
