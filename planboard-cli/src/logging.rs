use crate::cli::Cli;
use planboard_config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Route tracing output to stderr, keeping stdout for results.
///
/// Command-line flags win over the configured level; `RUST_LOG` wins over
/// both.
pub fn configure_logging(cli: &Cli, config: &LoggingConfig) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "trace"
    } else if cli.debug {
        "debug"
    } else {
        config.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
