use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(name = "planboard")]
#[command(version)]
#[command(about = "Run planboard operations against a configured store")]
#[command(long_about = "
planboard executes project, board, card, comment and user operations
against the store named in configuration, keeping parent lists and
foreign keys consistent and recording every mutation in the activity log.

Configuration is read from ~/.planboard/planboard.{toml,yaml,json}, then
./.planboard/planboard.{toml,yaml,json}, then PLANBOARD_* environment
variables (PLANBOARD_STORE__BACKEND=file), then --config.

Example usage:
  planboard exec '{\"op\": \"add project\", \"name\": \"Launch\"}'
  echo '{\"add\": \"card\", \"board\": \"01H...\", \"title\": \"Ship\"}' | planboard exec
  planboard activity --limit 20
  planboard ops
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file, layered over discovered files and environment
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Attribute logged operations to this actor
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute one operation or an array of operations given as JSON
    Exec {
        /// Operation JSON; read from stdin when omitted
        input: Option<String>,
    },
    /// Show the activity log, newest first
    Activity {
        /// Maximum number of entries
        #[arg(long)]
        limit: Option<usize>,
        /// Only entries that touched this entity id
        #[arg(long)]
        entity: Option<String>,
    },
    /// List every supported operation and its parameters
    Ops,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exec_with_globals() {
        let cli = Cli::try_parse_from([
            "planboard",
            "exec",
            "{}",
            "--actor",
            "ada",
            "--format",
            "yaml",
            "-q",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Exec { input: Some(_) }));
        assert_eq!(cli.actor.as_deref(), Some("ada"));
        assert_eq!(cli.format, OutputFormat::Yaml);
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_activity() {
        let cli = Cli::try_parse_from(["planboard", "activity", "--limit", "5"]).unwrap();
        match cli.command {
            Commands::Activity { limit, entity } => {
                assert_eq!(limit, Some(5));
                assert_eq!(entity, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["planboard"]).is_err());
    }
}
