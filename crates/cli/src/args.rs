//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Bind global options to their `ESMAINT_*` environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not load configuration (see `main`).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "esmaint")]
#[command(about = "esmaint - Elasticsearch index lifecycle maintenance", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  esmaint check-config\n  esmaint resolve info-2020-05-05 audit-prod-2020-05-05\n  esmaint plan -o json\n  esmaint --es-url http://127.0.0.1:9200 run\n  esmaint wait-recoveries --interval 10\n"
)]
pub struct Cli {
    /// Path to the YAML configuration file (overrides default location).
    #[arg(short, long = "config", global = true, env = "ESMAINT_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Elasticsearch URL (overrides elasticsearch.url)
    #[arg(long, global = true, env = "ESMAINT_ES_URL")]
    pub es_url: Option<String>,

    /// Request timeout in seconds (overrides elasticsearch.timeout)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of retries for throttled requests
    #[arg(long, global = true)]
    pub max_retries: Option<usize>,

    /// Log line format written to stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Output format (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    pub output: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate the configuration, then print rules and ignores
    CheckConfig,

    /// Show which rule governs each index name (no cluster access)
    Resolve {
        /// Index names to resolve
        #[arg(required = true)]
        indices: Vec<String>,
    },

    /// List indices and print the transitions that are due (no changes)
    Plan,

    /// Run one maintenance pass, applying every due transition
    Run,

    /// Block until the cluster has no active shard recoveries
    WaitRecoveries {
        /// Seconds between recovery polls
        #[arg(long, default_value_t = esmaint_config::constants::DEFAULT_RECOVERY_POLL_SECS)]
        interval: u64,
    },
}

impl Commands {
    /// Whether the command needs a reachable cluster.
    pub fn needs_cluster(&self) -> bool {
        !matches!(self, Self::CheckConfig | Self::Resolve { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "esmaint",
            "plan",
            "--es-url",
            "http://es:9200",
            "--log-format",
            "json",
            "-o",
            "json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Plan));
        assert_eq!(cli.es_url.as_deref(), Some("http://es:9200"));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.output, "json");
    }

    #[test]
    fn test_resolve_requires_names() {
        assert!(Cli::try_parse_from(["esmaint", "resolve"]).is_err());
        let cli = Cli::try_parse_from(["esmaint", "resolve", "a-2020-01-01", "b"]).unwrap();
        match cli.command {
            Commands::Resolve { indices } => assert_eq!(indices, vec!["a-2020-01-01", "b"]),
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_wait_recoveries_default_interval() {
        let cli = Cli::try_parse_from(["esmaint", "wait-recoveries"]).unwrap();
        assert!(matches!(cli.command, Commands::WaitRecoveries { interval: 5 }));
        assert!(cli.command.needs_cluster());
    }
}
