//! esmaint - Elasticsearch index lifecycle maintenance.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Load and validate the YAML configuration.
//! - Install logging and Ctrl+C cancellation, then run one command.
//!
//! Does NOT handle:
//! - Lifecycle logic (see `crates/lifecycle`) or REST calls (see `crates/client`).
//! - Scheduling. Each invocation runs one command and exits.
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide clap defaults.
//! - Logs go to stderr; command output goes to stdout.

mod args;
mod cancellation;
mod commands;
mod dispatch;
mod error;
mod formatters;

use std::time::Duration;

use args::{Cli, LogFormat};
use cancellation::{cancel_on_ctrl_c, is_cancelled_error, print_cancelled_message};
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use esmaint_config::ConfigLoader;
use esmaint_lifecycle::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::ConfigError.as_i32());
    }

    let cli = Cli::parse();
    init_logging(cli.log_format);

    let conf = match load_config(&cli) {
        Ok(conf) => conf,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(ExitCode::ConfigError.as_i32());
        }
    };
    if cli.command.needs_cluster() {
        tracing::debug!(url = %conf.elasticsearch.url, "configuration loaded");
    }

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(&cancel);

    let exit_code = match run_command(cli, conf, &cancel).await {
        Ok(()) => ExitCode::Success,
        Err(e) if is_cancelled_error(&e) => {
            print_cancelled_message();
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Install the stderr subscriber. `RUST_LOG` overrides the default `info` level.
fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

/// Layer CLI overrides over environment and file values.
fn load_config(cli: &Cli) -> Result<esmaint_config::Conf, esmaint_config::ConfigError> {
    let mut loader = ConfigLoader::new();

    // Blank values fall through to the environment / default location
    if let Some(ref path) = cli.config_path
        && !path.to_string_lossy().trim().is_empty()
    {
        loader = loader.with_config_path(path.clone());
    }
    if let Some(ref url) = cli.es_url
        && !url.trim().is_empty()
    {
        loader = loader.with_es_url(url.trim().to_string());
    }
    if let Some(secs) = cli.timeout {
        loader = loader.with_timeout(Duration::from_secs(secs));
    }
    if let Some(retries) = cli.max_retries {
        loader = loader.with_max_retries(retries);
    }

    loader.from_env()?.load()
}
