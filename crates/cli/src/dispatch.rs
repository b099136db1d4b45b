//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the matching command handler.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()`).

use anyhow::Result;
use esmaint_config::Conf;
use esmaint_lifecycle::CancellationToken;

use crate::args::{Cli, Commands};
use crate::commands;

pub(crate) async fn run_command(
    cli: Cli,
    conf: Conf,
    cancel_token: &CancellationToken,
) -> Result<()> {
    match cli.command {
        Commands::CheckConfig => commands::check_config::run(&conf, &cli.output)?,
        Commands::Resolve { indices } => commands::resolve::run(&conf, &indices, &cli.output)?,
        Commands::Plan => commands::plan::run(&conf, &cli.output, cancel_token).await?,
        Commands::Run => commands::run::run(&conf, &cli.output, cancel_token).await?,
        Commands::WaitRecoveries { interval } => {
            commands::wait_recoveries::run(&conf, interval, cancel_token).await?
        }
    }
    Ok(())
}
