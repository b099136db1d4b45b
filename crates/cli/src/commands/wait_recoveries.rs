//! Wait-recoveries command implementation.

use std::time::Duration;

use anyhow::{Context as _, Result};
use esmaint_config::Conf;
use esmaint_lifecycle::{CancellationToken, Context, RecoveryWaiter};
use tracing::info;

pub async fn run(conf: &Conf, interval_secs: u64, cancel: &CancellationToken) -> Result<()> {
    if interval_secs == 0 {
        anyhow::bail!("--interval must be at least 1 second");
    }

    let client = super::build_client_from_config(conf)?;
    let ctx = Context::new(cancel.clone());

    RecoveryWaiter::new(Duration::from_secs(interval_secs))
        .wait(&client, &ctx)
        .await
        .context("failed waiting for recoveries")?;

    info!("no active recoveries");
    eprintln!("No active recoveries.");
    Ok(())
}
