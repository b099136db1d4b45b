//! Plan command implementation.

use anyhow::Result;
use esmaint_config::Conf;
use esmaint_lifecycle::{CancellationToken, Mode};

use crate::formatters::{OutputFormat, format_report};

pub async fn run(conf: &Conf, output_format: &str, cancel: &CancellationToken) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let report = super::execute_pass(conf, Mode::Plan, cancel).await?;
    print!("{}", format_report(&report, format)?);
    Ok(())
}
