//! Check-config command implementation.

use anyhow::Result;
use esmaint_config::Conf;

use crate::formatters::{ConfigSummary, OutputFormat, format_config};

pub fn run(conf: &Conf, output_format: &str) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let summary = ConfigSummary::from_conf(conf)?;
    print!("{}", format_config(&summary, format)?);
    Ok(())
}
