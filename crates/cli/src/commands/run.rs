//! Run command implementation.
//!
//! Applies one maintenance pass. The report is printed even when some
//! indices failed; the command then exits with the partial-failure code.

use anyhow::Result;
use esmaint_config::Conf;
use esmaint_lifecycle::{CancellationToken, Mode};
use tracing::warn;

use crate::error::PartialFailure;
use crate::formatters::{OutputFormat, format_report};

pub async fn run(conf: &Conf, output_format: &str, cancel: &CancellationToken) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let report = super::execute_pass(conf, Mode::Apply, cancel).await?;
    print!("{}", format_report(&report, format)?);

    let failed = report.failed().count();
    if failed > 0 {
        for entry in report.failed() {
            warn!(index = %entry.index, "index left in a failed state");
        }
        return Err(PartialFailure {
            failed,
            total: report.indices.len(),
        }
        .into());
    }
    Ok(())
}
