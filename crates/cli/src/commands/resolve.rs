//! Resolve command implementation.
//!
//! Shows which rule governs each name without contacting the cluster. A name
//! whose rule string is malformed is reported per row and fails the command.

use anyhow::Result;
use esmaint_config::Conf;

use crate::formatters::{OutputFormat, ResolutionRow, format_resolutions};

pub fn run(conf: &Conf, indices: &[String], output_format: &str) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let resolver = conf.indices.resolver();

    let mut first_error = None;
    let rows: Vec<ResolutionRow> = indices
        .iter()
        .map(|index| match resolver.resolve(index) {
            Ok(resolution) => ResolutionRow::from_resolution(index, &resolution),
            Err(e) => {
                let row = ResolutionRow::from_error(index, &e);
                first_error.get_or_insert(e);
                row
            }
        })
        .collect();

    print!("{}", format_resolutions(&rows, format)?);

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
