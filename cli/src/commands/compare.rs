//! Single-pair comparison with an optional diagnostic raster.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use render_diff::evaluate_files_with_diagnostic;
use tracing::info;

use crate::OutputFormat;
use crate::commands::ConfigArgs;
use crate::output;

pub fn run(
    gold: &str,
    pred: &str,
    diff_image: Option<&str>,
    format: OutputFormat,
    config_args: &ConfigArgs,
) -> Result<ExitCode> {
    let config = super::resolve_config(config_args)?;

    let (record, raster) = evaluate_files_with_diagnostic(gold, pred, &config)
        .with_context(|| format!("Failed to evaluate pair: {} vs {}", gold, pred))?;

    if let Some(path) = diff_image {
        match &raster {
            Some(raster) => {
                raster
                    .write_png(path)
                    .with_context(|| format!("Failed to write diff image: {}", path))?;
                info!(path, "diagnostic raster written");
            }
            None => info!("no diagnostic raster: the pair never reached the classifier"),
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Text => output::text::write_record(&mut handle, gold, pred, &record)?,
        OutputFormat::Json => output::json::write_record(&mut handle, &record)?,
    }

    Ok(if record.match_strict {
        ExitCode::from(0)
    } else {
        ExitCode::from(1)
    })
}
