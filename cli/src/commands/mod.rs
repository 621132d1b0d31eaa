pub mod compare;
pub mod evaluate;

use anyhow::{Context, Result};
use render_diff::EvalConfig;

/// Threshold flags shared by every subcommand; explicit flags win over the
/// config file.
#[derive(clap::Args)]
pub struct ConfigArgs {
    #[arg(long, value_name = "PATH", help = "JSON file with evaluation thresholds")]
    pub config: Option<String>,
    #[arg(long, value_name = "N", help = "Override the cluster merge threshold")]
    pub cluster_threshold: Option<u32>,
    #[arg(long, value_name = "N", help = "Override the span tolerance")]
    pub span_tolerance: Option<u32>,
    #[arg(
        long,
        value_name = "N",
        help = "Override the grayscale binarization threshold"
    )]
    pub binarize_threshold: Option<u8>,
}

pub fn resolve_config(args: &ConfigArgs) -> Result<EvalConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config file: {}", path))?
        }
        None => EvalConfig::default(),
    };

    if let Some(value) = args.cluster_threshold {
        config.cluster_merge_threshold = value;
    }
    if let Some(value) = args.span_tolerance {
        config.span_tolerance = value;
    }
    if let Some(value) = args.binarize_threshold {
        config.binarize_threshold = value;
    }

    config.validate().context("Invalid evaluation config")?;
    Ok(config)
}
