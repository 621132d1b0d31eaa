mod commands;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::ConfigArgs;

#[derive(Parser)]
#[command(name = "render-diff")]
#[command(about = "Compare rendered raster images and score prediction quality")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        short = 'v',
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v debug, -vv trace)"
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Evaluate every gold/predicted pair under two directories")]
    Evaluate {
        #[arg(long, help = "Directory of gold renderings")]
        gold_dir: String,
        #[arg(long, help = "Directory of predicted renderings, paired by file name")]
        pred_dir: String,
        #[arg(long, short, help = "Worker threads (default: one per logical CPU)")]
        jobs: Option<usize>,
        #[arg(
            long,
            default_value_t = 100,
            help = "Log running totals every N evaluated pairs (0 disables)"
        )]
        report_interval: u64,
        #[arg(long, help = "Recurse into subdirectories of the gold directory")]
        recursive: bool,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[command(flatten)]
        config: ConfigArgs,
    },
    #[command(about = "Compare a single gold/predicted image pair")]
    Compare {
        #[arg(help = "Path to the gold rendering")]
        gold: String,
        #[arg(help = "Path to the predicted rendering")]
        pred: String,
        #[arg(long, value_name = "PATH", help = "Write the diagnostic raster PNG here")]
        diff_image: Option<String>,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Evaluate {
            gold_dir,
            pred_dir,
            jobs,
            report_interval,
            recursive,
            format,
            config,
        } => commands::evaluate::run(
            &gold_dir,
            &pred_dir,
            jobs,
            report_interval,
            recursive,
            format,
            &config,
        ),
        Commands::Compare {
            gold,
            pred,
            diff_image,
            format,
            config,
        } => commands::compare::run(&gold, &pred, diff_image.as_deref(), format, &config),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
