//! Batch evaluation: walk the gold directory, evaluate pairs on a worker
//! pool, and aggregate the results through a single channel consumer.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use render_diff::{CorpusAccumulator, CorpusReport, EvaluationRecord, evaluate_files};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::OutputFormat;
use crate::commands::ConfigArgs;
use crate::output;

enum PairOutcome {
    Evaluated(EvaluationRecord),
    Failed,
}

pub fn run(
    gold_dir: &str,
    pred_dir: &str,
    jobs: Option<usize>,
    report_interval: u64,
    recursive: bool,
    format: OutputFormat,
    config_args: &ConfigArgs,
) -> Result<ExitCode> {
    let config = super::resolve_config(config_args)?;

    let gold_dir = Path::new(gold_dir);
    let pred_dir = Path::new(pred_dir);
    if !gold_dir.is_dir() {
        bail!("Gold directory does not exist: {}", gold_dir.display());
    }
    if !pred_dir.is_dir() {
        bail!("Predicted directory does not exist: {}", pred_dir.display());
    }

    let pairs = collect_pairs(gold_dir, pred_dir, recursive)?;
    info!(pairs = pairs.len(), jobs = ?jobs, "starting evaluation");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()
        .context("Failed to build worker pool")?;

    let (sender, receiver) = mpsc::channel::<PairOutcome>();

    // The aggregator alone owns the accumulator; workers only send records,
    // so no pair-level state ever needs a lock.
    let aggregator = thread::spawn(move || {
        let mut totals = CorpusAccumulator::new();
        for outcome in receiver {
            match outcome {
                PairOutcome::Evaluated(record) => {
                    totals.record(&record);
                    if report_interval > 0 && totals.total_pairs % report_interval == 0 {
                        log_progress(&totals);
                    }
                }
                PairOutcome::Failed => totals.record_failure(),
            }
        }
        totals
    });

    pool.install(|| {
        pairs.par_iter().for_each_with(sender, |sender, (gold, pred)| {
            let outcome = match evaluate_files(gold, pred, &config) {
                Ok(record) => PairOutcome::Evaluated(record),
                Err(err) => {
                    warn!(
                        gold = %gold.display(),
                        error = %err,
                        "pair excluded from totals"
                    );
                    PairOutcome::Failed
                }
            };
            // The aggregator outlives every worker send.
            let _ = sender.send(outcome);
        });
    });

    let totals = aggregator.join().expect("aggregator thread never panics");
    log_final(&totals);

    let report = totals.report();
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Text => output::text::write_corpus_report(&mut handle, &report)?,
        OutputFormat::Json => output::json::write_corpus_report(&mut handle, &report)?,
    }

    Ok(exit_code(&report))
}

fn collect_pairs(
    gold_dir: &Path,
    pred_dir: &Path,
    recursive: bool,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut walker = WalkDir::new(gold_dir).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut pairs = Vec::new();
    for entry in walker {
        let entry = entry
            .with_context(|| format!("Failed to walk gold directory: {}", gold_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let gold_path = entry.into_path();
        let relative = gold_path
            .strip_prefix(gold_dir)
            .expect("walker yields paths under its root");
        let pred_path = pred_dir.join(relative);
        pairs.push((gold_path, pred_path));
    }
    Ok(pairs)
}

fn log_progress(totals: &CorpusAccumulator) {
    log_totals(totals, "progress");
}

fn log_final(totals: &CorpusAccumulator) {
    log_totals(totals, "batch complete");
}

fn log_totals(totals: &CorpusAccumulator, message: &'static str) {
    info!(
        pairs = totals.total_pairs,
        failed = totals.total_failed,
        strict_matches = totals.total_match_strict,
        blank_tolerant_matches = totals.total_match_blank_tolerant,
        edit_distance = totals.total_edit_distance,
        reference_length = totals.total_reference_length,
        strict_accuracy = totals.strict_accuracy(),
        blank_tolerant_accuracy = totals.blank_tolerant_accuracy(),
        edit_distance_score = totals.edit_distance_score(),
        "{}",
        message
    );
}

fn exit_code(report: &CorpusReport) -> ExitCode {
    if report.total_failed == 0 && report.total_match_strict == report.total_pairs {
        ExitCode::from(0)
    } else {
        ExitCode::from(1)
    }
}
