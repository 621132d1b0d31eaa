//! The per-pair evaluation pipeline.
//!
//! `evaluate_pair` is a pure function over two binarized images: load-time
//! state aside, nothing here is shared between pairs, so callers may drive
//! it from any number of worker threads without coordination.

use std::path::Path;

use thiserror::Error;

use crate::classify::{PassOutcome, classify_pass};
use crate::cluster::{ClusterMap, non_blank};
use crate::config::EvalConfig;
use crate::diagnostic::DiagnosticRaster;
use crate::distance::levenshtein;
use crate::raster::{BinaryImage, Column, LoadError, reconcile_heights};
use crate::record::{EvalError, EvaluationRecord};

/// Evaluate one gold/predicted pair.
///
/// `predicted = None` is the absent-image case: the pair is fully penalized
/// (distance = gold width) without running the classifier.
pub fn evaluate_pair(
    gold: &BinaryImage,
    predicted: Option<&BinaryImage>,
    config: &EvalConfig,
) -> Result<EvaluationRecord, EvalError> {
    Ok(evaluate_inner(gold, predicted, config, false)?.0)
}

/// Evaluate one pair and return the strict pass's diagnostic raster.
///
/// The raster is `None` when the classifier never ran (identical sequences
/// or an absent predicted image).
pub fn evaluate_pair_with_diagnostic(
    gold: &BinaryImage,
    predicted: Option<&BinaryImage>,
    config: &EvalConfig,
) -> Result<(EvaluationRecord, Option<DiagnosticRaster>), EvalError> {
    evaluate_inner(gold, predicted, config, true)
}

fn evaluate_inner(
    gold: &BinaryImage,
    predicted: Option<&BinaryImage>,
    config: &EvalConfig,
    want_raster: bool,
) -> Result<(EvaluationRecord, Option<DiagnosticRaster>), EvalError> {
    let Some(predicted) = predicted else {
        let width = gold.width() as u64;
        let record = EvaluationRecord {
            edit_distance: width,
            reference_length: width,
            match_strict: false,
            match_blank_tolerant: gold.columns().iter().all(|column| column.is_blank()),
        };
        return Ok((record, None));
    };

    let mut gold = gold.clone();
    let mut predicted = predicted.clone();
    let height = reconcile_heights(&mut gold, &mut predicted);
    let seq1 = gold.into_columns();
    let seq2 = predicted.into_columns();

    let edit_distance = levenshtein(&seq1, &seq2);
    let reference_length = seq1.len().max(seq2.len()) as u64;

    if edit_distance == 0 {
        let record = EvaluationRecord {
            edit_distance,
            reference_length,
            match_strict: true,
            match_blank_tolerant: true,
        };
        return Ok((record, None));
    }

    // Strict pass over the full sequences.
    let strict = run_pass(&seq1, &seq2, height, config, want_raster)?;

    // Blank-tolerant pass over the non-blank subsequences, clustered afresh.
    let trimmed1 = non_blank(&seq1);
    let trimmed2 = non_blank(&seq2);
    let match_blank_tolerant = if trimmed1.is_empty() || trimmed2.is_empty() {
        trimmed1.is_empty() && trimmed2.is_empty()
    } else {
        run_pass(&trimmed1, &trimmed2, height, config, false)?.matched
    };

    let record = EvaluationRecord {
        edit_distance,
        reference_length,
        match_strict: strict.matched,
        match_blank_tolerant,
    };
    Ok((record, strict.raster))
}

/// One classification pass: cluster the pair, encode both sequences, and
/// classify the opcode alignment. The strict and blank-tolerant verdicts
/// differ only in the sequences handed in.
fn run_pass(
    seq1: &[Column],
    seq2: &[Column],
    height: u32,
    config: &EvalConfig,
    want_raster: bool,
) -> Result<PassOutcome, EvalError> {
    let clusters = ClusterMap::build(seq1, seq2, config.cluster_merge_threshold);
    let symbols1 = clusters.encode(seq1)?;
    let symbols2 = clusters.encode(seq2)?;
    Ok(classify_pass(
        &symbols1,
        &symbols2,
        seq1,
        seq2,
        height,
        config,
        want_raster,
    ))
}

/// Errors produced by the file-level evaluation API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PairError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Load both files and evaluate them as one pair.
///
/// A missing predicted file is the absent-image case, not an error; a
/// missing or undecodable gold file is.
pub fn evaluate_files(
    gold_path: impl AsRef<Path>,
    predicted_path: impl AsRef<Path>,
    config: &EvalConfig,
) -> Result<EvaluationRecord, PairError> {
    let (gold, predicted) = load_pair(gold_path.as_ref(), predicted_path.as_ref(), config)?;
    Ok(evaluate_pair(&gold, predicted.as_ref(), config)?)
}

/// [`evaluate_files`] variant that also returns the diagnostic raster.
pub fn evaluate_files_with_diagnostic(
    gold_path: impl AsRef<Path>,
    predicted_path: impl AsRef<Path>,
    config: &EvalConfig,
) -> Result<(EvaluationRecord, Option<DiagnosticRaster>), PairError> {
    let (gold, predicted) = load_pair(gold_path.as_ref(), predicted_path.as_ref(), config)?;
    Ok(evaluate_pair_with_diagnostic(
        &gold,
        predicted.as_ref(),
        config,
    )?)
}

fn load_pair(
    gold_path: &Path,
    predicted_path: &Path,
    config: &EvalConfig,
) -> Result<(BinaryImage, Option<BinaryImage>), LoadError> {
    let gold = BinaryImage::load(gold_path, config.binarize_threshold)?;
    let predicted = if predicted_path.exists() {
        Some(BinaryImage::load(
            predicted_path,
            config.binarize_threshold,
        )?)
    } else {
        None
    };
    Ok((gold, predicted))
}
