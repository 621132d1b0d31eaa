//! Per-pair evaluation results and evaluation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error_codes;

/// The outcome of evaluating one gold/predicted image pair.
///
/// Created once per pair and immutable afterwards; the corpus accumulator is
/// its only stateful consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Column-wise Levenshtein distance over the exact (unclustered)
    /// sequences.
    pub edit_distance: u64,
    /// Length of the longer of the two compared sequences.
    pub reference_length: u64,
    /// Verdict over the full sequences, blank padding included.
    pub match_strict: bool,
    /// Verdict after removing blank columns from each sequence
    /// independently.
    pub match_blank_tolerant: bool,
}

/// Errors produced while evaluating a pair.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvalError {
    #[error(
        "[RDIFF_EVAL_001] internal error: {message}. Suggestion: report a bug with the input images if possible."
    )]
    Internal { message: String },
}

impl EvalError {
    pub fn code(&self) -> &'static str {
        match self {
            EvalError::Internal { .. } => error_codes::EVAL_INTERNAL,
        }
    }
}
