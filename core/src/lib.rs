//! Render Diff: structural comparison of rendered raster images.
//!
//! This crate provides functionality for:
//! - Loading raster images and binarizing them into column-major bit matrices
//! - Reconciling the heights of two images by zero-padding columns
//! - Clustering near-duplicate pixel columns into a compact symbol alphabet
//! - Computing a column-wise Levenshtein distance between two images
//! - Classifying an opcode alignment into strict and blank-tolerant verdicts
//! - Accumulating corpus-level accuracy metrics across many pairs
//!
//! # Quick Start
//!
//! ```ignore
//! use render_diff::{BinaryImage, EvalConfig, evaluate_pair};
//!
//! let config = EvalConfig::default();
//! let gold = BinaryImage::load("gold.png", config.binarize_threshold)?;
//! let pred = BinaryImage::load("pred.png", config.binarize_threshold)?;
//! let record = evaluate_pair(&gold, Some(&pred), &config)?;
//!
//! println!(
//!     "distance={} strict={} blank_tolerant={}",
//!     record.edit_distance, record.match_strict, record.match_blank_tolerant
//! );
//! ```

pub(crate) mod classify;
mod cluster;
mod config;
mod corpus;
mod diagnostic;
mod distance;
pub(crate) mod error_codes;
mod evaluate;
mod matcher;
mod raster;
mod record;

pub use cluster::{ClusterMap, Symbol, non_blank};
pub use config::{ConfigError, EvalConfig, EvalConfigBuilder};
pub use corpus::{CorpusAccumulator, CorpusReport};
pub use diagnostic::{DiagnosticRaster, DiagnosticWriteError};
pub use distance::levenshtein;
pub use evaluate::{
    PairError, evaluate_files, evaluate_files_with_diagnostic, evaluate_pair,
    evaluate_pair_with_diagnostic,
};
pub use matcher::{OpcodeSpan, OpcodeTag, SequenceMatcher};
pub use raster::{BinaryImage, Column, LoadError, reconcile_heights};
pub use record::{EvalError, EvaluationRecord};
