//! Corpus-level aggregation of per-pair evaluation records.

use serde::{Deserialize, Serialize};

use crate::record::EvaluationRecord;

/// Running totals over evaluated pairs.
///
/// Updates are commutative and merging is associative, so records may be
/// folded in any order (including as parallel workers complete) without
/// changing the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusAccumulator {
    pub total_pairs: u64,
    pub total_edit_distance: u64,
    pub total_reference_length: u64,
    pub total_match_strict: u64,
    pub total_match_blank_tolerant: u64,
    /// Pairs that failed to evaluate, excluded from every other total.
    pub total_failed: u64,
}

impl CorpusAccumulator {
    pub fn new() -> CorpusAccumulator {
        CorpusAccumulator::default()
    }

    pub fn record(&mut self, record: &EvaluationRecord) {
        self.total_pairs += 1;
        self.total_edit_distance += record.edit_distance;
        self.total_reference_length += record.reference_length;
        if record.match_strict {
            self.total_match_strict += 1;
        }
        if record.match_blank_tolerant {
            self.total_match_blank_tolerant += 1;
        }
    }

    pub fn record_failure(&mut self) {
        self.total_failed += 1;
    }

    pub fn merge(&mut self, other: &CorpusAccumulator) {
        self.total_pairs += other.total_pairs;
        self.total_edit_distance += other.total_edit_distance;
        self.total_reference_length += other.total_reference_length;
        self.total_match_strict += other.total_match_strict;
        self.total_match_blank_tolerant += other.total_match_blank_tolerant;
        self.total_failed += other.total_failed;
    }

    /// Fraction of evaluated pairs matching with blank padding included;
    /// NaN when no pair was evaluated.
    pub fn strict_accuracy(&self) -> f64 {
        ratio(self.total_match_strict, self.total_pairs)
    }

    /// Fraction of evaluated pairs matching after blank-column removal; NaN
    /// when no pair was evaluated.
    pub fn blank_tolerant_accuracy(&self) -> f64 {
        ratio(self.total_match_blank_tolerant, self.total_pairs)
    }

    /// `1 - total_edit_distance / total_reference_length`; NaN when the
    /// reference length is zero.
    pub fn edit_distance_score(&self) -> f64 {
        if self.total_reference_length == 0 {
            return f64::NAN;
        }
        1.0 - self.total_edit_distance as f64 / self.total_reference_length as f64
    }

    /// Snapshot of the totals and derived metrics.
    pub fn report(&self) -> CorpusReport {
        CorpusReport {
            total_pairs: self.total_pairs,
            total_failed: self.total_failed,
            total_match_strict: self.total_match_strict,
            total_match_blank_tolerant: self.total_match_blank_tolerant,
            total_edit_distance: self.total_edit_distance,
            total_reference_length: self.total_reference_length,
            strict_accuracy: self.strict_accuracy(),
            blank_tolerant_accuracy: self.blank_tolerant_accuracy(),
            edit_distance_score: self.edit_distance_score(),
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return f64::NAN;
    }
    numerator as f64 / denominator as f64
}

/// Aggregate metrics for one batch, ready for serialization.
///
/// Non-finite metric values serialize as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    pub total_pairs: u64,
    pub total_failed: u64,
    pub total_match_strict: u64,
    pub total_match_blank_tolerant: u64,
    pub total_edit_distance: u64,
    pub total_reference_length: u64,
    pub strict_accuracy: f64,
    pub blank_tolerant_accuracy: f64,
    pub edit_distance_score: f64,
}
