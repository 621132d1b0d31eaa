//! Column clustering: maps near-duplicate pixel columns to shared symbols.
//!
//! Rendering jitter (anti-aliasing, sub-pixel shifts) produces columns that
//! differ in a handful of bits. Clustering keeps the alignment alphabet
//! compact: a column reuses the symbol of the first seen representative
//! within the merge threshold, scanning representatives in insertion order.

use rustc_hash::FxHashMap;

use crate::raster::Column;
use crate::record::EvalError;

/// Compact identifier for a column cluster.
pub type Symbol = u32;

/// Pair-local mapping from exact column bit patterns to symbols.
///
/// Built jointly over both sequences of one pair, sequence 1 fully before
/// sequence 2, and discarded afterwards; it is never shared across pairs.
///
/// Assignment is first-fit, not best-fit: a new column takes the symbol of
/// the earliest representative it differs from in strictly fewer than the
/// merge threshold bit positions, and only seeds a new cluster (becoming a
/// representative itself) when no seen representative is close enough.
#[derive(Debug, Default)]
pub struct ClusterMap {
    symbols: FxHashMap<Column, Symbol>,
    representatives: Vec<Column>,
}

impl ClusterMap {
    /// Build the map over both sequences of one pair.
    pub fn build(seq1: &[Column], seq2: &[Column], merge_threshold: u32) -> ClusterMap {
        let mut map = ClusterMap::default();
        map.observe_all(seq1, merge_threshold);
        map.observe_all(seq2, merge_threshold);
        map
    }

    fn observe_all(&mut self, seq: &[Column], merge_threshold: u32) {
        for column in seq {
            self.observe(column, merge_threshold);
        }
    }

    fn observe(&mut self, column: &Column, merge_threshold: u32) {
        if self.symbols.contains_key(column) {
            return;
        }
        for (idx, representative) in self.representatives.iter().enumerate() {
            if column.bit_difference(representative) < merge_threshold {
                self.symbols.insert(column.clone(), idx as Symbol);
                return;
            }
        }
        let symbol = self.representatives.len() as Symbol;
        self.symbols.insert(column.clone(), symbol);
        self.representatives.push(column.clone());
    }

    /// Number of distinct clusters.
    pub fn cluster_count(&self) -> usize {
        self.representatives.len()
    }

    pub fn symbol_of(&self, column: &Column) -> Option<Symbol> {
        self.symbols.get(column).copied()
    }

    /// Encode a sequence as its symbol string.
    ///
    /// Every column must have been observed during [`ClusterMap::build`];
    /// anything else is an internal invariant violation, fatal to the pair.
    pub fn encode(&self, seq: &[Column]) -> Result<Vec<Symbol>, EvalError> {
        seq.iter()
            .map(|column| {
                self.symbol_of(column).ok_or_else(|| EvalError::Internal {
                    message: "column was never registered with the cluster map".to_string(),
                })
            })
            .collect()
    }
}

/// The subsequence of non-blank columns, order preserved.
pub fn non_blank(seq: &[Column]) -> Vec<Column> {
    seq.iter()
        .filter(|column| !column.is_blank())
        .cloned()
        .collect()
}
