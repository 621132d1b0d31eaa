//! Span classification: turns an opcode alignment into a match verdict and,
//! on request, a diagnostic raster.
//!
//! One parameterized routine serves both verdicts: the strict pass runs it
//! over the full clustered sequences, the blank-tolerant pass over the
//! non-blank subsequences. Only the inputs differ; the policy is shared.

use crate::cluster::Symbol;
use crate::config::EvalConfig;
use crate::diagnostic::DiagnosticRaster;
use crate::matcher::{OpcodeTag, SequenceMatcher};
use crate::raster::Column;

/// Verdict of one classification pass over a pair of symbol strings.
#[derive(Debug)]
pub(crate) struct PassOutcome {
    pub(crate) matched: bool,
    pub(crate) raster: Option<DiagnosticRaster>,
}

/// Align two clustered symbol strings and classify the spans.
///
/// `exact1`/`exact2` are the exact columns the symbols were derived from and
/// must be index-aligned with `symbols1`/`symbols2`; they feed the
/// diagnostic raster. A span is tolerated when it is `Equal` or both of its
/// ranges cover fewer than `span_tolerance` symbols; any other span breaks
/// the match.
pub(crate) fn classify_pass(
    symbols1: &[Symbol],
    symbols2: &[Symbol],
    exact1: &[Column],
    exact2: &[Column],
    height: u32,
    config: &EvalConfig,
    want_raster: bool,
) -> PassOutcome {
    debug_assert_eq!(symbols1.len(), exact1.len(), "symbols must mirror columns");
    debug_assert_eq!(symbols2.len(), exact2.len(), "symbols must mirror columns");

    let tolerance = config.span_tolerance as usize;
    let matcher = SequenceMatcher::new(symbols1, symbols2);
    let mut matched = true;
    let mut columns: Vec<Vec<u8>> = Vec::new();

    for span in matcher.opcodes() {
        let tolerated = span.tag == OpcodeTag::Equal
            || (span.a.len() < tolerance && span.b.len() < tolerance);

        if tolerated {
            if want_raster {
                for idx in span.a.clone() {
                    columns.push(plain_column(&exact1[idx], height));
                }
            }
            continue;
        }

        matched = false;
        if !want_raster {
            continue;
        }

        match span.tag {
            OpcodeTag::Replace => {
                let left = &exact1[span.a.clone()];
                let right = &exact2[span.b.clone()];
                let blank = Column::blank(height);
                for idx in 0..left.len().max(right.len()) {
                    let a = left.get(idx).unwrap_or(&blank);
                    let b = right.get(idx).unwrap_or(&blank);
                    columns.push(conflict_column(a, b, height));
                }
            }
            OpcodeTag::Insert => {
                for idx in span.b.clone() {
                    columns.push(scaled_column(&exact2[idx], height, 3));
                }
            }
            OpcodeTag::Delete => {
                for idx in span.a.clone() {
                    columns.push(scaled_column(&exact1[idx], height, 2));
                }
            }
            OpcodeTag::Equal => {}
        }
    }

    PassOutcome {
        matched,
        raster: want_raster.then(|| DiagnosticRaster::from_columns(columns, height)),
    }
}

fn plain_column(column: &Column, height: u32) -> Vec<u8> {
    (0..height).map(|row| u8::from(column.get(row))).collect()
}

fn scaled_column(column: &Column, height: u32, factor: u8) -> Vec<u8> {
    (0..height)
        .map(|row| u8::from(column.get(row)) * factor)
        .collect()
}

fn conflict_column(a: &Column, b: &Column, height: u32) -> Vec<u8> {
    (0..height)
        .map(|row| {
            let r1 = u8::from(a.get(row));
            let r2 = u8::from(b.get(row));
            if r1 == r2 { r1 } else { 3 * r1 + 2 * r2 }
        })
        .collect()
}
