//! Opcode alignment of two symbol sequences.
//!
//! Classic block-diff semantics: greedily find the longest common contiguous
//! block (earliest on ties), recurse into the gaps on either side, merge
//! adjacent blocks, and emit an ordered span partition that covers both
//! sequences completely.

use std::ops::Range;

use rustc_hash::FxHashMap;

use crate::cluster::Symbol;

/// The alignment relationship one span describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeTag {
    /// Both ranges hold equal symbols.
    Equal,
    /// The `a` range was replaced by the `b` range.
    Replace,
    /// The `b` range is present only in the second sequence.
    Insert,
    /// The `a` range is present only in the first sequence.
    Delete,
}

/// A maximal run of one alignment relationship between the two sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeSpan {
    pub tag: OpcodeTag,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    a: usize,
    b: usize,
    len: usize,
}

/// Computes the opcode span partition for one pair of symbol sequences.
pub struct SequenceMatcher<'a> {
    a: &'a [Symbol],
    b: &'a [Symbol],
    b_index: FxHashMap<Symbol, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    pub fn new(a: &'a [Symbol], b: &'a [Symbol]) -> SequenceMatcher<'a> {
        let mut b_index: FxHashMap<Symbol, Vec<usize>> = FxHashMap::default();
        for (idx, symbol) in b.iter().enumerate() {
            b_index.entry(*symbol).or_default().push(idx);
        }
        SequenceMatcher { a, b, b_index }
    }

    /// Longest block of symbols appearing contiguously in both
    /// `a[alo..ahi]` and `b[blo..bhi]`; ties resolve to the earliest start
    /// in `a`, then in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let mut best = Block {
            a: alo,
            b: blo,
            len: 0,
        };
        // lengths[j] = length of the longest common block ending at the
        // previous `a` position and `b[j]`.
        let mut lengths: FxHashMap<usize, usize> = FxHashMap::default();
        for i in alo..ahi {
            let mut next_lengths: FxHashMap<usize, usize> = FxHashMap::default();
            if let Some(positions) = self.b_index.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let len = match j.checked_sub(1) {
                        Some(prev) => lengths.get(&prev).copied().unwrap_or(0) + 1,
                        None => 1,
                    };
                    next_lengths.insert(j, len);
                    if len > best.len {
                        best = Block {
                            a: i + 1 - len,
                            b: j + 1 - len,
                            len,
                        };
                    }
                }
            }
            lengths = next_lengths;
        }
        best
    }

    fn matching_blocks(&self) -> Vec<Block> {
        let mut pending = vec![(0usize, self.a.len(), 0usize, self.b.len())];
        let mut raw: Vec<Block> = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let block = self.longest_match(alo, ahi, blo, bhi);
            if block.len == 0 {
                continue;
            }
            if alo < block.a && blo < block.b {
                pending.push((alo, block.a, blo, block.b));
            }
            if block.a + block.len < ahi && block.b + block.len < bhi {
                pending.push((block.a + block.len, ahi, block.b + block.len, bhi));
            }
            raw.push(block);
        }
        raw.sort_unstable_by_key(|block| (block.a, block.b));

        let mut blocks: Vec<Block> = Vec::new();
        for block in raw {
            if let Some(last) = blocks.last_mut() {
                if last.a + last.len == block.a && last.b + last.len == block.b {
                    last.len += block.len;
                    continue;
                }
            }
            blocks.push(block);
        }
        // Zero-length sentinel so the opcode walk flushes the final gap.
        blocks.push(Block {
            a: self.a.len(),
            b: self.b.len(),
            len: 0,
        });
        blocks
    }

    /// The ordered span partition covering both sequences completely.
    pub fn opcodes(&self) -> Vec<OpcodeSpan> {
        let mut spans = Vec::new();
        let (mut i, mut j) = (0usize, 0usize);
        for block in self.matching_blocks() {
            let tag = match (i < block.a, j < block.b) {
                (true, true) => Some(OpcodeTag::Replace),
                (true, false) => Some(OpcodeTag::Delete),
                (false, true) => Some(OpcodeTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                spans.push(OpcodeSpan {
                    tag,
                    a: i..block.a,
                    b: j..block.b,
                });
            }
            if block.len > 0 {
                spans.push(OpcodeSpan {
                    tag: OpcodeTag::Equal,
                    a: block.a..block.a + block.len,
                    b: block.b..block.b + block.len,
                });
            }
            i = block.a + block.len;
            j = block.b + block.len;
        }
        spans
    }
}
