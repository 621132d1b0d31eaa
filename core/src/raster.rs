//! Binarized raster images and their column-major bit representation.
//!
//! A loaded image is reduced to a width x height bit matrix: a pixel whose
//! grayscale intensity is at or below the binarization threshold becomes
//! foreground (`1`), everything else background (`0`). The matrix is stored
//! as one [`Column`] per pixel column, left to right, because every later
//! stage of the pipeline (clustering, edit distance, span classification)
//! treats an image as a sequence of vertical slices.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error_codes;

const WORD_BITS: usize = 64;

/// One vertical slice of a binarized image: a fixed-height bit vector with
/// bit `r` set when row `r` is foreground.
///
/// Bits are packed into 64-bit words, least significant bit first. The
/// unused high bits of the last word are always zero, so equality, ordering,
/// and hashing of the word vector are exact comparisons of the column value;
/// no lossy signature stands between two columns and their comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Column {
    words: Vec<u64>,
    height: u32,
}

impl Column {
    /// An all-background column of the given height.
    pub fn blank(height: u32) -> Column {
        Column {
            words: vec![0; words_for(height)],
            height,
        }
    }

    /// Build a column from explicit bits, `bits[r]` = row `r`.
    pub fn from_bits(bits: &[bool]) -> Column {
        let mut column = Column::blank(bits.len() as u32);
        for (row, bit) in bits.iter().enumerate() {
            if *bit {
                column.set(row as u32);
            }
        }
        column
    }

    pub(crate) fn set(&mut self, row: u32) {
        debug_assert!(row < self.height, "row must lie within the column height");
        self.words[row as usize / WORD_BITS] |= 1u64 << (row as usize % WORD_BITS);
    }

    /// Bit at `row`; rows beyond the height read as background.
    pub fn get(&self, row: u32) -> bool {
        if row >= self.height {
            return false;
        }
        self.words[row as usize / WORD_BITS] >> (row as usize % WORD_BITS) & 1 == 1
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when every bit is background.
    pub fn is_blank(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Extend the column with zero rows up to `height`.
    pub fn pad_to(&mut self, height: u32) {
        debug_assert!(height >= self.height, "padding never shrinks a column");
        self.words.resize(words_for(height), 0);
        self.height = height;
    }

    /// Count of bit positions where `self` and `other` disagree.
    pub fn bit_difference(&self, other: &Column) -> u32 {
        let words = self.words.len().max(other.words.len());
        (0..words)
            .map(|idx| {
                let a = self.words.get(idx).copied().unwrap_or(0);
                let b = other.words.get(idx).copied().unwrap_or(0);
                (a ^ b).count_ones()
            })
            .sum()
    }
}

fn words_for(height: u32) -> usize {
    (height as usize).div_ceil(WORD_BITS)
}

/// A binarized raster: width x height bit matrix stored column-major.
///
/// Produced once per input file and immutable afterwards, except for height
/// padding applied by [`reconcile_heights`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    columns: Vec<Column>,
    height: u32,
}

impl BinaryImage {
    /// Load a raster from disk and binarize it.
    ///
    /// Any format the `image` crate decodes is accepted; the pixels are
    /// converted to 8-bit grayscale first. A pixel becomes foreground when
    /// its intensity is less than or equal to `threshold`.
    pub fn load(path: impl AsRef<Path>, threshold: u8) -> Result<BinaryImage, LoadError> {
        let path = path.as_ref();
        let dynamic = image::open(path).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(BinaryImage::from_luma(&dynamic.to_luma8(), threshold))
    }

    /// Binarize an in-memory 8-bit grayscale buffer.
    pub fn from_luma(luma: &image::GrayImage, threshold: u8) -> BinaryImage {
        let (width, height) = luma.dimensions();
        let mut columns = vec![Column::blank(height); width as usize];
        for (x, y, pixel) in luma.enumerate_pixels() {
            if pixel.0[0] <= threshold {
                columns[x as usize].set(y);
            }
        }
        BinaryImage { columns, height }
    }

    /// Build an image directly from column bit vectors, which must share one
    /// height.
    pub fn from_columns(columns: Vec<Column>) -> BinaryImage {
        let height = columns.first().map(|column| column.height()).unwrap_or(0);
        debug_assert!(
            columns.iter().all(|column| column.height() == height),
            "columns of one image must share a height"
        );
        BinaryImage { columns, height }
    }

    pub fn width(&self) -> u32 {
        self.columns.len() as u32
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    fn pad_height(&mut self, height: u32) {
        if self.height == height {
            return;
        }
        for column in &mut self.columns {
            column.pad_to(height);
        }
        self.height = height;
    }
}

/// Pad the shorter image's columns with zero rows so both images share one
/// height, and return that height.
///
/// Only the per-column bit-vector length changes; columns are never
/// reordered or resized horizontally.
pub fn reconcile_heights(a: &mut BinaryImage, b: &mut BinaryImage) -> u32 {
    let target = a.height.max(b.height);
    a.pad_height(target);
    b.pad_height(target);
    target
}

/// Errors produced when loading a raster from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error(
        "[RDIFF_LOAD_001] cannot read or decode raster '{}': {source}. Suggestion: check that the file exists and is a valid image.",
        path.display()
    )]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl LoadError {
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Decode { .. } => error_codes::LOAD_DECODE,
        }
    }

    /// Path of the file the failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Decode { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_from_str(pattern: &str) -> Column {
        let bits: Vec<bool> = pattern.chars().map(|c| c == '1').collect();
        Column::from_bits(&bits)
    }

    #[test]
    fn set_and_get_roundtrip_across_word_boundary() {
        let mut column = Column::blank(130);
        column.set(0);
        column.set(63);
        column.set(64);
        column.set(129);

        assert!(column.get(0));
        assert!(column.get(63));
        assert!(column.get(64));
        assert!(column.get(129));
        assert!(!column.get(1));
        assert!(!column.get(128));
        assert!(!column.get(500));
    }

    #[test]
    fn blank_detection() {
        assert!(Column::blank(17).is_blank());
        assert!(!column_from_str("00100").is_blank());
        assert!(Column::blank(0).is_blank());
    }

    #[test]
    fn padding_appends_zero_rows_only() {
        let mut column = column_from_str("101");
        column.pad_to(70);

        assert_eq!(column.height(), 70);
        assert!(column.get(0));
        assert!(!column.get(1));
        assert!(column.get(2));
        for row in 3..70 {
            assert!(!column.get(row), "padded row {} must be background", row);
        }
    }

    #[test]
    fn padding_preserves_equality_with_directly_built_column() {
        let mut padded = column_from_str("11");
        padded.pad_to(6);
        assert_eq!(padded, column_from_str("110000"));
    }

    #[test]
    fn bit_difference_counts_disagreements() {
        let a = column_from_str("10110");
        let b = column_from_str("00111");
        assert_eq!(a.bit_difference(&b), 2);
        assert_eq!(a.bit_difference(&a), 0);
        assert_eq!(a.bit_difference(&Column::blank(5)), 3);
    }

    #[test]
    fn binarization_threshold_is_inclusive() {
        let luma = image::GrayImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Luma([128u8])
            } else {
                image::Luma([129u8])
            }
        });
        let img = BinaryImage::from_luma(&luma, 128);

        assert!(img.columns()[0].get(0), "128 is foreground");
        assert!(!img.columns()[1].get(0), "129 is background");
    }

    #[test]
    fn from_luma_is_column_major_left_to_right() {
        // 3x2 image with a single dark pixel at (x=2, y=1).
        let luma = image::GrayImage::from_fn(3, 2, |x, y| {
            if x == 2 && y == 1 {
                image::Luma([0u8])
            } else {
                image::Luma([255u8])
            }
        });
        let img = BinaryImage::from_luma(&luma, 128);

        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 2);
        assert!(img.columns()[0].is_blank());
        assert!(img.columns()[1].is_blank());
        assert!(!img.columns()[2].get(0));
        assert!(img.columns()[2].get(1));
    }

    #[test]
    fn reconcile_pads_the_shorter_image() {
        let mut tall = BinaryImage::from_columns(vec![column_from_str("11111")]);
        let mut short = BinaryImage::from_columns(vec![column_from_str("10"), column_from_str("01")]);

        let height = reconcile_heights(&mut tall, &mut short);

        assert_eq!(height, 5);
        assert_eq!(tall.height(), 5);
        assert_eq!(short.height(), 5);
        assert_eq!(short.columns()[0], column_from_str("10000"));
        assert_eq!(short.columns()[1], column_from_str("01000"));
    }

    #[test]
    fn load_missing_file_is_a_decode_error() {
        let err = BinaryImage::load("/nonexistent/no-such-image.png", 128)
            .expect_err("missing file must fail to load");
        assert_eq!(err.code(), "RDIFF_LOAD_001");
        assert!(err.to_string().contains("no-such-image.png"));
    }
}
