//! Diagnostic raster: a per-pair visual classification of the alignment.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use thiserror::Error;

use crate::error_codes;

/// Column-major grid of alignment classes for one evaluated pair.
///
/// Values: `0` background agreement, `1` foreground agreement (including
/// tolerated spans reproduced unchanged), `2` foreground present only on the
/// deleted side, `3` foreground present only on the inserted side or a
/// conflicting replace bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRaster {
    columns: Vec<Vec<u8>>,
    height: u32,
}

impl DiagnosticRaster {
    pub(crate) fn from_columns(columns: Vec<Vec<u8>>, height: u32) -> DiagnosticRaster {
        debug_assert!(
            columns.iter().all(|column| column.len() == height as usize),
            "diagnostic columns must share the reconciled height"
        );
        DiagnosticRaster { columns, height }
    }

    pub fn width(&self) -> u32 {
        self.columns.len() as u32
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Class value at (column, row).
    pub fn value(&self, column: u32, row: u32) -> u8 {
        self.columns[column as usize][row as usize]
    }

    /// Render with the classic inspection palette: white agreement
    /// background, grey agreement foreground, blue delete-only, red
    /// insert-only/conflict.
    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| palette(self.value(x, y)))
    }

    /// Encode as PNG at `path`.
    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<(), DiagnosticWriteError> {
        let path = path.as_ref();
        self.to_rgb()
            .save(path)
            .map_err(|source| DiagnosticWriteError::Encode {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn palette(class: u8) -> Rgb<u8> {
    match class {
        0 => Rgb([255, 255, 255]),
        1 => Rgb([128, 128, 128]),
        2 => Rgb([0, 0, 255]),
        _ => Rgb([255, 0, 0]),
    }
}

/// Errors produced when writing a diagnostic raster to disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiagnosticWriteError {
    #[error(
        "[RDIFF_DIAG_001] cannot write diagnostic raster '{}': {source}. Suggestion: check that the output directory exists and is writable.",
        path.display()
    )]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl DiagnosticWriteError {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticWriteError::Encode { .. } => error_codes::DIAG_ENCODE,
        }
    }
}
