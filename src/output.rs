//! Conversion results and statistics.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The result of one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Where the searchable PDF was written.
    pub target: PathBuf,

    /// Whether a file actually exists at `target`.
    ///
    /// `false` exactly when the source yielded zero pages, in which case
    /// the conversion is a silent no-op. Callers that need an output file
    /// must check this, not just the `Ok`.
    pub target_written: bool,

    /// ISO 639-3 language code detected from the first page, as passed to
    /// tesseract for every page. Empty when `target_written` is false.
    pub language: String,

    /// Timing and size breakdown.
    pub stats: ConversionStats,
}

/// Timing and size statistics for one conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages found in the source.
    pub page_count: usize,

    /// Milliseconds spent rasterising the source.
    pub render_ms: u64,

    /// Milliseconds spent in tesseract (detection pass plus all pages).
    pub ocr_ms: u64,

    /// Wall-clock milliseconds for the whole run.
    pub total_ms: u64,
}

/// Lightweight source probe: what a conversion of this file would operate on.
///
/// Produced by [`crate::convert::inspect`] without running any OCR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// `.pdf` or `.jpg`.
    pub extension: String,

    /// Pages the rasteriser would produce (always 1 for a JPG).
    pub page_count: usize,
}
