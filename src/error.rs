//! Error types for the ocrpdf library.
//!
//! Everything in here is **fatal**: the pipeline never retries and never
//! degrades to a partial result. An error raised anywhere inside a
//! conversion surfaces unchanged to the single top-level handler (the CLI's
//! `main`), which prints it and exits. The one deliberate non-error is the
//! zero-page document — that is a silent no-op reported through
//! [`crate::output::ConversionOutput::target_written`], not a variant here.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the ocrpdf library.
#[derive(Debug, Error)]
pub enum OcrPdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Source file was not found at the given path.
    #[error("source file not found: '{path}'\nCheck the path exists and is readable.")]
    SourceNotFound { path: PathBuf },

    /// Source extension is outside the allowed set (.pdf / .jpg).
    #[error("unsupported source extension '{extension}' — only .pdf and .jpg are accepted")]
    UnsupportedFormat { extension: String },

    /// A JPG source could not be decoded.
    #[error("failed to decode image '{path}': {detail}")]
    ImageDecodeFailed { path: PathBuf, detail: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium returned an error for a specific page.
    #[error("rasterisation failed for page {page}: {detail}")]
    RasterizeFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// No text could be extracted from the first page, or the language
    /// detector had no confident result to offer.
    #[error("language detection failed: {detail}\nIs the first page blank or too noisy to read?")]
    LanguageDetection { detail: String },

    /// The detected language has no installed tesseract traineddata.
    /// No fallback language is attempted.
    #[error(
        "language data for '{language}' is not installed (available: {installed:?})\n\
         Install the tesseract traineddata package for '{language}' and retry."
    )]
    MissingLanguageData {
        language: String,
        installed: Vec<String>,
    },

    /// The tesseract subprocess failed to launch or exited non-zero.
    #[error("tesseract failed on page {page}: {detail}")]
    OcrFailed { page: usize, detail: String },

    // ── System precondition errors (raised at startup) ────────────────────
    /// Host OS is not in the supported family.
    #[error("unsupported platform '{platform}' — this program only runs on macOS and Linux")]
    UnsupportedPlatform { platform: String },

    /// The tesseract binary is not discoverable on PATH.
    #[error("tesseract was not found on PATH\nInstall it (e.g. `apt install tesseract-ocr` or `brew install tesseract`).")]
    OcrEngineMissing,

    // ── Output errors ─────────────────────────────────────────────────────
    /// Appending or assembling the per-page PDFs failed.
    #[error("failed to merge page PDFs: {detail}")]
    MergeFailed { detail: String },

    /// Could not create or write the output PDF file.
    #[error("failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_display() {
        let e = OcrPdfError::UnsupportedFormat {
            extension: ".png".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains(".png"), "got: {msg}");
        assert!(msg.contains(".pdf"));
    }

    #[test]
    fn missing_language_data_display() {
        let e = OcrPdfError::MissingLanguageData {
            language: "deu".into(),
            installed: vec!["eng".into(), "osd".into()],
        };
        let msg = e.to_string();
        assert!(msg.contains("deu"));
        assert!(msg.contains("eng"));
    }

    #[test]
    fn language_detection_display() {
        let e = OcrPdfError::LanguageDetection {
            detail: "no text extracted".into(),
        };
        assert!(e.to_string().contains("no text extracted"));
    }

    #[test]
    fn output_write_failed_carries_source() {
        use std::error::Error as _;
        let e = OcrPdfError::OutputWriteFailed {
            path: PathBuf::from("/tmp/out.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/tmp/out.pdf"));
        assert!(e.source().is_some());
    }
}
