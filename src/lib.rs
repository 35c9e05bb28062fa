//! # ocrpdf
//!
//! Turn a scanned PDF or JPG into a searchable PDF using the host's
//! Tesseract installation.
//!
//! ## Why this crate?
//!
//! Scanned documents are pictures: you cannot select, search, or index
//! their text. This crate rasterises each page, detects the document
//! language from the first page's OCR text, runs Tesseract's PDF output
//! mode per page to lay an invisible text layer over the page image, and
//! merges the results into one output document. The heavy lifting — image
//! decoding, text recognition, PDF generation — is all delegated: pdfium
//! renders, the `tesseract` binary recognises, lopdf assembles.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF / JPG
//!  │
//!  ├─ 1. Rasterize  every page → image (pdfium / image crate)
//!  ├─ 2. Early exit zero pages → silent no-op, nothing written
//!  ├─ 3. Detect     OCR page 1 to text, whatlang picks the language
//!  ├─ 4. Check      the traineddata for that language is installed
//!  ├─ 5. OCR        each page → single-page searchable PDF (tesseract)
//!  └─ 6. Merge      append in page order, write the target (lopdf)
//! ```
//!
//! Progress is reported through an injectable callback: the step budget is
//! `3 + page_count` and the counter advances once per step above (step 3
//! counts twice: extraction, then detection; step 1 never counts).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocrpdf::{convert, ConversionConfig, FileDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = FileDescriptor::parse("invoice.jpg");
//!     let target = FileDescriptor::parse("invoice_ocr.pdf");
//!     let output = convert(&source, &target, &ConversionConfig::default()).await?;
//!     if output.target_written {
//!         println!("wrote {} ({} pages, lang {})",
//!             output.target.display(), output.stats.page_count, output.language);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ocrpdf` binary (clap + indicatif + dialoguer) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! ocrpdf = { version = "0.3", default-features = false }
//! ```
//!
//! ## Requirements
//!
//! macOS or Linux, with `tesseract` on PATH and the traineddata for your
//! documents' language installed. [`system::validate`] checks both up
//! front.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod fileinfo;
pub mod output;
pub mod pipeline;
pub mod preview;
pub mod progress;
pub mod state;
pub mod system;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_sync, inspect};
pub use error::OcrPdfError;
pub use fileinfo::{FileDescriptor, SOURCE_EXTENSIONS, TARGET_EXTENSIONS};
pub use output::{ConversionOutput, ConversionStats, SourceInfo};
pub use progress::{ConvertProgress, NoopProgress, ProgressHandle};
pub use state::{Effect, Selection, SelectionPhase, UiEvent};
