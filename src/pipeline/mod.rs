//! Pipeline stages for the image-to-searchable-PDF conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap an
//! implementation (say, the rendering backend) without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! source ──▶ rasterize ──▶ language ──▶ ocr ──▶ merge
//! (pdf/jpg)   (pdfium/     (whatlang    (tesseract  (lopdf append
//!              image)       on page 1)   pdf mode)   + write)
//! ```
//!
//! 1. [`rasterize`] — load every source page as a `DynamicImage`; pdfium
//!    work runs in `spawn_blocking` because it is not async-safe
//! 2. [`language`]  — OCR the first page to text, detect its language
//! 3. [`ocr`]       — drive the tesseract subprocess: language listing,
//!    plain-text extraction, and per-page searchable-PDF output
//! 4. [`merge`]     — accumulate the per-page PDF blobs and write the
//!    merged document
//!
//! Stages run strictly in order within one job; there is no page-level
//! concurrency and no retry anywhere.

pub mod language;
pub mod merge;
pub mod ocr;
pub mod rasterize;
