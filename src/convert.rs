//! Top-level conversion entry points.
//!
//! [`convert`] runs the whole pipeline for one job: rasterize, detect the
//! language from the first page, check the traineddata is installed, OCR
//! every page into a single-page searchable PDF, merge, write. One job at
//! a time, pages strictly in order, no retries — any error propagates
//! unchanged to the caller.
//!
//! ## The zero-page no-op
//!
//! A source that yields no pages returns `Ok` with
//! [`ConversionOutput::target_written`] set to `false` and **no file
//! written**. Callers that need an output file must check the flag.

use crate::config::ConversionConfig;
use crate::error::OcrPdfError;
use crate::fileinfo::{FileDescriptor, SOURCE_EXTENSIONS};
use crate::output::{ConversionOutput, ConversionStats, SourceInfo};
use crate::pipeline::{language, merge::PdfMerger, ocr, rasterize};
use crate::progress::ProgressState;
use std::time::Instant;
use tracing::{info, warn};

/// Convert a source file (PDF or JPG) into a searchable PDF at `target`.
///
/// # Errors
/// Fails fast on the first problem: unsupported extension, unreadable
/// source, undetectable language, missing traineddata, OCR or merge
/// failure. No partial output file is left behind on failure — the target
/// is written once, at the end.
pub async fn convert(
    source: &FileDescriptor,
    target: &FileDescriptor,
    config: &ConversionConfig,
) -> Result<ConversionOutput, OcrPdfError> {
    let total_start = Instant::now();
    let target_path = target.path();
    info!("starting conversion: {} → {}", source, target);

    // ── Step 1: rasterize every page ─────────────────────────────────────
    let render_start = Instant::now();
    let pages = rasterize::load_pages(source, config).await?;
    let render_ms = render_start.elapsed().as_millis() as u64;

    // ── Step 2: zero pages → silent no-op ────────────────────────────────
    if pages.is_empty() {
        warn!("source produced no pages; nothing written");
        return Ok(ConversionOutput {
            target: target_path,
            target_written: false,
            language: String::new(),
            stats: ConversionStats {
                page_count: 0,
                render_ms,
                ocr_ms: 0,
                total_ms: total_start.elapsed().as_millis() as u64,
            },
        });
    }

    // The step budget exists only once the page count is known:
    // extraction + detection + one per page + merge.
    let mut progress = ProgressState::begin(3 + pages.len(), config.progress.clone());

    // ── Step 3: detect the document language from the first page ─────────
    let ocr_start = Instant::now();
    let first_page_text = ocr::extract_text(&pages[0], config).await?;
    progress.step_forward("extracting text data from image");

    let detected = language::detect(&first_page_text)?;
    progress.step_forward("detecting language");
    info!("detected language: {}", detected);

    // ── Step 4: the traineddata for that language must be installed ──────
    let installed = ocr::installed_languages(config).await?;
    if !installed.iter().any(|l| l == &detected) {
        return Err(OcrPdfError::MissingLanguageData {
            language: detected,
            installed,
        });
    }

    // ── Step 5: OCR each page into a single-page searchable PDF ──────────
    let mut merger = PdfMerger::new();
    for (i, page) in pages.iter().enumerate() {
        let blob = ocr::page_to_searchable_pdf(page, i + 1, &detected, config).await?;
        merger.append(blob);
        progress.step_forward(format!("converting page {} to pdf", i + 1));
    }
    let ocr_ms = ocr_start.elapsed().as_millis() as u64;

    // ── Step 6: merge in page order and write the target ─────────────────
    merger.write_to(&target_path)?;
    progress.step_forward("merging results into final pdf");
    progress.finish();

    let stats = ConversionStats {
        page_count: pages.len(),
        render_ms,
        ocr_ms,
        total_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "conversion complete: {} pages in {}ms",
        stats.page_count, stats.total_ms
    );

    Ok(ConversionOutput {
        target: target_path,
        target_written: true,
        language: detected,
        stats,
    })
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    source: &FileDescriptor,
    target: &FileDescriptor,
    config: &ConversionConfig,
) -> Result<ConversionOutput, OcrPdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| OcrPdfError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(convert(source, target, config))
}

/// Probe a source without converting it: extension check plus page count.
///
/// Does not touch tesseract, so it works before [`crate::system::validate`].
pub async fn inspect(source: &FileDescriptor) -> Result<SourceInfo, OcrPdfError> {
    if !source.is_valid(SOURCE_EXTENSIONS) {
        return Err(OcrPdfError::UnsupportedFormat {
            extension: source.ext().to_string(),
        });
    }
    let page_count = rasterize::count_pages(source).await?;
    Ok(SourceInfo {
        extension: source.ext().to_string(),
        page_count,
    })
}
