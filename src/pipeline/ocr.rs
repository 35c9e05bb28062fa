//! Tesseract subprocess driver.
//!
//! The OCR engine is an opaque external service reached through its CLI:
//! one invocation per operation, scratch PNGs in a [`tempfile::TempDir`],
//! stdout/stderr captured. Three operations are needed:
//!
//! - `tesseract --list-langs` — which traineddata packs are installed
//! - `tesseract <img> stdout` — plain-text extraction (detection input)
//! - `tesseract <img> <base> -l <lang> pdf` — one searchable single-page PDF
//!
//! PNG is used for the scratch images because it is lossless; JPEG
//! artefacts on rendered text measurably hurt recognition.

use crate::config::ConversionConfig;
use crate::error::OcrPdfError;
use image::DynamicImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

/// List the language codes with installed traineddata.
///
/// Tesseract prints a banner line ("List of available languages (N):")
/// before the codes; everything after it is one code per line. `osd` is a
/// script-detection pack, not a language, and is filtered out.
pub async fn installed_languages(config: &ConversionConfig) -> Result<Vec<String>, OcrPdfError> {
    let output = Command::new(&config.ocr_binary)
        .arg("--list-langs")
        .output()
        .await
        .map_err(|e| OcrPdfError::Internal(format!("failed to launch tesseract: {e}")))?;

    if !output.status.success() {
        return Err(OcrPdfError::Internal(format!(
            "tesseract --list-langs exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    // Older tesseract versions print the list on stderr.
    let listing = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };

    let langs: Vec<String> = listing
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.contains(' ') && !l.ends_with(':') && *l != "osd")
        .map(str::to_string)
        .collect();

    debug!("installed tesseract languages: {:?}", langs);
    Ok(langs)
}

/// Extract plain text from a page image using the engine's default
/// language pack. Used only to feed language detection.
pub async fn extract_text(
    image: &DynamicImage,
    config: &ConversionConfig,
) -> Result<String, OcrPdfError> {
    let scratch = Scratch::with_page(image, 1)?;

    let output = Command::new(&config.ocr_binary)
        .arg(&scratch.page_path)
        .arg("stdout")
        .output()
        .await
        .map_err(|e| OcrPdfError::OcrFailed {
            page: 1,
            detail: format!("failed to launch tesseract: {e}"),
        })?;

    if !output.status.success() {
        return Err(OcrPdfError::OcrFailed {
            page: 1,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Convert one page image into a single-page searchable PDF blob.
///
/// The recognised text goes into an invisible layer aligned over the page
/// image; `language` selects the traineddata for every page of the job.
/// `page` is 1-based and only used for error reporting.
pub async fn page_to_searchable_pdf(
    image: &DynamicImage,
    page: usize,
    language: &str,
    config: &ConversionConfig,
) -> Result<Vec<u8>, OcrPdfError> {
    let scratch = Scratch::with_page(image, page)?;
    let out_base = scratch.dir.path().join(format!("page_{page:04}"));

    let output = Command::new(&config.ocr_binary)
        .arg(&scratch.page_path)
        .arg(&out_base)
        .args(["-l", language, "pdf"])
        .output()
        .await
        .map_err(|e| OcrPdfError::OcrFailed {
            page,
            detail: format!("failed to launch tesseract: {e}"),
        })?;

    if !output.status.success() {
        return Err(OcrPdfError::OcrFailed {
            page,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    // tesseract appends ".pdf" to the output base itself
    let pdf_path = out_base.with_extension("pdf");
    tokio::fs::read(&pdf_path)
        .await
        .map_err(|e| OcrPdfError::OcrFailed {
            page,
            detail: format!("tesseract produced no readable output ({e})"),
        })
}

/// A scratch directory holding one PNG-encoded page for a tesseract call.
///
/// Dropping it removes the directory and everything tesseract wrote there.
struct Scratch {
    dir: TempDir,
    page_path: PathBuf,
}

impl Scratch {
    fn with_page(image: &DynamicImage, page: usize) -> Result<Self, OcrPdfError> {
        let dir = TempDir::new().map_err(|e| OcrPdfError::Internal(format!("tempdir: {e}")))?;
        let page_path = dir.path().join(format!("input_{page:04}.png"));
        write_png(image, &page_path).map_err(OcrPdfError::Internal)?;
        Ok(Self { dir, page_path })
    }
}

fn write_png(image: &DynamicImage, path: &Path) -> Result<(), String> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| format!("png encode: {e}"))?;
    std::fs::write(path, &buf).map_err(|e| format!("scratch write: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_writes_a_decodable_png() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            8,
            8,
            image::Rgb([0, 0, 0]),
        ));
        let scratch = Scratch::with_page(&img, 3).expect("scratch");
        assert!(scratch.page_path.ends_with("input_0003.png"));
        let reread = image::open(&scratch.page_path).expect("reread png");
        assert_eq!(reread.width(), 8);
    }

    #[test]
    fn scratch_cleans_up_on_drop() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            4,
            image::Rgb([0, 0, 0]),
        ));
        let scratch = Scratch::with_page(&img, 1).expect("scratch");
        let dir = scratch.dir.path().to_path_buf();
        drop(scratch);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn missing_binary_surfaces_as_error() {
        let config = ConversionConfig::builder()
            .ocr_binary("no-such-ocr-binary-on-path")
            .build()
            .unwrap();
        assert!(installed_languages(&config).await.is_err());

        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            4,
            image::Rgb([255, 255, 255]),
        ));
        let err = extract_text(&img, &config).await.unwrap_err();
        assert!(matches!(err, OcrPdfError::OcrFailed { page: 1, .. }));
    }
}
