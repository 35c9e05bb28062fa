//! Source rasterisation: every page of the source as a `DynamicImage`.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto the blocking
//! pool so the runtime's worker threads never stall during CPU-heavy
//! rendering.
//!
//! ## Why cap pixels, not just DPI?
//!
//! Page sizes vary wildly: an A0 poster rendered at 300 DPI would produce
//! a huge bitmap. `max_rendered_pixels` caps the longest edge regardless of
//! physical size, keeping memory bounded without hurting OCR accuracy on
//! normal pages.

use crate::config::ConversionConfig;
use crate::error::OcrPdfError;
use crate::fileinfo::FileDescriptor;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load every page of the source as an image, in page order.
///
/// `.pdf` sources are rendered via pdfium; a `.jpg` source is decoded as
/// the single page. Any other extension fails with
/// [`OcrPdfError::UnsupportedFormat`].
pub async fn load_pages(
    source: &FileDescriptor,
    config: &ConversionConfig,
) -> Result<Vec<DynamicImage>, OcrPdfError> {
    let path = source.path();
    if !path.exists() {
        return Err(OcrPdfError::SourceNotFound { path });
    }

    match source.ext() {
        ".pdf" => render_pdf_pages(path, config, None).await,
        ".jpg" => {
            let img = decode_jpg(&path).await?;
            Ok(vec![img])
        }
        other => Err(OcrPdfError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

/// Load only the first page (used by the preview and `inspect`).
pub async fn load_first_page(
    source: &FileDescriptor,
    config: &ConversionConfig,
) -> Result<Option<DynamicImage>, OcrPdfError> {
    let path = source.path();
    if !path.exists() {
        return Err(OcrPdfError::SourceNotFound { path });
    }

    match source.ext() {
        ".pdf" => Ok(render_pdf_pages(path, config, Some(1)).await?.pop()),
        ".jpg" => Ok(Some(decode_jpg(&path).await?)),
        other => Err(OcrPdfError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

/// Count the pages a conversion of this source would process, without
/// rendering any of them.
pub async fn count_pages(source: &FileDescriptor) -> Result<usize, OcrPdfError> {
    let path = source.path();
    if !path.exists() {
        return Err(OcrPdfError::SourceNotFound { path });
    }

    match source.ext() {
        ".pdf" => {
            tokio::task::spawn_blocking(move || -> Result<usize, OcrPdfError> {
                let pdfium = Pdfium::default();
                let document =
                    pdfium
                        .load_pdf_from_file(&path, None)
                        .map_err(|e| OcrPdfError::CorruptPdf {
                            path: path.clone(),
                            detail: format!("{e:?}"),
                        })?;
                Ok(document.pages().len() as usize)
            })
            .await
            .map_err(|e| OcrPdfError::Internal(format!("page-count task panicked: {e}")))?
        }
        ".jpg" => Ok(1),
        other => Err(OcrPdfError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

/// Render up to `limit` pages of a PDF (all pages when `None`).
async fn render_pdf_pages(
    path: PathBuf,
    config: &ConversionConfig,
    limit: Option<usize>,
) -> Result<Vec<DynamicImage>, OcrPdfError> {
    let dpi = config.dpi;
    let max_pixels = config.max_rendered_pixels;

    tokio::task::spawn_blocking(move || render_pdf_pages_blocking(&path, dpi, max_pixels, limit))
        .await
        .map_err(|e| OcrPdfError::Internal(format!("render task panicked: {e}")))?
}

/// Blocking implementation of PDF page rendering.
fn render_pdf_pages_blocking(
    pdf_path: &Path,
    dpi: u32,
    max_pixels: u32,
    limit: Option<usize>,
) -> Result<Vec<DynamicImage>, OcrPdfError> {
    let pdfium = Pdfium::default();

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| OcrPdfError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    let total = pages.len() as usize;
    let wanted = limit.map_or(total, |l| l.min(total));
    info!("PDF loaded: {} pages ({} to render)", total, wanted);

    // 1pt = 1/72in, so width_pt * dpi / 72 is the pixel width at `dpi`.
    let scale = dpi as f32 / 72.0;

    let mut results = Vec::with_capacity(wanted);
    for (idx, page) in pages.iter().take(wanted).enumerate() {
        let target_width = ((page.width().value * scale) as u32).min(max_pixels);

        let render_config = PdfRenderConfig::new()
            .set_target_width(target_width as i32)
            .set_maximum_height(max_pixels as i32);

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| OcrPdfError::RasterizeFailed {
                    page: idx + 1,
                    detail: format!("{e:?}"),
                })?;

        let image = bitmap.as_image();
        debug!(
            "rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );
        results.push(image);
    }

    Ok(results)
}

/// Decode a JPG source as the single page image.
async fn decode_jpg(path: &Path) -> Result<DynamicImage, OcrPdfError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        image::open(&path).map_err(|e| OcrPdfError::ImageDecodeFailed {
            path: path.clone(),
            detail: e.to_string(),
        })
    })
    .await
    .map_err(|e| OcrPdfError::Internal(format!("decode task panicked: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_jpg(dir: &tempfile::TempDir, name: &str) -> FileDescriptor {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            64,
            64,
            image::Rgb([255, 255, 255]),
        ));
        let path = dir.path().join(name);
        img.save(&path).expect("write test jpg");
        FileDescriptor::parse(path.to_str().unwrap())
    }

    #[tokio::test]
    async fn jpg_source_is_a_single_page() {
        let dir = tempfile::tempdir().unwrap();
        let fd = write_jpg(&dir, "scan.jpg");
        let config = ConversionConfig::default();

        let pages = load_pages(&fd, &config).await.expect("load jpg");
        assert_eq!(pages.len(), 1);
        assert_eq!(count_pages(&fd).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"not an image")
            .unwrap();
        let fd = FileDescriptor::parse(path.to_str().unwrap());

        let err = load_pages(&fd, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OcrPdfError::UnsupportedFormat { ref extension } if extension == ".png"
        ));
    }

    #[tokio::test]
    async fn missing_source_is_reported() {
        let fd = FileDescriptor::parse("/nonexistent/scan.jpg");
        let err = load_pages(&fd, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OcrPdfError::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn corrupt_jpg_fails_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not jpeg bytes").unwrap();
        let fd = FileDescriptor::parse(path.to_str().unwrap());

        let err = load_pages(&fd, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OcrPdfError::ImageDecodeFailed { .. }));
    }
}
