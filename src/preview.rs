//! Source preview: a fixed-resolution PNG of the first page.
//!
//! Shown as soon as a valid source is selected, before any conversion
//! starts. PDF sources render only their first page; image sources decode
//! directly. The bitmap is stretched to exactly the configured resolution
//! (Lanczos3 smoothing), matching the fixed preview pane it fills.
//! Failures propagate — a corrupt file should be flagged here rather than
//! mid-conversion.

use crate::config::ConversionConfig;
use crate::error::OcrPdfError;
use crate::fileinfo::FileDescriptor;
use crate::pipeline::rasterize;
use image::imageops::FilterType;
use std::io::Cursor;

/// Produce the preview PNG bytes for a validated source descriptor.
///
/// Returns `None` when a PDF source has no pages to preview.
pub async fn generate(
    source: &FileDescriptor,
    config: &ConversionConfig,
) -> Result<Option<Vec<u8>>, OcrPdfError> {
    let Some(page) = rasterize::load_first_page(source, config).await? else {
        return Ok(None);
    };

    let (width, height) = config.preview_resolution;
    let resized = page.resize_exact(width, height, FilterType::Lanczos3);

    let mut buf = Vec::new();
    resized
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| OcrPdfError::Internal(format!("preview encode: {e}")))?;
    Ok(Some(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn jpg_preview_is_resized_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.jpg");
        image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            640,
            480,
            image::Rgb([128, 128, 128]),
        ))
        .save(&path)
        .unwrap();

        let fd = FileDescriptor::parse(path.to_str().unwrap());
        let config = ConversionConfig::builder()
            .preview_resolution(100, 100)
            .build()
            .unwrap();

        let bytes = generate(&fd, &config)
            .await
            .expect("preview")
            .expect("one page");
        let decoded = image::load_from_memory(&bytes).expect("png decodes");
        // stretched to exactly the configured resolution
        assert_eq!((decoded.width(), decoded.height()), (100, 100));
    }

    #[tokio::test]
    async fn preview_of_missing_file_propagates() {
        let fd = FileDescriptor::parse("/nope/missing.jpg");
        let err = generate(&fd, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OcrPdfError::SourceNotFound { .. }));
    }
}
