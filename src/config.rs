//! Configuration for a conversion run.
//!
//! Every knob lives in [`ConversionConfig`], built via its builder so
//! callers set only what they care about and rely on documented defaults
//! for the rest. The allowed extension sets are fixed constants in
//! [`crate::fileinfo`], not configuration — the validity rules are part of
//! the contract, not a preference.

use crate::error::OcrPdfError;
use crate::progress::{NoopProgress, ProgressHandle};
use std::fmt;
use std::sync::Arc;

/// Configuration for one conversion.
///
/// # Example
/// ```rust
/// use ocrpdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .dpi(300)
///     .open_after(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rendering DPI used when rasterising each PDF page. Range: 72–600. Default: 300.
    ///
    /// Tesseract's accuracy drops off sharply below ~200 DPI on typical
    /// print sizes; 300 is its documented sweet spot. Higher values help
    /// small fonts at the cost of render time and scratch-file size.
    pub dpi: u32,

    /// Maximum rendered page dimension (width or height) in pixels. Default: 4000.
    ///
    /// A safety cap independent of DPI so an outsized page (posters,
    /// architectural drawings) cannot exhaust memory. Either dimension is
    /// capped, the other scales proportionally.
    pub max_rendered_pixels: u32,

    /// Preview bitmap resolution `(width, height)`. Default: `(500, 500)`.
    ///
    /// The preview is stretched to exactly this size, aspect ratio not
    /// preserved.
    pub preview_resolution: (u32, u32),

    /// Name of the OCR binary looked up on PATH. Default: `"tesseract"`.
    pub ocr_binary: String,

    /// Open the produced PDF with the OS default handler on success. Default: true.
    pub open_after: bool,

    /// Progress event sink. Default: a no-op implementation.
    pub progress: ProgressHandle,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            max_rendered_pixels: 4000,
            preview_resolution: (500, 500),
            ocr_binary: "tesseract".to_string(),
            open_after: true,
            progress: Arc::new(NoopProgress),
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("preview_resolution", &self.preview_resolution)
            .field("ocr_binary", &self.ocr_binary)
            .field("open_after", &self.open_after)
            .field("progress", &"<dyn ConvertProgress>")
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn preview_resolution(mut self, width: u32, height: u32) -> Self {
        self.config.preview_resolution = (width.max(1), height.max(1));
        self
    }

    pub fn ocr_binary(mut self, name: impl Into<String>) -> Self {
        self.config.ocr_binary = name.into();
        self
    }

    pub fn open_after(mut self, v: bool) -> Self {
        self.config.open_after = v;
        self
    }

    pub fn progress(mut self, sink: ProgressHandle) -> Self {
        self.config.progress = sink;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, OcrPdfError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(OcrPdfError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.ocr_binary.is_empty() {
            return Err(OcrPdfError::InvalidConfig(
                "OCR binary name must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let c = ConversionConfig::default();
        assert_eq!(c.dpi, 300);
        assert_eq!(c.preview_resolution, (500, 500));
        assert_eq!(c.ocr_binary, "tesseract");
        assert!(c.open_after);
    }

    #[test]
    fn builder_clamps_dpi() {
        let c = ConversionConfig::builder().dpi(9999).build().unwrap();
        assert_eq!(c.dpi, 600);
        let c = ConversionConfig::builder().dpi(10).build().unwrap();
        assert_eq!(c.dpi, 72);
    }

    #[test]
    fn builder_rejects_empty_binary() {
        let err = ConversionConfig::builder().ocr_binary("").build();
        assert!(matches!(err, Err(OcrPdfError::InvalidConfig(_))));
    }
}
