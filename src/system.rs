//! Host system preconditions and the default-application launcher.
//!
//! [`validate`] runs once at startup and fails fast: an unsupported OS or
//! a missing tesseract binary means the program never gets as far as
//! showing a prompt. [`open_with_default_app`] is the post-success
//! fire-and-forget hand-off to `open` / `xdg-open`.

use crate::config::ConversionConfig;
use crate::error::OcrPdfError;
use std::path::Path;
use tracing::{debug, warn};

/// Verify the host can run conversions at all.
///
/// # Errors
/// [`OcrPdfError::UnsupportedPlatform`] off macOS/Linux,
/// [`OcrPdfError::OcrEngineMissing`] when the OCR binary is not on PATH.
pub fn validate(config: &ConversionConfig) -> Result<(), OcrPdfError> {
    if !cfg!(any(target_os = "macos", target_os = "linux")) {
        return Err(OcrPdfError::UnsupportedPlatform {
            platform: std::env::consts::OS.to_string(),
        });
    }

    let binary = which::which(&config.ocr_binary).map_err(|_| OcrPdfError::OcrEngineMissing)?;
    debug!("found OCR engine at {}", binary.display());
    Ok(())
}

/// Hand a file to the OS default application.
///
/// Best-effort and unverified: a launch failure is logged at WARN and
/// otherwise ignored, matching the contract that this is a convenience,
/// not part of the conversion result.
pub fn open_with_default_app(path: &Path) {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    match std::process::Command::new(opener).arg(path).spawn() {
        Ok(_) => debug!("handed {} to {}", path.display(), opener),
        Err(e) => warn!("could not open {} with {}: {}", path.display(), opener, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_reports_missing_binary() {
        let config = ConversionConfig::builder()
            .ocr_binary("definitely-not-a-real-ocr-binary")
            .build()
            .unwrap();
        let err = validate(&config).unwrap_err();
        assert!(matches!(
            err,
            OcrPdfError::OcrEngineMissing | OcrPdfError::UnsupportedPlatform { .. }
        ));
    }

    #[test]
    fn validate_accepts_any_path_binary() {
        // `sh` exists on every supported platform; using it as the "OCR
        // binary" exercises the PATH lookup without needing tesseract.
        let config = ConversionConfig::builder().ocr_binary("sh").build().unwrap();
        if cfg!(any(target_os = "macos", target_os = "linux")) {
            assert!(validate(&config).is_ok());
        }
    }
}
