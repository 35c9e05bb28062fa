//! Language detection over the first page's OCR text.
//!
//! whatlang classifies text into ISO 639-3 codes, which happen to be the
//! naming scheme tesseract uses for its traineddata packs ("eng", "deu",
//! "spa", …), so the detected code can be handed to tesseract verbatim.
//! Detection runs once per job on the first page; the result is used for
//! every page. A handful of codes differ between the two schemes and are
//! mapped explicitly.

use crate::error::OcrPdfError;
use tracing::debug;

/// Detect the language of extracted text, returning the tesseract
/// traineddata code.
///
/// # Errors
/// [`OcrPdfError::LanguageDetection`] when the text is empty (nothing the
/// OCR pass could read) or the detector is not confident enough to commit
/// to a single language.
pub fn detect(text: &str) -> Result<String, OcrPdfError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(OcrPdfError::LanguageDetection {
            detail: "no text extracted from the first page".into(),
        });
    }

    let info = whatlang::detect(trimmed).ok_or_else(|| OcrPdfError::LanguageDetection {
        detail: "detector returned no result".into(),
    })?;

    if !info.is_reliable() {
        return Err(OcrPdfError::LanguageDetection {
            detail: format!(
                "no confident result (best guess {} at confidence {:.2})",
                info.lang().code(),
                info.confidence()
            ),
        });
    }

    let code = to_tesseract_code(info.lang());
    debug!(
        "detected language {} (confidence {:.2})",
        code,
        info.confidence()
    );
    Ok(code.to_string())
}

/// Map a whatlang language to tesseract's traineddata name.
///
/// Both use ISO 639-3, but tesseract diverges for a few scripts (e.g.
/// simplified Chinese is `chi_sim`, not `cmn`) and for languages where it
/// splits by script.
fn to_tesseract_code(lang: whatlang::Lang) -> &'static str {
    use whatlang::Lang;
    match lang {
        Lang::Cmn => "chi_sim",
        Lang::Nob => "nor",
        other => other.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_rejected() {
        let err = detect("").unwrap_err();
        assert!(matches!(err, OcrPdfError::LanguageDetection { .. }));
        let err = detect("   \n\t ").unwrap_err();
        assert!(matches!(err, OcrPdfError::LanguageDetection { .. }));
    }

    #[test]
    fn detects_english() {
        let text = "The quick brown fox jumps over the lazy dog. \
                    This invoice is payable within thirty days of receipt.";
        assert_eq!(detect(text).unwrap(), "eng");
    }

    #[test]
    fn detects_german() {
        let text = "Der schnelle braune Fuchs springt über den faulen Hund. \
                    Diese Rechnung ist innerhalb von dreißig Tagen zahlbar.";
        assert_eq!(detect(text).unwrap(), "deu");
    }

    #[test]
    fn chinese_maps_to_tesseract_pack_name() {
        assert_eq!(to_tesseract_code(whatlang::Lang::Cmn), "chi_sim");
    }

    #[test]
    fn gibberish_is_not_confident() {
        // Single repeated character gives the detector nothing to work with;
        // either outcome must be a LanguageDetection error, never a panic.
        if let Err(e) = detect("xqzt") {
            assert!(matches!(e, OcrPdfError::LanguageDetection { .. }));
        }
    }
}
