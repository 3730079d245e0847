//! Text Extraction Adapter: decides supported file types by extension and
//! decodes raw upload bytes into text.

use thiserror::Error;

/// Upload size ceiling, enforced by callers before the adapter runs.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file type: .{0}")]
    Unsupported(String),

    #[error("Failed to parse file: {0}")]
    Failed(String),
}

/// Lowercased extension of a filename, if any.
pub fn extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

/// Primary document upload: plain text and PDF.
pub fn is_supported_document(filename: &str) -> bool {
    matches!(extension(filename).as_deref(), Some("pdf" | "txt" | "text"))
}

/// Extra-details upload recognizes PDF/TXT only.
pub fn is_supported_extra_detail(filename: &str) -> bool {
    matches!(extension(filename).as_deref(), Some("pdf" | "txt"))
}

/// Extracts text from upload bytes, dispatching on the filename extension.
///
/// Parse failures inside a supported type are surfaced as `ParseError::Failed`
/// so that upstream callers can choose to treat them as non-fatal: a broken
/// PDF must not block candidate creation.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ParseError> {
    match extension(filename).as_deref() {
        Some("pdf") => extract_pdf_text(bytes),
        Some("txt" | "text") => Ok(decode_text_bytes(bytes)),
        Some(other) => Err(ParseError::Unsupported(other.to_string())),
        None => Err(ParseError::Unsupported(String::new())),
    }
}

/// Per-page text joined by newlines, then trimmed.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ParseError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map(|text| text.trim().to_string())
        .map_err(|e| ParseError::Failed(format!("Failed to parse PDF: {e}")))
}

/// Decodes text bytes: UTF-8 first, then Latin-1. Latin-1 decoding is total
/// over all byte values, so this ladder cannot fail.
pub fn decode_text_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.trim().to_string(),
        Err(_) => bytes
            .iter()
            .map(|&b| b as char)
            .collect::<String>()
            .trim()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_document("resume.PDF"));
        assert!(is_supported_document("notes.Txt"));
        assert!(is_supported_document("notes.text"));
        assert!(!is_supported_document("photo.jpg"));
        assert!(!is_supported_document("no_extension"));
    }

    #[test]
    fn extra_detail_set_is_narrower() {
        assert!(is_supported_extra_detail("feedback.pdf"));
        assert!(is_supported_extra_detail("feedback.txt"));
        assert!(!is_supported_extra_detail("feedback.text"));
        assert!(!is_supported_extra_detail("feedback.docx"));
    }

    #[test]
    fn utf8_text_decodes_and_trims() {
        assert_eq!(decode_text_bytes("  hello world \n".as_bytes()), "hello world");
    }

    #[test]
    fn latin1_bytes_decode_without_loss() {
        // 0xE9 is 'é' in Latin-1 but invalid standalone UTF-8.
        let bytes = b"r\xE9sum\xE9";
        assert_eq!(decode_text_bytes(bytes), "résumé");
    }

    #[test]
    fn unsupported_extension_is_typed() {
        let err = extract_text(b"data", "image.png").unwrap_err();
        assert!(matches!(err, ParseError::Unsupported(_)));
    }

    #[test]
    fn broken_pdf_is_a_parse_failure_not_a_panic() {
        let err = extract_text(b"definitely not a pdf", "cv.pdf").unwrap_err();
        assert!(matches!(err, ParseError::Failed(_)));
    }

    #[test]
    fn txt_extraction_goes_through_decode() {
        let text = extract_text(b"plain contents", "notes.txt").unwrap();
        assert_eq!(text, "plain contents");
    }
}
