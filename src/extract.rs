//! Text extraction for uploaded documents.
//!
//! PDFs are the primary intake format; anything else is treated as plain
//! UTF-8 text so the CLI and tests can ingest fixtures without building a
//! PDF first.

use anyhow::{Context, Result};
use std::path::Path;

/// Extract the body text of a document from raw bytes.
///
/// `file_name` decides the format: a `.pdf` extension (case-insensitive)
/// routes through `pdf-extract`, everything else is decoded as UTF-8.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String> {
    if Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    {
        pdf_extract::extract_text_from_mem(bytes)
            .with_context(|| format!("PDF extraction failed for {}", file_name))
    } else {
        String::from_utf8(bytes.to_vec())
            .with_context(|| format!("{} is not valid UTF-8 text", file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passthrough() {
        let text = extract_text("notes.txt", b"The sky is blue.").unwrap();
        assert_eq!(text, "The sky is blue.");
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        assert!(extract_text("notes.txt", &[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn test_garbage_pdf_rejected() {
        assert!(extract_text("broken.pdf", b"not a pdf at all").is_err());
    }
}
