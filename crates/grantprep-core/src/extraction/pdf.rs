//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{Result, TextExtractor};
use crate::error::ExtractionError;

/// PDF text extractor.
///
/// The document is opened with lopdf first so encrypted files with an empty
/// password can be decrypted before pdf-extract reads the text.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }

    /// Load the PDF and return bytes pdf-extract can read.
    fn prepare(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut doc =
            Document::load_mem(data).map_err(|e| ExtractionError::PdfParse(e.to_string()))?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(ExtractionError::NoPages);
        }
        debug!("Loaded PDF with {} pages", page_count);

        if !doc.is_encrypted() {
            return Ok(data.to_vec());
        }

        if doc.decrypt("").is_err() {
            return Err(ExtractionError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted = Vec::new();
        doc.save_to(&mut decrypted).map_err(|e| {
            ExtractionError::PdfParse(format!("failed to save decrypted PDF: {}", e))
        })?;
        Ok(decrypted)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, data: &[u8]) -> Result<String> {
        let readable = self.prepare(data)?;
        pdf_extract::extract_text_from_mem(&readable)
            .map_err(|e| ExtractionError::PdfText(e.to_string()))
    }

    fn backend_name(&self) -> &str {
        "pdf-extract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = PdfExtractor::new()
            .extract_text(b"this is not a pdf")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::PdfParse(_)));
    }
}
