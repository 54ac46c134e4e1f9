//! Raw text extraction from proposal documents.

mod docx;
mod pdf;

pub use docx::DocxExtractor;
#[cfg(test)]
pub(crate) use docx::docx_with_body;
pub use pdf::PdfExtractor;

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{ExtractionError, GrantError};

/// Result type for extraction backends.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> std::result::Result<Self, GrantError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(GrantError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Backend that reads this format.
    pub fn extractor(self) -> Box<dyn TextExtractor> {
        match self {
            DocumentFormat::Pdf => Box::new(PdfExtractor::new()),
            DocumentFormat::Docx => Box::new(DocxExtractor::new()),
        }
    }
}

/// Trait for document text extraction backends.
pub trait TextExtractor: Send + Sync {
    /// Extract the raw text of a document held in memory.
    fn extract_text(&self, data: &[u8]) -> Result<String>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Raw text of one document.
#[derive(Debug, Clone)]
pub struct Document {
    pub format: DocumentFormat,
    pub text: String,
}

/// Read a PDF or DOCX file and return its raw text.
///
/// Any other extension fails with [`GrantError::UnsupportedFormat`] before
/// the file is opened.
pub fn extract_document(path: &Path, min_text_length: usize) -> crate::Result<Document> {
    let format = DocumentFormat::from_path(path)?;
    let data = std::fs::read(path)?;
    let extractor = format.extractor();

    let text = extractor.extract_text(&data)?;
    debug!(
        "Extracted {} chars from {} with {}",
        text.len(),
        path.display(),
        extractor.backend_name()
    );

    if text.trim().len() < min_text_length {
        warn!(
            "{} yielded only {} chars of text; it may be scanned or empty",
            path.display(),
            text.trim().len()
        );
    }

    Ok(Document { format, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("a/proposal.pdf")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("Proposal.DOCX")).unwrap(),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn test_unsupported_format() {
        for name in ["notes.txt", "proposal.doc", "no_extension"] {
            let err = DocumentFormat::from_path(&PathBuf::from(name)).unwrap_err();
            assert!(matches!(err, GrantError::UnsupportedFormat(_)), "{name}");
        }
    }

    #[test]
    fn test_extract_document_rejects_before_reading() {
        // The file does not exist; the extension check must fail first.
        let err = extract_document(&PathBuf::from("/nonexistent/file.odt"), 0).unwrap_err();
        assert!(matches!(err, GrantError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_extractor_backend_names() {
        assert_eq!(DocumentFormat::Pdf.extractor().backend_name(), "pdf-extract");
        assert_eq!(DocumentFormat::Docx.extractor().backend_name(), "docx-xml");
    }
}
