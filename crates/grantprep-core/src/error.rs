//! Error types for the grantprep-core library.

use thiserror::Error;

/// Main error type for the grantprep library.
#[derive(Error, Debug)]
pub enum GrantError {
    /// The input file is neither a PDF nor a DOCX document.
    #[error("unsupported document format: {0} (expected .pdf or .docx)")]
    UnsupportedFormat(String),

    /// Document text extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Feature assembly error.
    #[error("feature error: {0}")]
    Feature(#[from] FeatureError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while pulling raw text out of a document.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    PdfParse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    PdfText(String),

    /// The PDF is encrypted and cannot be opened with an empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The DOCX container could not be read.
    #[error("failed to open DOCX archive: {0}")]
    DocxArchive(String),

    /// The DOCX main document part is not valid XML.
    #[error("malformed DOCX document XML: {0}")]
    DocxXml(String),
}

/// Errors raised while assembling the feature matrix.
#[derive(Error, Debug)]
pub enum FeatureError {
    /// A configured column is not present in the input frame.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// A row does not have as many values as the frame has columns.
    #[error("row {row} has {actual} values, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Fitting was attempted on a batch without rows.
    #[error("cannot fit on an empty batch")]
    EmptyBatch,

    /// No term survived tokenization and stopword removal.
    #[error("empty vocabulary: documents contain only stop words or no text")]
    EmptyVocabulary,

    /// Fitted statistics do not match the width of the data being transformed.
    #[error("{stage} was fit on {expected} columns but got {actual}")]
    WidthMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Result type for the grantprep library.
pub type Result<T> = std::result::Result<T, GrantError>;
