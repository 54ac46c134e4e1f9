//! Document to record: extraction followed by section parsing.

use std::path::Path;

use tracing::debug;

use crate::extraction::extract_document;
use crate::models::config::GrantConfig;
use crate::models::record::ProposalRecord;
use crate::sections::SectionParser;

/// Turns proposal documents into [`ProposalRecord`]s.
///
/// Holds the compiled section patterns, so one instance can be shared
/// across many documents (and threads).
#[derive(Debug, Clone)]
pub struct ProposalExtractor {
    parser: SectionParser,
    min_text_length: usize,
}

impl ProposalExtractor {
    pub fn new(config: &GrantConfig) -> crate::Result<Self> {
        Ok(Self {
            parser: SectionParser::new(&config.sections)?,
            min_text_length: config.extraction.min_text_length,
        })
    }

    /// Extract one document. Numeric fields are zero placeholders.
    pub fn extract(&self, path: &Path) -> crate::Result<ProposalRecord> {
        let document = extract_document(path, self.min_text_length)?;
        let record = self.record_from_text(&document.text);
        debug!("Built record for {}", path.display());
        Ok(record)
    }

    /// Build a record from already extracted text.
    pub fn record_from_text(&self, text: &str) -> ProposalRecord {
        ProposalRecord::from_sections(&self.parser.parse(text))
    }
}

/// Extract a single proposal with `config`.
pub fn extract_proposal(path: &Path, config: &GrantConfig) -> crate::Result<ProposalRecord> {
    ProposalExtractor::new(config)?.extract(path)
}
