//! Keyword-anchored section slicing.

use lazy_static::lazy_static;
use tracing::debug;

use super::keywords::{DEFAULT_SECTIONS, SectionPatterns};
use super::ParsedSections;
use crate::error::GrantError;
use crate::models::config::SectionConfig;

lazy_static! {
    static ref DEFAULT_PARSER: SectionParser =
        SectionParser::new(&DEFAULT_SECTIONS).expect("default section keywords compile");
}

/// Splits raw proposal text into labeled sections.
///
/// A section starts at the first match of any of its keywords and ends at
/// the next match of any keyword of any section, or at the end of the text.
/// Sections whose keywords collide on the same heading may overlap.
#[derive(Debug, Clone)]
pub struct SectionParser {
    patterns: SectionPatterns,
}

impl SectionParser {
    /// Compile a parser for a section table.
    pub fn new(config: &SectionConfig) -> crate::Result<Self> {
        let patterns = SectionPatterns::compile(config)
            .map_err(|e| GrantError::Config(format!("invalid section keyword: {}", e)))?;
        Ok(Self { patterns })
    }

    /// Parser for the built-in keyword table, compiled once per process.
    pub fn default_parser() -> &'static SectionParser {
        &DEFAULT_PARSER
    }

    /// Parse every section. Never fails; absent sections are empty.
    pub fn parse(&self, text: &str) -> ParsedSections {
        let boundaries: Vec<usize> = self
            .patterns
            .boundary
            .find_iter(text)
            .map(|m| m.start())
            .collect();

        let sections = self
            .patterns
            .sections
            .iter()
            .map(|(name, pattern)| {
                let body = match pattern.find(text) {
                    Some(m) => {
                        let start = m.start();
                        let end = boundaries
                            .iter()
                            .copied()
                            .filter(|&pos| pos > start)
                            .min()
                            .unwrap_or(text.len());
                        text[start..end].trim().to_string()
                    }
                    None => {
                        debug!("No keyword found for section '{}'", name);
                        String::new()
                    }
                };
                (name.clone(), body)
            })
            .collect::<Vec<_>>();

        ParsedSections::from(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::SectionKeywords;
    use pretty_assertions::assert_eq;

    const PROPOSAL: &str = "\
About the Organization
Founded in 2009, we run rural clinics.

Project Description
We will open three new clinics.

Track Record
Ten years of delivery.

Mission
Health for every village.
";

    #[test]
    fn test_parse_all_sections() {
        let sections = SectionParser::default_parser().parse(PROPOSAL);

        assert_eq!(
            sections.get("org_background"),
            Some("About the Organization\nFounded in 2009, we run rural clinics.")
        );
        assert_eq!(
            sections.get("project_description"),
            Some("Project Description\nWe will open three new clinics.")
        );
        assert_eq!(
            sections.get("track_record"),
            Some("Track Record\nTen years of delivery.")
        );
        assert_eq!(
            sections.get("mission_statement"),
            Some("Mission\nHealth for every village.")
        );
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let sections = SectionParser::default_parser().parse("Nothing relevant here at all.");
        assert_eq!(sections.len(), 4);
        for (_, body) in sections.iter() {
            assert_eq!(body, "");
        }
    }

    #[test]
    fn test_empty_text() {
        let sections = SectionParser::default_parser().parse("");
        assert_eq!(sections.get("mission_statement"), Some(""));
    }

    #[test]
    fn test_section_runs_to_end_of_text() {
        let sections = SectionParser::default_parser().parse("intro\nMandate:  to serve.  \n");
        assert_eq!(sections.get("mission_statement"), Some("Mandate:  to serve."));
    }

    #[test]
    fn test_first_match_is_start() {
        // "vision" appears before "mission", so the section starts there.
        let text = "Our vision and mission are simple.";
        let sections = SectionParser::default_parser().parse(text);
        assert_eq!(sections.get("mission_statement"), Some("vision and"));
    }

    #[test]
    fn test_keyword_inside_body_ends_section() {
        // "experience" belongs to track_record and cuts the project section short.
        let text = "The project builds on our experience in schools.";
        let sections = SectionParser::default_parser().parse(text);
        assert_eq!(sections.get("project_description"), Some("The project builds on our"));
        assert_eq!(sections.get("track_record"), Some("experience in schools."));
    }

    #[test]
    fn test_colliding_headings_overlap() {
        let config = SectionConfig {
            table: vec![
                SectionKeywords::new("first", &["summary"]),
                SectionKeywords::new("second", &["summary"]),
            ],
        };
        let parser = SectionParser::new(&config).unwrap();
        let sections = parser.parse("Summary: one. Summary: two.");
        assert_eq!(sections.get("first"), Some("Summary: one."));
        assert_eq!(sections.get("second"), Some("Summary: one."));
    }

    #[test]
    fn test_case_insensitive() {
        let sections = SectionParser::default_parser().parse("PAST PERFORMANCE: strong");
        assert_eq!(sections.get("track_record"), Some("PAST PERFORMANCE: strong"));
    }
}
