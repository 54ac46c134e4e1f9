//! Narrative section extraction.

pub mod keywords;
mod parser;

pub use keywords::{DEFAULT_SECTIONS, SectionPatterns, keyword_pattern};
pub use parser::SectionParser;

/// Section name to section text, in keyword-table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSections {
    sections: Vec<(String, String)>,
}

impl ParsedSections {
    /// Text of section `name`, if the table defines it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, body)| body.as_str())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections
            .iter()
            .map(|(name, body)| (name.as_str(), body.as_str()))
    }
}

impl From<Vec<(String, String)>> for ParsedSections {
    fn from(sections: Vec<(String, String)>) -> Self {
        Self { sections }
    }
}
