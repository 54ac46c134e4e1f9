//! Keyword patterns that anchor proposal sections.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::models::config::SectionConfig;

lazy_static! {
    /// Default section table, as shipped in [`SectionConfig::default`].
    pub static ref DEFAULT_SECTIONS: SectionConfig = SectionConfig::default();
}

/// Case-insensitive alternation of literal keywords, in the given order.
///
/// Alternation is leftmost-first, so at a given position an earlier keyword
/// wins over a later one.
pub fn keyword_pattern<S: AsRef<str>>(keywords: &[S]) -> Result<Regex, regex::Error> {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&alternation).case_insensitive(true).build()
}

/// One pattern per section plus the boundary pattern over every keyword.
#[derive(Debug, Clone)]
pub struct SectionPatterns {
    pub(crate) sections: Vec<(String, Regex)>,
    pub(crate) boundary: Regex,
}

impl SectionPatterns {
    /// Compile the patterns of a section table.
    pub fn compile(config: &SectionConfig) -> Result<Self, regex::Error> {
        let sections = config
            .table
            .iter()
            .map(|s| Ok((s.name.clone(), keyword_pattern(&s.keywords)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let every_keyword: Vec<&str> = config
            .table
            .iter()
            .flat_map(|s| s.keywords.iter().map(String::as_str))
            .collect();
        let boundary = keyword_pattern(&every_keyword)?;

        Ok(Self { sections, boundary })
    }

    /// Section names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }
}
