//! Configuration structures for the preprocessing pipeline.

use serde::{Deserialize, Serialize};

use crate::models::record::{NUMERIC_FIELDS, SECTION_FIELDS};

/// Main configuration for the grantprep pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrantConfig {
    /// Document extraction configuration.
    pub extraction: ExtractionConfig,

    /// Section keyword table.
    pub sections: SectionConfig,

    /// Numeric cleaning configuration.
    pub numeric: NumericConfig,

    /// Narrative text cleaning configuration.
    pub text: TextConfig,

    /// Feature assembly configuration.
    pub features: FeatureConfig,
}

/// Document extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Extracted text shorter than this is reported as a likely scan or empty document.
    pub min_text_length: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { min_text_length: 50 }
    }
}

/// Keywords that anchor one narrative section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionKeywords {
    /// Section (column) name.
    pub name: String,
    /// Case-insensitive keyword alternatives, tried in order.
    pub keywords: Vec<String>,
}

impl SectionKeywords {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Section keyword table, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    pub table: Vec<SectionKeywords>,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            table: vec![
                SectionKeywords::new(
                    SECTION_FIELDS[0],
                    &["background", "organizational background", "about the organization"],
                ),
                SectionKeywords::new(
                    SECTION_FIELDS[1],
                    &["project description", "the project", "project summary"],
                ),
                SectionKeywords::new(
                    SECTION_FIELDS[2],
                    &["track record", "experience", "past performance"],
                ),
                SectionKeywords::new(SECTION_FIELDS[3], &["mission", "vision", "mandate"]),
            ],
        }
    }
}

/// Numeric cleaning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericConfig {
    /// Currency names removed from monetary text (matched lowercase, as substrings).
    pub currency_words: Vec<String>,

    /// Currency symbols removed from monetary text.
    pub currency_symbols: Vec<char>,

    /// Approximation markers replaced by a space, tried in order.
    pub approximation_tokens: Vec<String>,
}

impl Default for NumericConfig {
    fn default() -> Self {
        let words = [
            "kes", "ksh", "kshs", "usd", "eur", "gbp", "ugx", "tzs", "zar", "cfa", "etb", "ngn",
            "rwf", "cad", "aud", "inr", "yen", "jpy",
        ];
        Self {
            currency_words: words.iter().map(|w| w.to_string()).collect(),
            currency_symbols: vec!['$', '€', '£', '¥'],
            approximation_tokens: ["approx", "est", "estimated"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

/// Narrative text cleaning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Stopwords dropped in addition to the built-in English list.
    pub extra_stopwords: Vec<String>,

    /// Name of the column holding the combined cleaned text.
    pub combined_column: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            extra_stopwords: Vec::new(),
            combined_column: "combined_text".to_string(),
        }
    }
}

/// How the numeric block treats values missing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingNumeric {
    /// Leave gaps for the median imputer.
    Impute,
    /// Fill gaps with zero before imputation.
    Zero,
}

/// Feature assembly configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Numeric columns, in output order.
    pub numeric_columns: Vec<String>,

    /// Narrative columns combined into the TF-IDF document, in order.
    pub text_columns: Vec<String>,

    /// Maximum TF-IDF vocabulary size.
    pub max_features: usize,

    /// Inclusive n-gram range for TF-IDF terms.
    pub ngram_range: (usize, usize),

    /// Treatment of missing numeric values.
    pub missing_numeric: MissingNumeric,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            numeric_columns: NUMERIC_FIELDS.iter().map(|c| c.to_string()).collect(),
            text_columns: SECTION_FIELDS.iter().map(|c| c.to_string()).collect(),
            max_features: 5000,
            ngram_range: (1, 2),
            missing_numeric: MissingNumeric::Impute,
        }
    }
}

impl GrantConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check settings that would otherwise fail deep inside the pipeline.
    pub fn validate(&self) -> crate::Result<()> {
        let (min_n, max_n) = self.features.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(crate::GrantError::Config(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }
        if self.features.max_features == 0 {
            return Err(crate::GrantError::Config(
                "max_features must be at least 1".to_string(),
            ));
        }
        if self.features.text_columns.is_empty() {
            return Err(crate::GrantError::Config(
                "at least one text column is required".to_string(),
            ));
        }
        if let Some(section) = self.sections.table.iter().find(|s| s.keywords.is_empty()) {
            return Err(crate::GrantError::Config(format!(
                "section '{}' has no keywords",
                section.name
            )));
        }
        if let Some(section) = self
            .sections
            .table
            .iter()
            .find(|s| s.keywords.iter().any(|k| k.trim().is_empty()))
        {
            return Err(crate::GrantError::Config(format!(
                "section '{}' has an empty keyword",
                section.name
            )));
        }
        Ok(())
    }
}
