//! Narrative text normalization.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::stopwords;
use crate::error::FeatureError;
use crate::models::config::TextConfig;
use crate::models::frame::{Frame, FrameTransform, Value};

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-zA-Z0-9\s]").unwrap();
}

/// Strips punctuation, lowercases and removes stopwords from narrative columns.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    columns: Vec<String>,
    stopwords: HashSet<String>,
    combined_column: String,
}

impl TextCleaner {
    /// Create a cleaner for `columns`, in combination order.
    pub fn new(config: &TextConfig, columns: &[String]) -> Self {
        Self {
            columns: columns.to_vec(),
            stopwords: stopwords::english_with(&config.extra_stopwords),
            combined_column: config.combined_column.clone(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Name of the combined output column.
    pub fn combined_column(&self) -> &str {
        &self.combined_column
    }

    /// Clean one string. Word boundaries survive punctuation removal.
    pub fn clean_text(&self, text: &str) -> String {
        let stripped = NON_ALPHANUMERIC.replace_all(text, " ").to_lowercase();
        stripped
            .split_whitespace()
            .filter(|token| !self.stopwords.contains(*token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Clean one cell; missing cells become empty text.
    pub fn clean_value(&self, value: &Value) -> String {
        match value {
            Value::Missing => String::new(),
            Value::Number(n) => self.clean_text(&n.to_string()),
            Value::Text(s) => self.clean_text(s),
        }
    }

    /// Clean each configured column in place.
    pub fn transform_columns(&self, frame: &Frame) -> Result<Frame, FeatureError> {
        let mut out = frame.clone();
        for column in &self.columns {
            out.map_column(column, |v| Value::Text(self.clean_value(v)))?;
        }
        Ok(out)
    }

    /// One combined cleaned document per row: the non-empty cleaned columns
    /// joined by a space, in configured order.
    pub fn combine(&self, frame: &Frame) -> Result<Vec<String>, FeatureError> {
        let columns = self
            .columns
            .iter()
            .map(|c| frame.column(c))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((0..frame.n_rows())
            .map(|row| {
                columns
                    .iter()
                    .map(|values| self.clean_value(values[row]))
                    .filter(|cleaned| !cleaned.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect())
    }

    /// Frame holding only the combined text column.
    pub fn transform_combined(&self, frame: &Frame) -> Result<Frame, FeatureError> {
        let combined = self.combine(frame)?;
        let mut out = Frame::new([self.combined_column.as_str()]);
        for doc in combined {
            out.push_row(vec![Value::Text(doc)])?;
        }
        Ok(out)
    }
}

impl FrameTransform for TextCleaner {
    fn transform(&self, frame: &Frame) -> Result<Frame, FeatureError> {
        self.transform_combined(frame)
    }

    fn name(&self) -> &str {
        "text-cleaner"
    }
}
