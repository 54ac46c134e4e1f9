//! Currency-aware cleaning of free-text monetary fields.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{trace, warn};

use crate::error::FeatureError;
use crate::models::config::NumericConfig;
use crate::models::frame::{Frame, FrameTransform, Value};
use crate::sections::keyword_pattern;

lazy_static! {
    static ref NON_NUMERIC: Regex = Regex::new(r"[^0-9.\-]").unwrap();
}

/// Converts free-text monetary values ("KES 1,200,000", "approx $50k") to floats.
///
/// Cleaning never fails: anything that does not parse after stripping
/// currency words, symbols, separators and approximation markers becomes `0.0`.
#[derive(Debug, Clone)]
pub struct NumericCleaner {
    columns: Vec<String>,
    currency_words: Vec<String>,
    currency_symbols: Option<Regex>,
    approximations: Option<Regex>,
}

impl NumericCleaner {
    /// Create a cleaner for `columns` with the given currency vocabulary.
    pub fn new(config: &NumericConfig, columns: &[String]) -> crate::Result<Self> {
        let currency_words = config
            .currency_words
            .iter()
            .map(|w| w.to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let currency_symbols = if config.currency_symbols.is_empty() {
            None
        } else {
            let class: String = config
                .currency_symbols
                .iter()
                .map(|c| regex::escape(&c.to_string()))
                .collect();
            Some(Regex::new(&format!("[{}]", class)).map_err(|e| {
                crate::GrantError::Config(format!("invalid currency symbol set: {}", e))
            })?)
        };

        let tokens: Vec<&String> = config
            .approximation_tokens
            .iter()
            .filter(|t| !t.is_empty())
            .collect();
        let approximations = if tokens.is_empty() {
            None
        } else {
            Some(keyword_pattern(&tokens).map_err(|e| {
                crate::GrantError::Config(format!("invalid approximation token: {}", e))
            })?)
        };

        Ok(Self {
            columns: columns.to_vec(),
            currency_words,
            currency_symbols,
            approximations,
        })
    }

    /// Columns this cleaner is responsible for.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Clean a single cell. Missing values become `0.0`.
    pub fn clean_value(&self, value: &Value) -> f64 {
        match value {
            Value::Missing => 0.0,
            Value::Number(n) if n.is_finite() => *n,
            Value::Number(_) => 0.0,
            Value::Text(raw) => self.clean_text(raw),
        }
    }

    /// Clean a monetary string.
    pub fn clean_text(&self, raw: &str) -> f64 {
        let mut text = raw.to_lowercase();

        for word in &self.currency_words {
            text = text.replace(word.as_str(), "");
        }

        if let Some(symbols) = &self.currency_symbols {
            text = symbols.replace_all(&text, "").into_owned();
        }

        text = text.replace(',', "").replace(['(', ')'], "");

        if let Some(approximations) = &self.approximations {
            text = approximations.replace_all(&text, " ").into_owned();
        }

        let residue = NON_NUMERIC.replace_all(&text, " ");
        match residue.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                trace!("Could not parse numeric value {:?}, using 0", raw);
                0.0
            }
        }
    }

    /// Like [`FrameTransform::transform`] but missing cells stay missing,
    /// and absent columns are added as entirely missing.
    pub fn transform_preserving_missing(&self, frame: &Frame) -> Result<Frame, FeatureError> {
        self.apply(frame, true)
    }

    fn apply(&self, frame: &Frame, keep_missing: bool) -> Result<Frame, FeatureError> {
        let mut out = frame.clone();

        for column in &self.columns {
            if out.has_column(column) {
                out.map_column(column, |v| match v {
                    Value::Missing if keep_missing => Value::Missing,
                    other => Value::Number(self.clean_value(other)),
                })?;
            } else {
                warn!("Numeric column '{}' not in input, filling", column);
                let fill = if keep_missing {
                    Value::Missing
                } else {
                    Value::Number(0.0)
                };
                out.set_column(column, vec![fill; out.n_rows()])?;
            }
        }

        Ok(out)
    }
}

impl FrameTransform for NumericCleaner {
    /// Clean every configured column; absent columns are added as zeros.
    fn transform(&self, frame: &Frame) -> Result<Frame, FeatureError> {
        self.apply(frame, false)
    }

    fn name(&self) -> &str {
        "numeric-cleaner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::NUMERIC_FIELDS;
    use pretty_assertions::assert_eq;

    fn cleaner() -> NumericCleaner {
        let columns: Vec<String> = NUMERIC_FIELDS.iter().map(|c| c.to_string()).collect();
        NumericCleaner::new(&NumericConfig::default(), &columns).unwrap()
    }

    #[test]
    fn test_currency_words_and_symbols_removed() {
        let c = cleaner();
        assert_eq!(c.clean_text("KES 1,200,000"), 1_200_000.0);
        assert_eq!(c.clean_text("approx $50,000.00"), 50_000.0);
        assert_eq!(c.clean_text("€ 7.5"), 7.5);
        assert_eq!(c.clean_text("£300"), 300.0);
        assert_eq!(c.clean_text("¥ 9000"), 9000.0);
        assert_eq!(c.clean_text("Kshs 250,000"), 250_000.0);
        assert_eq!(c.clean_text("12000 USD"), 12_000.0);
        assert_eq!(c.clean_text("UGX 3,500,000"), 3_500_000.0);
    }

    #[test]
    fn test_parentheses_are_stripped() {
        assert_eq!(cleaner().clean_text("(5000)"), 5000.0);
    }

    #[test]
    fn test_approximation_tokens() {
        let c = cleaner();
        assert_eq!(c.clean_text("est 40000"), 40_000.0);
        assert_eq!(c.clean_text("estimated 3,000"), 3000.0);
        assert_eq!(c.clean_text("Approx 12"), 12.0);
        // The abbreviation's period survives and breaks the parse.
        assert_eq!(c.clean_text("approx. 12"), 0.0);
    }

    #[test]
    fn test_malformed_values_are_zero() {
        let c = cleaner();
        for raw in ["N/A", "", "-- unknown --", "-", "1.2.3", "12 000", "none"] {
            assert_eq!(c.clean_text(raw), 0.0, "{raw:?}");
        }
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(cleaner().clean_text("-250"), -250.0);
    }

    #[test]
    fn test_clean_value_variants() {
        let c = cleaner();
        assert_eq!(c.clean_value(&Value::Missing), 0.0);
        assert_eq!(c.clean_value(&Value::Number(42.5)), 42.5);
        assert_eq!(c.clean_value(&Value::Number(f64::NAN)), 0.0);
        assert_eq!(c.clean_value(&Value::Text("USD 10".into())), 10.0);
    }

    #[test]
    fn test_custom_vocabulary() {
        let config = NumericConfig {
            currency_words: vec!["PLN".to_string()],
            currency_symbols: vec!['₹'],
            approximation_tokens: vec![],
        };
        let c = NumericCleaner::new(&config, &[]).unwrap();
        assert_eq!(c.clean_text("pln 100"), 100.0);
        assert_eq!(c.clean_text("₹2,000"), 2000.0);
        // No longer a currency word, so the letters are just noise.
        assert_eq!(c.clean_text("KES 5"), 5.0);
    }

    #[test]
    fn test_transform_fills_absent_columns_with_zero() {
        let mut frame = Frame::new(["annual_budget", "note"]);
        frame
            .push_row(vec![Value::Text("USD 1,000".into()), Value::Text("x".into())])
            .unwrap();
        frame
            .push_row(vec![Value::Missing, Value::Text("y".into())])
            .unwrap();

        let out = cleaner().transform(&frame).unwrap();
        assert_eq!(out.get(0, "annual_budget"), Some(&Value::Number(1000.0)));
        assert_eq!(out.get(1, "annual_budget"), Some(&Value::Number(0.0)));
        assert_eq!(out.get(1, "years_active"), Some(&Value::Number(0.0)));
        assert_eq!(out.get(0, "note"), Some(&Value::Text("x".into())));
        assert_eq!(out.n_columns(), 8);
    }

    #[test]
    fn test_transform_preserving_missing() {
        let mut frame = Frame::new(["annual_budget"]);
        frame.push_row(vec![Value::Missing]).unwrap();
        frame.push_row(vec![Value::Text("n/a".into())]).unwrap();

        let out = cleaner().transform_preserving_missing(&frame).unwrap();
        assert_eq!(out.get(0, "annual_budget"), Some(&Value::Missing));
        assert_eq!(out.get(1, "annual_budget"), Some(&Value::Number(0.0)));
        assert_eq!(out.get(0, "cash_reserves"), Some(&Value::Missing));
    }
}
