//! Fit-once, transform-many assembly of the final feature matrix.

use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::imputer::MedianImputer;
use super::matrix::FeatureMatrix;
use super::scaler::StandardScaler;
use super::tfidf::TfidfVectorizer;
use crate::error::FeatureError;
use crate::models::config::{GrantConfig, MissingNumeric};
use crate::models::frame::{Frame, FrameTransform};
use crate::models::record::NUMERIC_FIELDS;
use crate::numeric::NumericCleaner;
use crate::ratios::{RATIO_FIELDS, RatioEngine};
use crate::text::TextCleaner;

/// Prefix of TF-IDF column names.
pub const TFIDF_PREFIX: &str = "tfidf__";

/// The cleaning stages in front of the fitted statistics. Rebuilt from the
/// configuration, so they never need to be persisted.
struct Stages {
    missing_numeric: MissingNumeric,
    numeric_columns: Vec<String>,
    numeric: NumericCleaner,
    ratio_inputs: NumericCleaner,
    text: TextCleaner,
}

/// Unscaled blocks of one batch.
struct RawBlocks {
    numeric: Array2<f64>,
    ratios: Array2<f64>,
    documents: Vec<String>,
}

impl Stages {
    fn new(config: &GrantConfig) -> crate::Result<Self> {
        let ratio_columns: Vec<String> = NUMERIC_FIELDS.iter().map(|c| c.to_string()).collect();
        Ok(Self {
            missing_numeric: config.features.missing_numeric,
            numeric_columns: config.features.numeric_columns.clone(),
            numeric: NumericCleaner::new(&config.numeric, &config.features.numeric_columns)?,
            ratio_inputs: NumericCleaner::new(&config.numeric, &ratio_columns)?,
            text: TextCleaner::new(&config.text, &config.features.text_columns),
        })
    }

    fn raw_blocks(&self, frame: &Frame) -> Result<RawBlocks, FeatureError> {
        // Text first: a missing narrative column is the only fatal input gap.
        let documents = self.text.combine(frame)?;

        let cleaned = match self.missing_numeric {
            MissingNumeric::Impute => self.numeric.transform_preserving_missing(frame)?,
            MissingNumeric::Zero => self.numeric.transform(frame)?,
        };
        let numeric = to_array(&cleaned, &self.numeric_columns)?;

        let zero_filled = self.ratio_inputs.transform(frame)?;
        let with_ratios = RatioEngine::new().transform(&zero_filled)?;
        let ratios = to_array(&with_ratios, &RATIO_FIELDS)?;

        Ok(RawBlocks {
            numeric,
            ratios,
            documents,
        })
    }
}

/// Cells of `columns` as a dense matrix; non-numeric cells become NaN.
fn to_array<S: AsRef<str>>(frame: &Frame, columns: &[S]) -> Result<Array2<f64>, FeatureError> {
    let values = columns
        .iter()
        .map(|c| frame.column(c.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Array2::from_shape_fn(
        (frame.n_rows(), columns.len()),
        |(row, col)| values[col][row].as_f64(),
    ))
}

/// Learns the statistics of a training batch.
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    config: GrantConfig,
}

impl FeatureAssembler {
    pub fn new(config: GrantConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GrantConfig {
        &self.config
    }

    /// Fit imputers, scalers and the vectorizer on `frame`.
    pub fn fit(&self, frame: &Frame) -> crate::Result<FittedPreprocessor> {
        self.config.validate()?;
        if frame.is_empty() {
            return Err(FeatureError::EmptyBatch.into());
        }

        let stages = Stages::new(&self.config)?;
        let raw = stages.raw_blocks(frame)?;

        let numeric_imputer = MedianImputer::fit(&raw.numeric);
        let numeric_scaler = StandardScaler::fit(&numeric_imputer.transform(&raw.numeric)?);

        let ratio_imputer = MedianImputer::fit(&raw.ratios);
        let ratio_scaler = StandardScaler::fit(&ratio_imputer.transform(&raw.ratios)?);

        let features = &self.config.features;
        let mut vectorizer = TfidfVectorizer::new(features.ngram_range, features.max_features);
        vectorizer.fit(&raw.documents)?;

        info!(
            "Fitted preprocessor on {} rows: {} numeric, {} ratio, {} text features",
            frame.n_rows(),
            raw.numeric.ncols(),
            raw.ratios.ncols(),
            vectorizer.vocabulary_size()
        );

        Ok(FittedPreprocessor {
            config: self.config.clone(),
            numeric_imputer,
            numeric_scaler,
            ratio_imputer,
            ratio_scaler,
            vectorizer,
            fitted_at: Utc::now(),
            n_samples: frame.n_rows(),
        })
    }

    /// Fit on `frame` and return its feature matrix alongside the fit state.
    pub fn fit_transform(&self, frame: &Frame) -> crate::Result<(FittedPreprocessor, FeatureMatrix)> {
        let fitted = self.fit(frame)?;
        let matrix = fitted.transform(frame)?;
        Ok((fitted, matrix))
    }
}

/// Fit state reused read-only by every transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    config: GrantConfig,
    numeric_imputer: MedianImputer,
    numeric_scaler: StandardScaler,
    ratio_imputer: MedianImputer,
    ratio_scaler: StandardScaler,
    vectorizer: TfidfVectorizer,
    fitted_at: DateTime<Utc>,
    n_samples: usize,
}

impl FittedPreprocessor {
    /// Build the feature matrix of `frame` with the fitted statistics.
    /// Columns not named by the configuration are ignored.
    pub fn transform(&self, frame: &Frame) -> crate::Result<FeatureMatrix> {
        let stages = Stages::new(&self.config)?;
        let raw = stages.raw_blocks(frame)?;

        let numeric = self
            .numeric_scaler
            .transform(&self.numeric_imputer.transform(&raw.numeric)?)?;
        let ratios = self
            .ratio_scaler
            .transform(&self.ratio_imputer.transform(&raw.ratios)?)?;
        let text = self.vectorizer.transform(&raw.documents);

        debug!("Transformed {} rows into {} text features", frame.n_rows(), text.ncols());

        Ok(FeatureMatrix::from_blocks(
            (self.config.features.numeric_columns.clone(), numeric),
            (RATIO_FIELDS.iter().map(|c| c.to_string()).collect(), ratios),
            (self.text_columns(), text),
        ))
    }

    /// Output column names, in matrix order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.config.features.numeric_columns.clone();
        names.extend(RATIO_FIELDS.iter().map(|c| c.to_string()));
        names.extend(self.text_columns());
        names
    }

    fn text_columns(&self) -> Vec<String> {
        self.vectorizer
            .terms()
            .iter()
            .map(|t| format!("{}{}", TFIDF_PREFIX, t))
            .collect()
    }

    pub fn config(&self) -> &GrantConfig {
        &self.config
    }

    pub fn numeric_imputer(&self) -> &MedianImputer {
        &self.numeric_imputer
    }

    pub fn numeric_scaler(&self) -> &StandardScaler {
        &self.numeric_scaler
    }

    pub fn ratio_imputer(&self) -> &MedianImputer {
        &self.ratio_imputer
    }

    pub fn ratio_scaler(&self) -> &StandardScaler {
        &self.ratio_scaler
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn fitted_at(&self) -> DateTime<Utc> {
        self.fitted_at
    }

    /// Number of rows the statistics were learned from.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Load fit state from a JSON file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save fit state as pretty JSON.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
