//! TF-IDF vectorization of the combined narrative text.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use ndarray::Array2;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FeatureError;
use crate::text::stopwords::is_extended_stopword;

lazy_static! {
    /// Runs of two or more word characters.
    static ref TOKEN: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// TF-IDF vectorizer with a vocabulary fit once and reused for every transform.
///
/// Terms are n-grams of lowercased tokens after English stop word removal.
/// Idf is smoothed (`ln((1 + n) / (1 + df)) + 1`) and rows are L2-normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "VectorizerState", into = "VectorizerState")]
pub struct TfidfVectorizer {
    ngram_range: (usize, usize),
    max_features: usize,
    /// Terms in column order (alphabetical).
    terms: Vec<String>,
    idf: Vec<f64>,
    index: HashMap<String, usize>,
}

/// Persisted form of a vectorizer; the term index is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct VectorizerState {
    ngram_range: (usize, usize),
    max_features: usize,
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl From<VectorizerState> for TfidfVectorizer {
    fn from(state: VectorizerState) -> Self {
        let mut vectorizer = Self {
            ngram_range: state.ngram_range,
            max_features: state.max_features,
            terms: state.terms,
            idf: state.idf,
            index: HashMap::new(),
        };
        vectorizer.rebuild_index();
        vectorizer
    }
}

impl From<TfidfVectorizer> for VectorizerState {
    fn from(v: TfidfVectorizer) -> Self {
        Self {
            ngram_range: v.ngram_range,
            max_features: v.max_features,
            terms: v.terms,
            idf: v.idf,
        }
    }
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(ngram_range: (usize, usize), max_features: usize) -> Self {
        Self {
            ngram_range,
            max_features,
            terms: Vec::new(),
            idf: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Learn the vocabulary and idf weights.
    pub fn fit(&mut self, documents: &[String]) -> Result<(), FeatureError> {
        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| self.analyze(d)).collect();

        let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for terms in &analyzed {
            let mut seen = HashSet::new();
            for term in terms {
                *corpus_counts.entry(term.as_str()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        if corpus_counts.is_empty() {
            return Err(FeatureError::EmptyVocabulary);
        }

        // Most frequent terms first, ties alphabetical.
        let mut ranked: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        terms.sort();

        let n = documents.len() as f64;
        self.idf = terms
            .iter()
            .map(|t| {
                let df = doc_freq.get(t.as_str()).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.terms = terms;
        self.rebuild_index();

        debug!(
            "TF-IDF vocabulary: {} terms from {} documents",
            self.terms.len(),
            documents.len()
        );
        Ok(())
    }

    /// Vectorize documents against the fitted vocabulary. Unknown terms are ignored.
    pub fn transform(&self, documents: &[String]) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((documents.len(), self.terms.len()));

        for (row, doc) in documents.iter().enumerate() {
            for term in self.analyze(doc) {
                if let Some(&col) = self.index.get(&term) {
                    matrix[[row, col]] += 1.0;
                }
            }

            let mut row_view = matrix.row_mut(row);
            for (value, idf) in row_view.iter_mut().zip(&self.idf) {
                *value *= idf;
            }
            let norm = row_view.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                row_view.mapv_inplace(|v| v / norm);
            }
        }

        matrix
    }

    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Array2<f64>, FeatureError> {
        self.fit(documents)?;
        Ok(self.transform(documents))
    }

    /// Fitted terms, in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
    }

    /// Terms of one document: tokens, stop words removed, joined into n-grams.
    fn analyze(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        let tokens: Vec<&str> = TOKEN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !is_extended_stopword(t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n.max(1)..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_unigrams_and_bigrams() {
        let v = TfidfVectorizer::new((1, 2), 100);
        assert_eq!(
            v.analyze("Clean water for the villages"),
            vec!["clean", "water", "villages", "clean water", "water villages"]
        );
    }

    #[test]
    fn test_single_char_tokens_dropped() {
        let v = TfidfVectorizer::new((1, 1), 100);
        assert_eq!(v.analyze("a b clinic 7 42"), vec!["clinic", "42"]);
    }

    #[test]
    fn test_vocabulary_sorted_and_limited() {
        let mut v = TfidfVectorizer::new((1, 1), 2);
        v.fit(&docs(&["water water clinic", "water school", "clinic"]))
            .unwrap();
        // water: 3, clinic: 2, school: 1
        assert_eq!(v.terms(), &["clinic", "water"]);
    }

    #[test]
    fn test_idf_smoothing() {
        let mut v = TfidfVectorizer::new((1, 1), 10);
        v.fit(&docs(&["water clinic", "water"])).unwrap();
        assert_eq!(v.terms(), &["clinic", "water"]);
        assert!((v.idf()[0] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert!((v.idf()[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_l2_normalized() {
        let mut v = TfidfVectorizer::new((1, 2), 100);
        let m = v
            .fit_transform(&docs(&["clean water villages", "school meals", ""]))
            .unwrap();
        for row in 0..2 {
            let norm: f64 = m.row(row).iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
        assert!(m.row(2).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_unknown_terms_ignored() {
        let mut v = TfidfVectorizer::new((1, 1), 100);
        v.fit(&docs(&["water"])).unwrap();
        let m = v.transform(&docs(&["rockets"]));
        assert_eq!(m.shape(), &[1, 1]);
        assert_eq!(m[[0, 0]], 0.0);
    }

    #[test]
    fn test_empty_vocabulary() {
        let mut v = TfidfVectorizer::new((1, 2), 100);
        let err = v.fit(&docs(&["the and of", ""])).unwrap_err();
        assert!(matches!(err, FeatureError::EmptyVocabulary));
    }

    #[test]
    fn test_index_restored_after_deserialize() {
        let mut v = TfidfVectorizer::new((1, 1), 100);
        v.fit(&docs(&["water clinic"])).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert!(!json.contains("index"));
        let back: TfidfVectorizer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
        assert_eq!(back.transform(&docs(&["water"])), v.transform(&docs(&["water"])));
    }
}
