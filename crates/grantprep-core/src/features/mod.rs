//! Feature matrix assembly: imputation, scaling and TF-IDF.

mod assembler;
pub mod imputer;
mod matrix;
pub mod scaler;
pub mod tfidf;

pub use assembler::{FeatureAssembler, FittedPreprocessor, TFIDF_PREFIX};
pub use imputer::MedianImputer;
pub use matrix::FeatureMatrix;
pub use scaler::StandardScaler;
pub use tfidf::TfidfVectorizer;
