//! Core library for grant proposal preprocessing.
//!
//! This crate provides:
//! - PDF and DOCX text extraction
//! - Keyword-anchored narrative section parsing
//! - Currency-aware cleaning of monetary fields and financial ratios
//! - Narrative text cleaning with English stopword removal
//! - Feature matrix assembly (median imputation, standard scaling, TF-IDF)

pub mod error;
pub mod extraction;
pub mod features;
pub mod models;
pub mod numeric;
pub mod proposal;
pub mod ratios;
pub mod sections;
pub mod text;

pub use error::{ExtractionError, FeatureError, GrantError, Result};
pub use extraction::{Document, DocumentFormat, TextExtractor, extract_document};
pub use features::{FeatureAssembler, FeatureMatrix, FittedPreprocessor, TfidfVectorizer};
pub use models::{Frame, FrameTransform, GrantConfig, ProposalRecord, Value};
pub use numeric::NumericCleaner;
pub use proposal::{ProposalExtractor, extract_proposal};
pub use ratios::{RATIO_FIELDS, RatioEngine, RatioSet};
pub use sections::{ParsedSections, SectionParser};
pub use text::TextCleaner;
