//! Narrative text cleaning.

mod cleaner;
pub mod stopwords;

pub use cleaner::TextCleaner;
