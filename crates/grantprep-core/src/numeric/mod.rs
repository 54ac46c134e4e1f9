//! Numeric field normalization.

mod cleaner;

pub use cleaner::NumericCleaner;
