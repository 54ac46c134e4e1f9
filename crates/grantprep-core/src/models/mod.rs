//! Data models and configuration.

pub mod config;
pub mod frame;
pub mod record;

pub use config::GrantConfig;
pub use frame::{Frame, FrameTransform, Value};
pub use record::{NUMERIC_FIELDS, ProposalRecord, SECTION_FIELDS};
