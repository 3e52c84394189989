//! Data model for truncated record recovery.
//!
//! Shared by the ingest, matching and CLI crates.

#![deny(unsafe_code)]

pub mod enums;
pub mod error;
pub mod ids;
pub mod record;

pub use enums::RuleKind;
pub use error::{MalformedInputError, ModelError};
pub use ids::RecordId;
pub use record::{IncompleteRecord, MatchResult, ReferenceRecord};
