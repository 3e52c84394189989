use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("record id must not be empty (got {0:?})")]
    InvalidRecordId(String),

    #[error("missing or non-string field '{0}'")]
    MissingField(&'static str),
}

/// A required input collection is absent, empty, or lacks a required field.
///
/// Always fatal: a run that hits this writes no output artifacts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed input: {input} is missing required field '{field}'")]
pub struct MalformedInputError {
    /// Human-readable name of the offending input (a path or collection name).
    pub input: String,
    /// The missing field, or `"<records>"` when the collection itself is empty.
    pub field: String,
}

impl MalformedInputError {
    /// Marker used in `field` when the collection has no records at all.
    pub const NO_RECORDS: &'static str = "<records>";

    pub fn missing_field(input: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            field: field.into(),
        }
    }

    pub fn empty(input: impl Into<String>) -> Self {
        Self::missing_field(input, Self::NO_RECORDS)
    }

    pub fn is_empty_collection(&self) -> bool {
        self.field == Self::NO_RECORDS
    }
}
