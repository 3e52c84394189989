//! Error types for matching operations.

use std::path::PathBuf;

use reclaim_model::MalformedInputError;
use thiserror::Error;

/// Errors from building rule sets or running the matcher.
///
/// Records that cannot be resolved are not errors; they end up in
/// [`crate::MatchOutcome::unmatched`].
#[derive(Debug, Error)]
pub enum MatchError {
    /// An input collection is empty or lacks a required field.
    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),

    /// A pattern does not compile as a regular expression.
    #[error("invalid pattern for {owner} ({pattern:?}): {source}")]
    InvalidPattern {
        owner: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The pattern table file could not be read.
    #[error("failed to read pattern table {path}: {source}")]
    PatternTableRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pattern table file is not valid TOML/JSON of the expected shape.
    #[error("failed to parse pattern table {path}: {message}")]
    PatternTableParse { path: PathBuf, message: String },

    /// Matching configuration is inconsistent.
    #[error("invalid match configuration: {message}")]
    InvalidConfig { message: String },
}

impl MatchError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
