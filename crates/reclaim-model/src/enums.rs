use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag identifying which kind of match rule resolved a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    /// Hand-authored pattern registered for the record id.
    ExactPhrase,
    /// Normalized prefix of the truncated text starts the reference text.
    PrefixContainment,
    /// A distinguishing phrase occurs in both texts.
    KeywordSet,
    /// Generic pattern for records with no registered pattern.
    FallbackGeneric,
}

impl RuleKind {
    pub const ALL: [RuleKind; 4] = [
        RuleKind::ExactPhrase,
        RuleKind::PrefixContainment,
        RuleKind::KeywordSet,
        RuleKind::FallbackGeneric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactPhrase => "exact-phrase",
            Self::PrefixContainment => "prefix-containment",
            Self::KeywordSet => "keyword-set",
            Self::FallbackGeneric => "fallback-generic",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
