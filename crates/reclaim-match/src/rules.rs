//! Match rules and the ordered rule set evaluated per record.

use regex::Regex;
use reclaim_model::{IncompleteRecord, ReferenceRecord, RuleKind};
use serde::{Deserialize, Serialize};

use crate::normalize::{char_prefix, normalize_fragment, normalize_text};
use crate::patterns::{PatternTable, compile_pattern};

/// Canonical number of leading characters compared by prefix containment.
pub const DEFAULT_PREFIX_LENGTH: usize = 40;

/// Generic pattern for records with no registered pattern.
pub const DEFAULT_FALLBACK_PATTERN: &str = "research.*student.*notes";

/// How a record's winner is chosen among the references satisfying a rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Earliest satisfying reference in collection order.
    #[default]
    FirstMatch,
    /// Highest prefix similarity; ties go to the earliest reference.
    BestScore,
}

/// A single predicate deciding whether a reference corresponds to a record.
#[derive(Debug, Clone)]
pub enum MatchRule {
    /// The record's registered pattern matches the reference text or markup.
    ExactPhrase,
    /// The first `length` characters of the normalized fragment start the
    /// normalized reference text.
    PrefixContainment { length: usize },
    /// Some keyword occurs in both the fragment and the reference text.
    KeywordSet { keywords: Vec<String> },
    /// For unregistered records: `pattern` matches the reference text or
    /// markup. With `match_fragment` the fragment must match it too.
    FallbackGeneric { pattern: Regex, match_fragment: bool },
}

impl MatchRule {
    pub fn prefix(length: usize) -> Self {
        Self::PrefixContainment { length }
    }

    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::KeywordSet {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fallback(pattern: &str, match_fragment: bool) -> crate::Result<Self> {
        Ok(Self::FallbackGeneric {
            pattern: compile_pattern("fallback rule", pattern)?,
            match_fragment,
        })
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Self::ExactPhrase => RuleKind::ExactPhrase,
            Self::PrefixContainment { .. } => RuleKind::PrefixContainment,
            Self::KeywordSet { .. } => RuleKind::KeywordSet,
            Self::FallbackGeneric { .. } => RuleKind::FallbackGeneric,
        }
    }
}

/// An incomplete record with its comparison forms precomputed.
#[derive(Debug, Clone)]
pub struct Probe<'a> {
    pub record: &'a IncompleteRecord,
    /// Normalized truncated text, trailing ellipsis removed.
    pub fragment: String,
}

impl<'a> Probe<'a> {
    pub fn new(record: &'a IncompleteRecord) -> Self {
        Self {
            record,
            fragment: normalize_fragment(&record.truncated_text),
        }
    }
}

/// A reference record with its normalized text precomputed.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub record: &'a ReferenceRecord,
    pub normalized: String,
}

impl<'a> Candidate<'a> {
    pub fn new(record: &'a ReferenceRecord) -> Self {
        Self {
            record,
            normalized: normalize_text(&record.text),
        }
    }

    fn raw_matches(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.record.text)
            || self
                .record
                .html
                .as_deref()
                .is_some_and(|html| pattern.is_match(html))
    }
}

/// Ordered rules plus the pattern table they consult.
///
/// Rules are tried in order for each record; the first rule with at least
/// one satisfying reference decides the record.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<MatchRule>,
    patterns: PatternTable,
    selection: SelectionPolicy,
}

impl RuleSet {
    pub fn new(rules: Vec<MatchRule>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_patterns(mut self, patterns: PatternTable) -> Self {
        self.patterns = patterns;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    pub fn selection(&self) -> SelectionPolicy {
        self.selection
    }

    /// Whether `rule` can fire for `probe` at all, independent of references.
    pub fn applies(&self, rule: &MatchRule, probe: &Probe<'_>) -> bool {
        match rule {
            MatchRule::ExactPhrase => self.patterns.contains(&probe.record.id),
            MatchRule::PrefixContainment { length } => *length > 0 && !probe.fragment.is_empty(),
            MatchRule::KeywordSet { keywords } => keywords
                .iter()
                .any(|keyword| !keyword.is_empty() && probe.fragment.contains(keyword.as_str())),
            MatchRule::FallbackGeneric {
                pattern,
                match_fragment,
            } => {
                !self.patterns.contains(&probe.record.id)
                    && (!*match_fragment || pattern.is_match(&probe.fragment))
            }
        }
    }

    /// Whether `candidate` satisfies `rule` for `probe`.
    ///
    /// Callers check [`Self::applies`] first; this only tests the reference side
    /// plus whatever must hold jointly.
    pub fn satisfies(&self, rule: &MatchRule, probe: &Probe<'_>, candidate: &Candidate<'_>) -> bool {
        match rule {
            MatchRule::ExactPhrase => self
                .patterns
                .get(&probe.record.id)
                .is_some_and(|pattern| candidate.raw_matches(pattern)),
            MatchRule::PrefixContainment { length } => {
                let prefix = char_prefix(&probe.fragment, *length);
                !prefix.is_empty() && candidate.normalized.starts_with(prefix)
            }
            MatchRule::KeywordSet { keywords } => keywords.iter().any(|keyword| {
                !keyword.is_empty()
                    && probe.fragment.contains(keyword.as_str())
                    && candidate.normalized.contains(keyword.as_str())
            }),
            MatchRule::FallbackGeneric { pattern, .. } => candidate.raw_matches(pattern),
        }
    }
}
