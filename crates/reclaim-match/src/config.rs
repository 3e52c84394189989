//! Matching configuration.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! rules = ["exact-phrase", "prefix-containment", "keyword-set", "fallback-generic"]
//! selection = "first-match"
//! prefix_length = 40
//! keywords = ["mimosa tree", "Jane Austen"]
//! fallback_pattern = "research.*student.*notes"
//! fallback_requires_fragment = false
//! ```

use std::collections::BTreeSet;

use reclaim_model::RuleKind;
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::patterns::PatternTable;
use crate::rules::{
    DEFAULT_FALLBACK_PATTERN, DEFAULT_PREFIX_LENGTH, MatchRule, RuleSet, SelectionPolicy,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Rule kinds in priority order.
    pub rules: Vec<RuleKind>,
    pub selection: SelectionPolicy,
    /// Characters compared by prefix containment.
    pub prefix_length: usize,
    /// Distinguishing phrases for the keyword rule.
    pub keywords: Vec<String>,
    /// Generic pattern used for records without a registered pattern.
    pub fallback_pattern: String,
    /// Also require the fallback pattern to match the truncated text.
    pub fallback_requires_fragment: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rules: RuleKind::ALL.to_vec(),
            selection: SelectionPolicy::default(),
            prefix_length: DEFAULT_PREFIX_LENGTH,
            keywords: Vec::new(),
            fallback_pattern: DEFAULT_FALLBACK_PATTERN.to_string(),
            fallback_requires_fragment: false,
        }
    }
}

impl MatchConfig {
    /// Checks internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(MatchError::config("at least one rule must be enabled"));
        }
        let mut seen = BTreeSet::new();
        for kind in &self.rules {
            if !seen.insert(*kind) {
                return Err(MatchError::config(format!("rule '{kind}' is listed twice")));
            }
        }
        if self.prefix_length == 0 {
            return Err(MatchError::config("prefix_length must be greater than zero"));
        }
        Ok(())
    }

    /// Builds the ordered rule set, consulting `patterns` for exact-phrase
    /// and fallback decisions.
    pub fn build_rule_set(&self, patterns: PatternTable) -> Result<RuleSet> {
        self.validate()?;
        let mut rules = Vec::with_capacity(self.rules.len());
        for kind in &self.rules {
            let rule = match kind {
                RuleKind::ExactPhrase => {
                    if patterns.is_empty() {
                        tracing::warn!("exact-phrase rule enabled with an empty pattern table");
                    }
                    MatchRule::ExactPhrase
                }
                RuleKind::PrefixContainment => MatchRule::prefix(self.prefix_length),
                RuleKind::KeywordSet => {
                    let keywords: Vec<String> = self
                        .keywords
                        .iter()
                        .map(|keyword| keyword.trim().to_string())
                        .filter(|keyword| !keyword.is_empty())
                        .collect();
                    if keywords.is_empty() {
                        tracing::warn!("keyword-set rule enabled without keywords");
                    }
                    MatchRule::KeywordSet { keywords }
                }
                RuleKind::FallbackGeneric => {
                    MatchRule::fallback(&self.fallback_pattern, self.fallback_requires_fragment)?
                }
            };
            rules.push(rule);
        }
        tracing::debug!(
            rules = ?self.rules,
            selection = ?self.selection,
            prefix_length = self.prefix_length,
            keywords = self.keywords.len(),
            patterns = patterns.len(),
            "built rule set"
        );
        Ok(RuleSet::new(rules)
            .with_patterns(patterns)
            .with_selection(self.selection))
    }
}
