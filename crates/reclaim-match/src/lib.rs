//! Rule-based resolution of truncated records.
//!
//! Given a reference collection of full records and a collection of
//! truncated ones, [`match_records`] resolves each truncated record to at
//! most one reference record using an ordered [`RuleSet`]:
//!
//! 1. **exact-phrase**: a hand-authored pattern registered for the record id
//! 2. **prefix-containment**: the normalized start of the truncated text
//! 3. **keyword-set**: a distinguishing phrase present in both texts
//! 4. **fallback-generic**: a generic pattern for unregistered records
//!
//! The first rule with any satisfying reference decides the record. Within
//! a rule the earliest reference wins unless [`SelectionPolicy::BestScore`]
//! is configured.
//!
//! # Example
//!
//! ```ignore
//! use reclaim_match::{MatchConfig, PatternTable, match_records};
//!
//! let rules = MatchConfig::default().build_rule_set(PatternTable::load(path)?)?;
//! let outcome = match_records(&incomplete, &reference, &rules)?;
//! println!("{} matched, {} unmatched", outcome.matched.len(), outcome.unmatched.len());
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod dedupe;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod patterns;
pub mod rules;
pub mod score;
pub mod truncation;

pub use config::MatchConfig;
pub use dedupe::dedupe_by_key;
pub use engine::{MatchOutcome, MatchStats, RecordMatcher, Resolution, match_records};
pub use error::{MatchError, Result};
pub use patterns::PatternTable;
pub use rules::{MatchRule, RuleSet, SelectionPolicy};
pub use truncation::{ending_histogram, looks_truncated};
