//! Per-record pattern table.
//!
//! Maps record ids to hand-authored, case-insensitive regular-expression
//! fragments expected to appear in the full reference text. The table is
//! data, so it is loaded from a file rather than compiled in:
//!
//! ```toml
//! [patterns]
//! "cmf862ovw001ov67minr1kz7b" = "Jane Austen's 1811 novel"
//! "cmf862ptf002lv67mgvtc8xn3" = "Black beans.*Phaseolus vulgaris"
//! ```
//!
//! A `.json` file holding a flat `{"id": "pattern"}` object is accepted too.

use std::collections::BTreeMap;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use reclaim_model::RecordId;
use serde::Deserialize;

use crate::error::{MatchError, Result};

/// Compiles `pattern` the way every table and fallback pattern is compiled.
pub(crate) fn compile_pattern(owner: &str, pattern: &str) -> Result<Regex> {
    if pattern.trim().is_empty() {
        return Err(MatchError::config(format!("empty pattern for {owner}")));
    }
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| MatchError::InvalidPattern {
            owner: owner.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}

#[derive(Debug, Deserialize)]
struct PatternFile {
    #[serde(default)]
    patterns: BTreeMap<String, String>,
}

/// Compiled id → pattern lookup.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    entries: BTreeMap<RecordId, Regex>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(id, pattern)` pairs; later duplicates replace earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = Self::new();
        for (id, pattern) in pairs {
            table.insert(id.as_ref(), pattern.as_ref())?;
        }
        Ok(table)
    }

    /// Loads a table from a TOML (`[patterns]` table) or JSON (flat object) file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| MatchError::PatternTableRead {
                path: path.to_path_buf(),
                source,
            })?;
        let parse_err = |message: String| MatchError::PatternTableParse {
            path: path.to_path_buf(),
            message,
        };
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let pairs: BTreeMap<String, String> = if is_json {
            serde_json::from_str(&contents).map_err(|e| parse_err(e.to_string()))?
        } else {
            toml::from_str::<PatternFile>(&contents)
                .map_err(|e| parse_err(e.to_string()))?
                .patterns
        };
        let table = Self::from_pairs(pairs)?;
        tracing::info!(path = %path.display(), patterns = table.len(), "loaded pattern table");
        Ok(table)
    }

    pub fn insert(&mut self, id: &str, pattern: &str) -> Result<()> {
        let record_id = RecordId::new(id)
            .map_err(|_| MatchError::config(format!("pattern table has a blank id for {pattern:?}")))?;
        let regex = compile_pattern(&format!("record {record_id}"), pattern)?;
        self.entries.insert(record_id, regex);
        Ok(())
    }

    pub fn get(&self, id: &RecordId) -> Option<&Regex> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
