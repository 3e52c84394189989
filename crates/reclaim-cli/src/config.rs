//! Run configuration file.
//!
//! A single TOML document holds the matching settings, the reference
//! column names and the location of the pattern table:
//!
//! ```toml
//! rules = ["exact-phrase", "prefix-containment", "keyword-set", "fallback-generic"]
//! prefix_length = 40
//! keywords = ["mimosa tree", "Jane Austen"]
//! pattern_table = "patterns.toml"
//!
//! [columns]
//! text = "Question"
//! html = "Question_html"
//! source_url = "URL"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reclaim_ingest::ReferenceColumns;
use reclaim_match::MatchConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(flatten)]
    pub matching: MatchConfig,
    pub columns: ReferenceColumns,
    /// Pattern table path; relative paths resolve against the config file.
    pub pattern_table: Option<PathBuf>,
}

impl RunConfig {
    /// Loads a config file, resolving `pattern_table` relative to it.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        let mut config: RunConfig = toml::from_str(&contents)
            .with_context(|| format!("parse config: {}", path.display()))?;
        if let Some(table) = config.pattern_table.take() {
            let resolved = if table.is_relative() {
                path.parent().unwrap_or(Path::new(".")).join(table)
            } else {
                table
            };
            config.pattern_table = Some(resolved);
        }
        config
            .matching
            .validate()
            .with_context(|| format!("validate config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded run config");
        Ok(config)
    }
}
