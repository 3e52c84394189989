//! Recovery pipeline stages shared by the CLI commands.
//!
//! Stages run in order and any fatal error stops the run before the
//! artifacts are written:
//!
//! 1. build the rule set (pattern table + config)
//! 2. load the reference and incomplete collections
//! 3. match
//! 4. stage both artifacts, then move them into place (skipped on dry run)

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reclaim_ingest::{load_incomplete_json, load_reference_csv, stage_json};
use reclaim_match::truncation::ending;
use reclaim_match::{
    MatchOutcome, PatternTable, RuleSet, ending_histogram, looks_truncated, match_records,
};
use reclaim_model::IncompleteRecord;
use tracing::{debug, info, info_span};

use crate::config::RunConfig;
use crate::logging::redact_value;

/// Where the two artifacts of a run go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub matched: PathBuf,
    pub unmatched: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path, matched_name: &str, unmatched_name: &str) -> Self {
        Self {
            matched: dir.join(matched_name),
            unmatched: dir.join(unmatched_name),
        }
    }
}

/// Inputs of a matching run.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub reference: PathBuf,
    pub incomplete: PathBuf,
    pub config: RunConfig,
    /// `None` for a dry run.
    pub outputs: Option<OutputPaths>,
}

/// Everything a caller needs to report on a finished run.
#[derive(Debug)]
pub struct MatchReport {
    pub reference_records: usize,
    pub incomplete_records: usize,
    pub patterns: usize,
    pub outcome: MatchOutcome,
    /// `None` when nothing was written.
    pub outputs: Option<OutputPaths>,
    pub elapsed: Duration,
}

/// Builds the rule set described by `config`.
pub fn build_rules(config: &RunConfig) -> Result<RuleSet> {
    let patterns = match &config.pattern_table {
        Some(path) => PatternTable::load(path)
            .with_context(|| format!("load pattern table: {}", path.display()))?,
        None => PatternTable::new(),
    };
    config
        .matching
        .build_rule_set(patterns)
        .context("build rule set")
}

/// Runs the full matching pipeline.
pub fn run_match(request: &MatchRequest) -> Result<MatchReport> {
    let start = Instant::now();
    let rules = build_rules(&request.config)?;

    let load_span = info_span!("load");
    let (reference, incomplete) = load_span.in_scope(|| -> Result<_> {
        let reference = load_reference_csv(&request.reference, &request.config.columns)
            .with_context(|| format!("load reference: {}", request.reference.display()))?;
        let incomplete = load_incomplete_json(&request.incomplete)
            .with_context(|| format!("load incomplete records: {}", request.incomplete.display()))?;
        Ok((reference, incomplete))
    })?;

    let outcome = match_records(&incomplete, &reference, &rules).context("match records")?;
    if let Some(sample) = outcome.matched.first() {
        debug!(
            id = %sample.id,
            url = %sample.source_url,
            old_tail = %redact_value(ending(&sample.previous_text)),
            new_tail = %redact_value(ending(&sample.resolved_text)),
            "sample resolution"
        );
    }

    if let Some(outputs) = &request.outputs {
        // Both artifacts are staged before either replaces a prior run's file.
        let matched = stage_json(&outputs.matched, &outcome.matched)
            .with_context(|| format!("write {}", outputs.matched.display()))?;
        let unmatched = stage_json(&outputs.unmatched, &outcome.unmatched)
            .with_context(|| format!("write {}", outputs.unmatched.display()))?;
        matched
            .commit()
            .with_context(|| format!("write {}", outputs.matched.display()))?;
        unmatched
            .commit()
            .with_context(|| format!("write {}", outputs.unmatched.display()))?;
        info!(
            matched = %outputs.matched.display(),
            unmatched = %outputs.unmatched.display(),
            "wrote artifacts"
        );
    }

    Ok(MatchReport {
        reference_records: reference.len(),
        incomplete_records: incomplete.len(),
        patterns: rules.patterns().len(),
        outcome,
        outputs: request.outputs.clone(),
        elapsed: start.elapsed(),
    })
}

/// One record flagged by the truncation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedRecord {
    pub id: String,
    pub module_title: Option<String>,
    pub ending: String,
}

/// Result of the truncation check over an incomplete collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncationReport {
    pub total: usize,
    pub truncated: Vec<TruncatedRecord>,
    pub endings: Vec<(String, usize)>,
}

/// Flags truncated-looking records in `records`.
pub fn check_truncation(records: &[IncompleteRecord], top: usize) -> TruncationReport {
    let truncated = records
        .iter()
        .filter(|record| looks_truncated(&record.truncated_text))
        .map(|record| TruncatedRecord {
            id: record.id.to_string(),
            module_title: record.module_title.clone(),
            ending: ending(&record.truncated_text).to_string(),
        })
        .collect();
    TruncationReport {
        total: records.len(),
        truncated,
        endings: ending_histogram(records.iter().map(|r| r.truncated_text.as_str()), top),
    }
}

/// Loads `path` and runs [`check_truncation`].
pub fn run_check(path: &Path, top: usize) -> Result<TruncationReport> {
    let records = load_incomplete_json(path)
        .with_context(|| format!("load incomplete records: {}", path.display()))?;
    let report = check_truncation(&records, top);
    info!(
        total = report.total,
        truncated = report.truncated.len(),
        "checked records for truncation"
    );
    Ok(report)
}
