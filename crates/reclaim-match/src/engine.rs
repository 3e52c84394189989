//! Record matcher implementation.

use std::collections::{BTreeMap, BTreeSet};

use reclaim_model::{IncompleteRecord, MalformedInputError, MatchResult, ReferenceRecord, RuleKind};
use tracing::{debug, info, info_span, warn};

use crate::dedupe::dedupe_by_key;
use crate::error::Result;
use crate::rules::{Candidate, MatchRule, Probe, RuleSet, SelectionPolicy};
use crate::score::{CandidateScore, best_candidate, prefix_similarity};

/// Name used for the reference collection in malformed-input errors.
pub const REFERENCE_INPUT: &str = "reference collection";
/// Name used for the incomplete collection in malformed-input errors.
pub const INCOMPLETE_INPUT: &str = "incomplete collection";

/// Result of a matching run.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Resolved records in the input order of the records they resolve.
    pub matched: Vec<MatchResult>,
    /// Records no rule could resolve, in input order.
    pub unmatched: Vec<IncompleteRecord>,
    pub stats: MatchStats,
}

/// Counters describing a matching run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// Records considered after duplicate ids were collapsed.
    pub processed: usize,
    /// Input records dropped because their id was already seen.
    pub duplicate_ids: usize,
    /// Resolutions per rule kind.
    pub by_rule: BTreeMap<RuleKind, usize>,
    /// Resolutions where more than one distinct reference text qualified.
    pub needs_review: usize,
}

/// Decision for one incomplete record.
#[derive(Debug, Clone)]
pub enum Resolution {
    Resolved(MatchResult),
    Unresolved,
}

/// Matches incomplete records against a prepared reference collection.
///
/// Reference texts are normalized once on construction.
#[derive(Debug)]
pub struct RecordMatcher<'a> {
    candidates: Vec<Candidate<'a>>,
    rules: &'a RuleSet,
}

impl<'a> RecordMatcher<'a> {
    /// Prepares `reference` for matching. Fails on an empty collection.
    pub fn new(reference: &'a [ReferenceRecord], rules: &'a RuleSet) -> Result<Self> {
        if reference.is_empty() {
            return Err(MalformedInputError::empty(REFERENCE_INPUT).into());
        }
        Ok(Self {
            candidates: reference.iter().map(Candidate::new).collect(),
            rules,
        })
    }

    /// Resolves a single record. Never fails: no satisfying rule means
    /// [`Resolution::Unresolved`].
    pub fn resolve(&self, record: &IncompleteRecord) -> Resolution {
        let probe = Probe::new(record);
        for rule in self.rules.rules() {
            if !self.rules.applies(rule, &probe) {
                continue;
            }
            if let Some(result) = self.resolve_with(rule, &probe) {
                return Resolution::Resolved(result);
            }
        }
        Resolution::Unresolved
    }

    fn resolve_with(&self, rule: &MatchRule, probe: &Probe<'_>) -> Option<MatchResult> {
        let satisfying: Vec<usize> = self
            .candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| self.rules.satisfies(rule, probe, candidate))
            .map(|(index, _)| index)
            .collect();
        let first = *satisfying.first()?;

        let distinct: BTreeSet<&str> = satisfying
            .iter()
            .map(|&index| self.candidates[index].normalized.as_str())
            .collect();

        let chosen = match self.rules.selection() {
            SelectionPolicy::FirstMatch => first,
            SelectionPolicy::BestScore => {
                let scores: Vec<CandidateScore> = satisfying
                    .iter()
                    .map(|&index| CandidateScore {
                        index,
                        score: prefix_similarity(&probe.fragment, &self.candidates[index].normalized),
                    })
                    .collect();
                best_candidate(&scores).map_or(first, |best| best.index)
            }
        };

        let reference = self.candidates[chosen].record;
        debug!(
            id = %probe.record.id.short(),
            rule = %rule.kind(),
            row = reference.row,
            candidates = satisfying.len(),
            distinct = distinct.len(),
            "rule satisfied"
        );
        Some(MatchResult::resolve(
            probe.record,
            reference,
            rule.kind(),
            distinct.len(),
        ))
    }
}

/// Resolves every incomplete record against `reference` using `rules`.
///
/// Records sharing an id are collapsed to their first occurrence before
/// matching. Each remaining record ends up in exactly one of
/// `matched`/`unmatched`.
///
/// # Errors
///
/// [`crate::MatchError::MalformedInput`] when either collection is empty.
pub fn match_records(
    incomplete: &[IncompleteRecord],
    reference: &[ReferenceRecord],
    rules: &RuleSet,
) -> Result<MatchOutcome> {
    if incomplete.is_empty() {
        return Err(MalformedInputError::empty(INCOMPLETE_INPUT).into());
    }
    let matcher = RecordMatcher::new(reference, rules)?;
    let span = info_span!(
        "match",
        incomplete = incomplete.len(),
        reference = reference.len(),
        rules = rules.rules().len()
    );
    let _guard = span.enter();

    let (records, duplicate_ids) =
        dedupe_by_key(incomplete.iter().collect::<Vec<_>>(), |record| record.id.clone());
    if duplicate_ids > 0 {
        warn!(duplicate_ids, "collapsed incomplete records sharing an id");
    }

    let mut outcome = MatchOutcome {
        stats: MatchStats {
            processed: records.len(),
            duplicate_ids,
            ..MatchStats::default()
        },
        ..MatchOutcome::default()
    };
    let total = records.len();
    for (position, record) in records.into_iter().enumerate() {
        match matcher.resolve(record) {
            Resolution::Resolved(result) => {
                *outcome.stats.by_rule.entry(result.rule).or_insert(0) += 1;
                if result.needs_review {
                    outcome.stats.needs_review += 1;
                }
                outcome.matched.push(result);
                info!(
                    id = %record.id.short(),
                    progress = format_args!("{}/{}", position + 1, total),
                    matched = outcome.matched.len(),
                    unmatched = outcome.unmatched.len(),
                    "resolved record"
                );
            }
            Resolution::Unresolved => {
                outcome.unmatched.push(record.clone());
                warn!(
                    id = %record.id.short(),
                    progress = format_args!("{}/{}", position + 1, total),
                    matched = outcome.matched.len(),
                    unmatched = outcome.unmatched.len(),
                    "no reference record satisfied any rule"
                );
            }
        }
    }

    // At most one result per id.
    let (matched, _) = dedupe_by_key(outcome.matched, |result| result.id.clone());
    outcome.matched = matched;

    info!(
        matched = outcome.matched.len(),
        unmatched = outcome.unmatched.len(),
        needs_review = outcome.stats.needs_review,
        "matching complete"
    );
    Ok(outcome)
}
