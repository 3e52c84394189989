//! Behavioural tests for the record matcher.

use reclaim_match::rules::{Candidate, Probe};
use reclaim_match::{
    MatchConfig, MatchError, MatchRule, PatternTable, RuleSet, SelectionPolicy, match_records,
};
use reclaim_model::{IncompleteRecord, RecordId, ReferenceRecord, RuleKind};

fn record(id: &str, text: &str) -> IncompleteRecord {
    IncompleteRecord::new(RecordId::new(id).unwrap(), text)
}

fn reference(rows: &[&str]) -> Vec<ReferenceRecord> {
    rows.iter()
        .enumerate()
        .map(|(idx, text)| {
            ReferenceRecord::new(*text, format!("https://example.test/q/{}", idx + 1))
                .with_row(idx as u64 + 1)
        })
        .collect()
}

fn keyword_rules() -> RuleSet {
    MatchConfig {
        keywords: vec!["Jane Austen".to_string(), "mimosa tree".to_string()],
        ..MatchConfig::default()
    }
    .build_rule_set(PatternTable::new())
    .unwrap()
}

#[test]
fn jane_austen_record_is_resolved_by_keyword() {
    let reference = reference(&[
        "Torpor Bouts in Alaska ground squirrels were recorded.",
        "The following text is from Jane Austen's 1811 novel Sense and Sensibility.",
    ]);
    let incomplete = vec![record("q1", "A 1811 novel by Jane Austen intro...")];

    let outcome = match_records(&incomplete, &reference, &keyword_rules()).unwrap();

    assert_eq!(outcome.matched.len(), 1);
    assert!(outcome.unmatched.is_empty());
    let result = &outcome.matched[0];
    assert_eq!(result.id.as_str(), "q1");
    assert_eq!(result.resolved_text, reference[1].text);
    assert_eq!(result.rule, RuleKind::KeywordSet);
}

#[test]
fn record_without_overlap_is_unmatched() {
    let reference = reference(&["The following text is from Jane Austen's 1811 novel."]);
    let incomplete = vec![
        record("q1", "A 1811 novel by Jane Austen intro..."),
        record("q2", "Quantum dots emit light at sizes that"),
    ];

    let outcome = match_records(&incomplete, &reference, &keyword_rules()).unwrap();

    assert_eq!(outcome.matched.len(), 1);
    assert_eq!(outcome.matched[0].id.as_str(), "q1");
    assert_eq!(outcome.unmatched, vec![incomplete[1].clone()]);
}

#[test]
fn empty_reference_is_malformed_input() {
    let incomplete = vec![record("q1", "anything")];
    let err = match_records(&incomplete, &[], &keyword_rules()).unwrap_err();
    let MatchError::MalformedInput(malformed) = err else {
        panic!("expected malformed input");
    };
    assert!(malformed.is_empty_collection());
}

#[test]
fn first_match_selects_earlier_reference() {
    let reference = reference(&[
        "Edith Wharton's 1905 novel The House of Mirth, first excerpt.",
        "Edith Wharton's 1905 novel The House of Mirth, second excerpt.",
    ]);
    let rules = RuleSet::new(vec![MatchRule::ExactPhrase]).with_patterns(
        PatternTable::from_pairs([("q1", "Edith Wharton's 1905.*House of Mirth")]).unwrap(),
    );

    let outcome = match_records(&[record("q1", "Edith Wharton")], &reference, &rules).unwrap();

    let result = &outcome.matched[0];
    assert_eq!(result.reference_row, 1);
    assert_eq!(result.candidates, 2);
    assert!(result.needs_review);
    assert_eq!(outcome.stats.needs_review, 1);
}

#[test]
fn exact_phrase_beats_fallback_for_registered_ids() {
    let reference = reference(&[
        "While researching a topic, a student has taken the following notes: bridges.",
        "Akashi Kaikyo Bridge in Japan has the longest central span.",
    ]);
    let patterns = PatternTable::from_pairs([("q1", "Akashi Kaikyo Bridge.*Japan")]).unwrap();
    let rules = MatchConfig::default().build_rule_set(patterns).unwrap();
    let incomplete = vec![
        record("q1", "While researching a topic, a student has taken the following notes"),
        record("q2", "While researching a topic, a student has taken the following notes"),
    ];

    let outcome = match_records(&incomplete, &reference, &rules).unwrap();

    assert_eq!(outcome.matched.len(), 2);
    assert_eq!(outcome.matched[0].reference_row, 2);
    assert_eq!(outcome.matched[0].rule, RuleKind::ExactPhrase);
    // q2 has no registered pattern; prefix containment fires before the fallback.
    assert_eq!(outcome.matched[1].rule, RuleKind::PrefixContainment);
    assert_eq!(outcome.stats.by_rule.get(&RuleKind::ExactPhrase), Some(&1));
}

#[test]
fn registered_pattern_without_hit_does_not_fall_back() {
    let reference = reference(&[
        "While researching a topic, a student has taken the following notes: whales.",
    ]);
    let patterns = PatternTable::from_pairs([("q1", "dhow.*triangular sails")]).unwrap();
    let config = MatchConfig {
        rules: vec![RuleKind::ExactPhrase, RuleKind::FallbackGeneric],
        ..MatchConfig::default()
    };
    let rules = config.build_rule_set(patterns).unwrap();

    let outcome = match_records(
        &[record("q1", "While researching a topic, a student has taken notes")],
        &reference,
        &rules,
    )
    .unwrap();

    assert!(outcome.matched.is_empty());
    assert_eq!(outcome.unmatched.len(), 1);
}

#[test]
fn unregistered_notes_record_cut_early_falls_back() {
    let reference = reference(&[
        "The mimosa tree evolved in East Asia.",
        "While researching a topic, a student has taken the following notes: Pando.",
    ]);
    let incomplete = vec![record("cmf863i1x00tuv67morrrko61", "<p>While researching a topic, a")];
    let config = MatchConfig {
        rules: vec![RuleKind::ExactPhrase, RuleKind::FallbackGeneric],
        ..MatchConfig::default()
    };

    let rules = config.build_rule_set(PatternTable::new()).unwrap();
    let outcome = match_records(&incomplete, &reference, &rules).unwrap();
    assert_eq!(outcome.matched.len(), 1);
    assert_eq!(outcome.matched[0].rule, RuleKind::FallbackGeneric);
    assert_eq!(outcome.matched[0].reference_row, 2);

    let strict = MatchConfig {
        fallback_requires_fragment: true,
        ..config
    }
    .build_rule_set(PatternTable::new())
    .unwrap();
    let outcome = match_records(&incomplete, &reference, &strict).unwrap();
    assert!(outcome.matched.is_empty());
    assert_eq!(outcome.unmatched.len(), 1);
}

#[test]
fn best_score_resolves_near_duplicates_by_similarity() {
    let reference = reference(&[
        "Hydrogen bonds form between adjacent molecules of ice.",
        "Hydrogen bonds form between adjacent molecules of water in liquid form.",
    ]);
    let rules = RuleSet::new(vec![MatchRule::keywords(["adjacent molecules"])])
        .with_selection(SelectionPolicy::BestScore);

    let outcome = match_records(
        &[record("q1", "Hydrogen bonds form between adjacent molecules of water in")],
        &reference,
        &rules,
    )
    .unwrap();

    assert_eq!(outcome.matched[0].reference_row, 2);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn rules(selection: SelectionPolicy) -> RuleSet {
        RuleSet::new(vec![MatchRule::prefix(4), MatchRule::keywords(["ab", "ca"])])
            .with_selection(selection)
    }

    fn build(texts: &[String], refs: &[String]) -> (Vec<IncompleteRecord>, Vec<ReferenceRecord>) {
        let incomplete = texts
            .iter()
            .enumerate()
            .map(|(idx, text)| record(&format!("id-{idx}"), text))
            .collect();
        let reference = refs
            .iter()
            .enumerate()
            .map(|(idx, text)| ReferenceRecord::new(text.clone(), format!("u{idx}")).with_row(idx as u64 + 1))
            .collect();
        (incomplete, reference)
    }

    proptest! {
        #[test]
        fn every_record_lands_in_exactly_one_list(
            texts in prop::collection::vec("[abc ]{0,10}", 1..12),
            refs in prop::collection::vec("[abc ]{1,14}", 1..10),
        ) {
            let (incomplete, reference) = build(&texts, &refs);
            let outcome = match_records(&incomplete, &reference, &rules(SelectionPolicy::FirstMatch)).unwrap();

            let mut seen: Vec<&str> = outcome.matched.iter().map(|m| m.id.as_str()).collect();
            seen.extend(outcome.unmatched.iter().map(|r| r.id.as_str()));
            seen.sort_unstable();
            let mut expected: Vec<&str> = incomplete.iter().map(|r| r.id.as_str()).collect();
            expected.sort_unstable();
            prop_assert_eq!(seen, expected);

            let unmatched_ids: Vec<&RecordId> = outcome.unmatched.iter().map(|r| &r.id).collect();
            let filtered: Vec<&RecordId> = incomplete
                .iter()
                .map(|r| &r.id)
                .filter(|id| outcome.unmatched.iter().any(|u| &u.id == *id))
                .collect();
            prop_assert_eq!(unmatched_ids, filtered);
        }

        #[test]
        fn matching_is_deterministic(
            texts in prop::collection::vec("[abc ]{0,10}", 1..12),
            refs in prop::collection::vec("[abc ]{1,14}", 1..10),
            best in any::<bool>(),
        ) {
            let (incomplete, reference) = build(&texts, &refs);
            let selection = if best { SelectionPolicy::BestScore } else { SelectionPolicy::FirstMatch };
            let first = match_records(&incomplete, &reference, &rules(selection)).unwrap();
            let second = match_records(&incomplete, &reference, &rules(selection)).unwrap();
            prop_assert_eq!(first.matched, second.matched);
            prop_assert_eq!(first.unmatched, second.unmatched);
        }

        #[test]
        fn first_match_never_skips_an_earlier_reference(
            texts in prop::collection::vec("[abc ]{0,10}", 1..12),
            refs in prop::collection::vec("[abc ]{1,14}", 1..10),
        ) {
            let (incomplete, reference) = build(&texts, &refs);
            let rule_set = rules(SelectionPolicy::FirstMatch);
            let outcome = match_records(&incomplete, &reference, &rule_set).unwrap();

            for result in &outcome.matched {
                let source = incomplete.iter().find(|r| r.id == result.id).unwrap();
                let probe = Probe::new(source);
                let rule = rule_set.rules().iter().find(|r| r.kind() == result.rule).unwrap();
                let earlier_hit = reference
                    .iter()
                    .take_while(|r| r.row < result.reference_row)
                    .any(|r| rule_set.satisfies(rule, &probe, &Candidate::new(r)));
                prop_assert!(!earlier_hit);
            }
        }
    }
}
