//! Similarity scoring between a truncated fragment and a candidate text.
//!
//! Uses Jaro-Winkler similarity on the fragment against the equally long
//! prefix of the candidate, so a faithful truncation of a long passage
//! scores close to 1.0 regardless of how much text follows it.

use std::cmp::Ordering;

use rapidfuzz::distance::jaro_winkler;

use crate::normalize::char_prefix;

/// Score for one candidate of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore {
    /// Position of the candidate in the reference collection.
    pub index: usize,
    /// Similarity in `0.0..=1.0`.
    pub score: f64,
}

/// Similarity of normalized `fragment` to the start of normalized `candidate`.
pub fn prefix_similarity(fragment: &str, candidate: &str) -> f64 {
    if fragment.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    let length = fragment.chars().count();
    let head = char_prefix(candidate, length);
    jaro_winkler::similarity(fragment.chars(), head.chars())
}

/// Picks the highest-scoring candidate; ties go to the lowest index.
pub fn best_candidate(scores: &[CandidateScore]) -> Option<CandidateScore> {
    scores.iter().copied().reduce(|best, next| {
        match next.score.partial_cmp(&best.score).unwrap_or(Ordering::Equal) {
            Ordering::Greater => next,
            Ordering::Equal if next.index < best.index => next,
            _ => best,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_truncation_scores_one() {
        let score = prefix_similarity(
            "The mimosa tree evolved",
            "The mimosa tree evolved in East Asia, where its main pollinators",
        );
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unrelated_text_scores_lower() {
        let close = prefix_similarity("Jane Austen's 1811 novel", "Jane Austen's 1811 novel Sense");
        let far = prefix_similarity("Jane Austen's 1811 novel", "Torpor bouts in Alaska squirrels");
        assert!(close > far);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(prefix_similarity("", "abc"), 0.0);
        assert_eq!(prefix_similarity("abc", ""), 0.0);
    }

    #[test]
    fn ties_prefer_earliest_candidate() {
        let scores = [
            CandidateScore { index: 4, score: 0.9 },
            CandidateScore { index: 2, score: 0.9 },
            CandidateScore { index: 7, score: 0.5 },
        ];
        assert_eq!(best_candidate(&scores).map(|c| c.index), Some(2));
        assert_eq!(best_candidate(&[]), None);
    }
}
