//! Heuristics for spotting text that was cut short.

use std::collections::BTreeMap;

/// Function words a complete sentence never ends on.
const DANGLING_WORDS: [&str; 12] = [
    "the", "a", "an", "of", "in", "to", "for", "and", "but", "or", "with", "by",
];

const CLOSING_TAGS: [&str; 2] = ["</p>", "</div>"];

const TERMINAL_PUNCTUATION: [char; 5] = ['.', '?', '!', '"', '\u{201d}'];

/// Length of the trailing window used by [`ending_histogram`].
pub const ENDING_WINDOW: usize = 20;

/// Returns true when `text` looks like it was truncated.
///
/// Flags an ellipsis, a dangling opening `<em>`, a trailing comma, a final
/// function word, or an ending that is neither a closing block tag nor
/// terminal punctuation.
pub fn looks_truncated(text: &str) -> bool {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return true;
    }
    if trimmed.ends_with("...") || trimmed.ends_with('…') {
        return true;
    }
    if trimmed.ends_with("<em>") || trimmed.ends_with(',') {
        return true;
    }
    let last_word = trimmed
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .to_lowercase();
    if trimmed.contains(char::is_whitespace) && DANGLING_WORDS.contains(&last_word.as_str()) {
        return true;
    }
    let closed = CLOSING_TAGS.iter().any(|tag| trimmed.ends_with(tag));
    !closed && !trimmed.ends_with(TERMINAL_PUNCTUATION)
}

/// Returns the last [`ENDING_WINDOW`] characters of `text`.
pub fn ending(text: &str) -> &str {
    let count = text.chars().count();
    match text.char_indices().nth(count.saturating_sub(ENDING_WINDOW)) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Counts trailing endings across `texts`, most common first.
///
/// Equal counts are ordered by the ending text so output is stable.
pub fn ending_histogram<'a, I>(texts: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for text in texts {
        *counts.entry(ending(text)).or_insert(0) += 1;
    }
    let mut ordered: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(ending, count)| (ending.to_string(), count))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ordered.truncate(limit);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_common_truncations() {
        assert!(looks_truncated("The novel was published in"));
        assert!(looks_truncated("A 1811 novel by Jane Austen intro..."));
        assert!(looks_truncated("<p>As the student notes, <em>"));
        assert!(looks_truncated("The researchers found that the individua"));
        assert!(looks_truncated("first,"));
    }

    #[test]
    fn accepts_finished_text() {
        assert!(!looks_truncated("<p>Which choice best states the main idea?</p>"));
        assert!(!looks_truncated("<div>Complete sentence.</div>"));
        assert!(!looks_truncated("It ended."));
    }

    #[test]
    fn histogram_orders_by_count_then_text() {
        let texts = [
            "aaaa the research shows that the",
            "bbbb the research shows that the",
            "short",
        ];
        let histogram = ending_histogram(texts, 10);
        assert_eq!(histogram.len(), 2);
        assert_eq!(histogram[0], ("earch shows that the".to_string(), 2));
        assert_eq!(histogram[1], ("short".to_string(), 1));
    }
}
