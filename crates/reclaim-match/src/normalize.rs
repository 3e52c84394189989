//! Text normalization applied before comparing truncated and full texts.
//!
//! Canonical procedure: strip markup, decode common entities, collapse
//! whitespace, trim. Truncated fragments additionally lose a trailing
//! ellipsis so the truncation marker never takes part in a comparison.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(?:br|hr|/p|/div|/li|/h[1-6]|/tr|/td|/blockquote)\b[^>]*>")
        .expect("block tag regex")
});
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));

const ENTITIES: [(&str, &str); 7] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    // Last so "&amp;lt;" decodes to "&lt;", not "<".
    ("&amp;", "&"),
];

/// Removes markup tags. Block-level boundaries become spaces, inline tags
/// vanish so `Jane <em>Austen</em>'s` stays one phrase.
pub fn strip_markup(raw: &str) -> String {
    let spaced = BLOCK_TAG.replace_all(raw, " ");
    ANY_TAG.replace_all(&spaced, "").into_owned()
}

fn decode_entities(raw: &str) -> String {
    let mut out = raw.to_string();
    for (entity, replacement) in ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }
    out
}

/// Normalizes a full text for comparison.
pub fn normalize_text(raw: &str) -> String {
    decode_entities(&strip_markup(raw))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes a possibly truncated fragment: [`normalize_text`] plus removal
/// of a trailing `...` or `…`.
pub fn normalize_fragment(raw: &str) -> String {
    let normalized = normalize_text(raw);
    let trimmed = normalized
        .trim_end_matches(['.', '…'])
        .trim_end()
        .to_string();
    // A fragment ending in a single full stop is a finished sentence.
    if normalized.ends_with("..") || normalized.ends_with('…') {
        trimmed
    } else {
        normalized
    }
}

/// Returns the first `length` characters of `text`.
pub fn char_prefix(text: &str, length: usize) -> &str {
    match text.char_indices().nth(length) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
