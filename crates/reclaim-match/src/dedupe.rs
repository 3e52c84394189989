//! Order-preserving removal of items with repeated keys.

use std::collections::BTreeSet;

/// Drops items whose key was already seen, keeping the first occurrence.
///
/// Returns the kept items in their original order and the number dropped.
pub fn dedupe_by_key<T, K, F>(items: Vec<T>, mut key: F) -> (Vec<T>, usize)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut seen = BTreeSet::new();
    let before = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
