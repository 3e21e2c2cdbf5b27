//! Ordered key-merge over two keyed streams.
//!
//! Pairs up the values of two `(key, value)` sequences by key. Every key that
//! appears on either side is emitted exactly once, with the value from each
//! side (or the default when that side lacks the key).
//!
//! Each side is collected into a map first, so a key repeated within one side
//! keeps its last value. Emission order is unspecified; callers that need a
//! stable order sort the output.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Merges two keyed sequences, reporting absent values as `None`.
pub fn merge<K, V, L, R>(left: L, right: R) -> Vec<(K, (Option<V>, Option<V>))>
where
    K: Eq + Hash + Clone,
    L: IntoIterator<Item = (K, V)>,
    R: IntoIterator<Item = (K, V)>,
{
    let mut left: HashMap<K, V> = left.into_iter().collect();
    let mut right: HashMap<K, V> = right.into_iter().collect();

    let keys: HashSet<K> = left.keys().chain(right.keys()).cloned().collect();
    keys.into_iter()
        .map(|key| {
            let l = left.remove(&key);
            let r = right.remove(&key);
            (key, (l, r))
        })
        .collect()
}

/// Merges two keyed sequences, substituting `default` for absent values.
pub fn merge_with_default<K, V, L, R>(left: L, right: R, default: V) -> Vec<(K, (V, V))>
where
    K: Eq + Hash + Clone,
    V: Clone,
    L: IntoIterator<Item = (K, V)>,
    R: IntoIterator<Item = (K, V)>,
{
    merge(left, right)
        .into_iter()
        .map(|(key, (l, r))| {
            let l = l.unwrap_or_else(|| default.clone());
            let r = r.unwrap_or_else(|| default.clone());
            (key, (l, r))
        })
        .collect()
}
