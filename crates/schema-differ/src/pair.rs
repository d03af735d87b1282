use std::collections::HashSet;
use std::hash::Hash;

use indexmap::IndexMap;

/// A before/after view used throughout the differ to line up a value from
/// the current schema against its counterpart in the desired schema.
#[derive(Debug, Clone, Copy)]
pub struct Pair<T> {
    previous: T,
    next: T,
}

impl<T> Pair<T> {
    pub fn new(previous: T, next: T) -> Self {
        Self { previous, next }
    }

    pub fn previous(&self) -> &T {
        &self.previous
    }

    pub fn next(&self) -> &T {
        &self.next
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Pair<U> {
        Pair::new(f(&self.previous), f(&self.next))
    }
}

/// Lines up two slices by a shared key, yielding one [`Pair`] per distinct
/// key with `None` on whichever side lacks a matching item. Items present
/// in `previous` keep their original order; items only present in `next`
/// are appended afterwards in `next`'s order.
pub fn interleave<'a, T, K, F>(previous: &'a [T], next: &'a [T], key: F) -> Vec<Pair<Option<&'a T>>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut next_by_key: IndexMap<K, &T> = IndexMap::new();
    for item in next {
        next_by_key.insert(key(item), item);
    }

    let mut matched: HashSet<K> = HashSet::new();
    let mut result = Vec::with_capacity(previous.len() + next.len());

    for item in previous {
        let k = key(item);
        let counterpart = next_by_key.get(&k).copied();
        if counterpart.is_some() {
            matched.insert(k);
        } else {
            result.push(Pair::new(Some(item), None));
            continue;
        }
        result.push(Pair::new(Some(item), counterpart));
    }

    for item in next {
        let k = key(item);
        if !matched.contains(&k) {
            result.push(Pair::new(None, Some(item)));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaves_matched_and_unmatched_items() {
        let previous = vec!["a".to_string(), "b".to_string()];
        let next = vec!["b".to_string(), "c".to_string()];

        let pairs = interleave(&previous, &next, |s| s.clone());

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].previous(), &Some(&"a".to_string()));
        assert_eq!(pairs[0].next(), &None);
        assert_eq!(pairs[1].previous(), &Some(&"b".to_string()));
        assert_eq!(pairs[1].next(), &Some(&"b".to_string()));
        assert_eq!(pairs[2].previous(), &None);
        assert_eq!(pairs[2].next(), &Some(&"c".to_string()));
    }
}
