//! Frequency counting with first-seen tie-breaking, plus the merge used to
//! combine per-chunk partial tables.

use ahash::AHashMap;
use serde::Serialize;
use std::hash::Hash;

/// One `(key, count)` row of a ranked result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedEntry<K> {
    pub key: K,
    pub count: u64,
}

impl<K> RankedEntry<K> {
    pub fn new(key: K, count: u64) -> Self {
        Self { key, count }
    }
}

impl<K> From<(K, u64)> for RankedEntry<K> {
    fn from((key, count): (K, u64)) -> Self {
        Self { key, count }
    }
}

/// Counts occurrences per key and extracts the K most frequent.
///
/// Entries are kept in the order their key was first seen; `top_k` uses a
/// stable sort, so equal counts rank by first occurrence.
#[derive(Clone, Debug)]
pub struct TopKFrequencyCounter<K> {
    slots: AHashMap<K, usize>,
    entries: Vec<(K, u64)>,
    total: u64,
}

impl<K> Default for TopKFrequencyCounter<K> {
    fn default() -> Self {
        Self { slots: AHashMap::new(), entries: Vec::new(), total: 0 }
    }
}

impl<K: Eq + Hash + Clone> TopKFrequencyCounter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: K, n: u64) {
        self.total += n;
        if let Some(&i) = self.slots.get(&key) {
            self.entries[i].1 += n;
            return;
        }
        self.slots.insert(key.clone(), self.entries.len());
        self.entries.push((key, n));
    }

    pub fn get(&self, key: &K) -> u64 {
        self.slots.get(key).map(|&i| self.entries[i].1).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every increment observed so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Sum `other` into `self`. Keys new to `self` are appended in `other`'s
    /// first-seen order, so folding chunk counters in chunk order yields the
    /// same ranking as counting the whole sequence at once.
    pub fn merge(&mut self, other: Self) {
        for (k, n) in other.entries {
            self.add(k, n);
        }
    }

    /// The first-seen key with the highest count.
    pub fn most_frequent(&self) -> Option<(&K, u64)> {
        let mut best: Option<(&K, u64)> = None;
        for (k, n) in &self.entries {
            match best {
                Some((_, b)) if *n <= b => {}
                _ => best = Some((k, *n)),
            }
        }
        best
    }

    /// The `k` highest counts, descending. Fewer than `k` keys returns all of them.
    pub fn top_k(&self, k: usize) -> Vec<RankedEntry<K>> {
        let mut order: Vec<&(K, u64)> = self.entries.iter().collect();
        // stable: equal counts keep first-seen order
        order.sort_by(|a, b| b.1.cmp(&a.1));
        order.into_iter().take(k).map(|(key, n)| RankedEntry::new(key.clone(), *n)).collect()
    }

    pub fn into_top_k(self, k: usize) -> Vec<RankedEntry<K>> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(k);
        entries.into_iter().map(RankedEntry::from).collect()
    }
}

impl<K: Eq + Hash + Clone> Extend<K> for TopKFrequencyCounter<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            self.increment(k);
        }
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for TopKFrequencyCounter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut c = Self::new();
        c.extend(iter);
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(v: Vec<RankedEntry<&'static str>>) -> Vec<(&'static str, u64)> {
        v.into_iter().map(|e| (e.key, e.count)).collect()
    }

    #[test]
    fn counts_and_orders_descending() {
        let c: TopKFrequencyCounter<&str> = ["a", "b", "b", "c", "c", "c"].into_iter().collect();
        assert_eq!(pairs(c.top_k(10)), vec![("c", 3), ("b", 2), ("a", 1)]);
        assert_eq!(c.total(), 6);
        assert_eq!(c.get(&"b"), 2);
        assert_eq!(c.get(&"zzz"), 0);
    }

    #[test]
    fn ties_rank_by_first_occurrence() {
        let c: TopKFrequencyCounter<&str> = ["x", "y", "z", "z", "y", "x"].into_iter().collect();
        assert_eq!(pairs(c.top_k(3)), vec![("x", 2), ("y", 2), ("z", 2)]);
        assert_eq!(c.most_frequent(), Some((&"x", 2)));
    }

    #[test]
    fn truncates_to_k_without_padding() {
        let c: TopKFrequencyCounter<&str> = ["a", "b", "c", "a"].into_iter().collect();
        assert_eq!(pairs(c.top_k(2)), vec![("a", 2), ("b", 1)]);
        assert_eq!(c.top_k(50).len(), 3);
        assert!(TopKFrequencyCounter::<&str>::new().top_k(10).is_empty());
        assert_eq!(TopKFrequencyCounter::<&str>::new().most_frequent(), None);
    }

    #[test]
    fn top_k_is_bounded_by_k_and_total() {
        let keys = ["q", "w", "e", "r", "t", "y", "u", "i", "o", "p", "a", "s", "q", "w", "q"];
        let c: TopKFrequencyCounter<&str> = keys.into_iter().collect();
        let top = c.top_k(10);
        assert!(top.len() <= 10);
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(top.iter().map(|e| e.count).sum::<u64>() <= c.total());
        assert!(c.top_k(0).is_empty());
        assert!(c.into_top_k(0).is_empty());
    }

    #[test]
    fn chunked_merge_matches_single_pass() {
        let seq = ["b", "a", "c", "a", "d", "b", "c", "e", "d", "e"];
        let whole: TopKFrequencyCounter<&str> = seq.into_iter().collect();

        let mut merged: TopKFrequencyCounter<&str> = TopKFrequencyCounter::new();
        for chunk in seq.chunks(3) {
            merged.merge(chunk.iter().copied().collect());
        }
        assert_eq!(merged.top_k(10), whole.top_k(10));
        assert_eq!(merged.total(), whole.total());
        assert_eq!(pairs(merged.into_top_k(2)), vec![("b", 2), ("a", 2)]);
    }
}
