use serde::Serialize;
use std::collections::BTreeMap;

/// Occurrence count per key, iterated in lexicographic key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    counts: BTreeMap<String, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Keys present here but missing from `other`, sorted, with their counts.
    pub fn keys_not_in<'a>(&'a self, other: &FrequencyTable) -> Vec<(&'a str, u64)> {
        self.iter().filter(|(k, _)| !other.contains(k)).collect()
    }

    /// Entries sorted ascending by count, ties broken by key.
    pub fn sorted_by_frequency(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The `n` most frequent entries, still in ascending order.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let sorted = self.sorted_by_frequency();
        let skip = sorted.len().saturating_sub(n);
        sorted.into_iter().skip(skip).collect()
    }
}

/// Insert every key missing from either table with count 0.
///
/// Afterwards both tables hold the same key set, so their values line up
/// position by position.
pub fn align(left: &mut FrequencyTable, right: &mut FrequencyTable) {
    for key in left.counts.keys() {
        right.counts.entry(key.clone()).or_insert(0);
    }
    for key in right.counts.keys() {
        left.counts.entry(key.clone()).or_insert(0);
    }
}

/// Paired count vectors over the union of keys, in key order.
pub fn aligned_vectors(left: &FrequencyTable, right: &FrequencyTable) -> (Vec<f64>, Vec<f64>) {
    let (mut left, mut right) = (left.clone(), right.clone());
    align(&mut left, &mut right);
    let values = |t: &FrequencyTable| -> Vec<f64> { t.iter().map(|(_, v)| v as f64).collect() };
    (values(&left), values(&right))
}

/// Each count as a percentage of `total`.
pub fn percentages(entries: &[(&str, u64)], total: usize) -> Vec<(String, f64)> {
    entries
        .iter()
        .map(|(k, v)| {
            let pct = if total == 0 {
                0.0
            } else {
                *v as f64 * 100.0 / total as f64
            };
            (k.to_string(), pct)
        })
        .collect()
}

impl<'a> FromIterator<&'a str> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.increment(key);
        }
        table
    }
}
