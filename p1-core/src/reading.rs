use serde::Serialize;
use std::collections::BTreeMap;

/// Final, filtered output of one telegram: registry tag to numeric value
///
/// Backed by a `BTreeMap` so iteration is in ascending lexicographic tag
/// order, which keeps exports and test expectations deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadingSet {
    readings: BTreeMap<String, f64>,
}

impl ReadingSet {
    /// Create an empty reading set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reading, replacing any previous value for the tag
    pub fn insert(&mut self, tag: impl Into<String>, value: f64) {
        self.readings.insert(tag.into(), value);
    }

    /// Get a reading by tag
    pub fn get(&self, tag: &str) -> Option<f64> {
        self.readings.get(tag).copied()
    }

    /// Iterate readings in ascending tag order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.readings.iter().map(|(tag, value)| (tag.as_str(), *value))
    }

    /// Number of readings
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the set contains no readings
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl<'a> IntoIterator for &'a ReadingSet {
    type Item = (&'a String, &'a f64);
    type IntoIter = std::collections::btree_map::Iter<'a, String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
