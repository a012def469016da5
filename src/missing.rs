//! Tracking of keys that failed to resolve.

use std::collections::BTreeSet;

/// Deduplicated set of unresolved keys.
///
/// Keys are kept ordered so [`MissingKeyTracker::missing_keys`] is
/// deterministic regardless of insertion order.
#[derive(Debug, Clone, Default)]
pub struct MissingKeyTracker {
    /// Recorded keys, sorted
    keys: BTreeSet<String>,
}

impl MissingKeyTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a miss. Returns `true` the first time a key is seen.
    pub fn record_miss(&mut self, key: &str) -> bool {
        if self.keys.contains(key) {
            return false;
        }
        self.keys.insert(key.to_string())
    }

    /// All recorded keys in ascending order.
    #[must_use]
    pub fn missing_keys(&self) -> Vec<String> {
        self.keys.iter().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn repeated_misses_are_recorded_once() {
        let mut tracker = MissingKeyTracker::new();

        expect_that!(tracker.record_miss("missing.key"), eq(true));
        expect_that!(tracker.record_miss("missing.key"), eq(false));
        expect_that!(tracker.record_miss("missing.key"), eq(false));

        expect_that!(tracker.missing_keys(), elements_are![eq("missing.key")]);
    }

    #[googletest::test]
    fn keys_are_sorted() {
        let mut tracker = MissingKeyTracker::new();
        tracker.record_miss("zzz.missing");
        tracker.record_miss("aaa.missing");
        tracker.record_miss("mmm.missing");

        expect_that!(
            tracker.missing_keys(),
            elements_are![eq("aaa.missing"), eq("mmm.missing"), eq("zzz.missing")]
        );
    }

    #[googletest::test]
    fn clear_empties_the_set() {
        let mut tracker = MissingKeyTracker::new();
        tracker.record_miss("a");
        tracker.record_miss("b");

        tracker.clear();

        expect_that!(tracker.is_empty(), eq(true));
        expect_that!(tracker.contains("a"), eq(false));
        expect_that!(tracker.record_miss("a"), eq(true));
        expect_that!(tracker.len(), eq(1));
    }
}
