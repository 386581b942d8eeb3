//! Concurrent per-identifier date range accumulation

use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rangeindex_core::DateRange;

/// Map from identifier to the range of dates it has been observed on.
///
/// Safe to share between partition scans. Each update is applied while
/// holding the lock of the shard owning the identifier, so concurrent
/// observations of the same identifier never lose an extension and
/// unrelated identifiers rarely contend.
#[derive(Debug, Default)]
pub struct RangeAccumulator {
    ranges: DashMap<String, DateRange>,
}

impl RangeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` was present on `date`
    pub fn observe(&self, id: &str, date: NaiveDate) {
        // `get_mut` avoids allocating a key for identifiers already seen
        if let Some(mut range) = self.ranges.get_mut(id) {
            if !range.contains(date) {
                *range = range.extended(date);
            }
            return;
        }

        match self.ranges.entry(id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let extended = occupied.get().extended(date);
                occupied.insert(extended);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(DateRange::single(id, date));
            }
        }
    }

    /// Current range of `id`, if it has been observed
    pub fn get(&self, id: &str) -> Option<DateRange> {
        self.ranges.get(id).map(|range| range.value().clone())
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Consume the accumulator, returning every range ordered by identifier
    pub fn into_snapshot(self) -> Vec<DateRange> {
        let mut ranges: Vec<DateRange> = self.ranges.into_iter().map(|(_, range)| range).collect();
        ranges.sort_unstable_by(|a, b| a.id().cmp(b.id()));
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_observation_creates_single_day_range() {
        let acc = RangeAccumulator::new();
        acc.observe("a", date(2023, 1, 2));

        let range = acc.get("a").unwrap();
        assert_eq!(range.from(), date(2023, 1, 2));
        assert_eq!(range.to(), date(2023, 1, 2));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_observations_extend_in_both_directions() {
        let acc = RangeAccumulator::new();
        acc.observe("a", date(2023, 1, 5));
        acc.observe("a", date(2023, 1, 3));
        acc.observe("a", date(2023, 1, 9));
        acc.observe("a", date(2023, 1, 4));

        let range = acc.get("a").unwrap();
        assert_eq!(range.from(), date(2023, 1, 3));
        assert_eq!(range.to(), date(2023, 1, 9));
    }

    #[test]
    fn test_snapshot_is_sorted_by_id() {
        let acc = RangeAccumulator::new();
        acc.observe("c", date(2023, 1, 1));
        acc.observe("a", date(2023, 1, 1));
        acc.observe("b", date(2023, 1, 1));

        let ids: Vec<String> = acc
            .into_snapshot()
            .into_iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_concurrent_observations_keep_true_bounds() {
        let acc = Arc::new(RangeAccumulator::new());
        let start = date(2020, 1, 1);

        // Each thread sees the shared id on different days, interleaved
        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let acc = Arc::clone(&acc);
                std::thread::spawn(move || {
                    for i in 0..500u64 {
                        let day = start + chrono::Days::new(i * 8 + t);
                        acc.observe("shared", day);
                        acc.observe(&format!("own-{}", t), day);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let acc = Arc::try_unwrap(acc).unwrap();
        let shared = acc.get("shared").unwrap();
        assert_eq!(shared.from(), start);
        assert_eq!(shared.to(), start + chrono::Days::new(499 * 8 + 7));

        for t in 0..8u64 {
            let own = acc.get(&format!("own-{}", t)).unwrap();
            assert_eq!(own.from(), start + chrono::Days::new(t));
            assert_eq!(own.to(), start + chrono::Days::new(499 * 8 + t));
        }
        assert_eq!(acc.len(), 9);
    }
}
