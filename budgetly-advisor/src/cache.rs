//! Day-scoped memoization for advisor results.
//!
//! Values are keyed by (content key, calendar day) and live until the day
//! rolls over. Inserting under a new day evicts everything from previous
//! days, so the map stays bounded by one day's worth of lookups instead of
//! growing for the process lifetime. Concurrent callers may race to
//! populate the same key; values are idempotent, so last-write-wins is
//! harmless.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug)]
pub struct DayCache<V> {
    inner: Mutex<HashMap<(String, NaiveDate), V>>,
}

impl<V> Default for DayCache<V> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> DayCache<V> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str, day: NaiveDate) -> Option<V> {
        let map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.get(&(key.to_string(), day)).cloned()
    }

    pub fn insert(&self, key: impl Into<String>, day: NaiveDate, value: V) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.retain(|(_, d), _| *d == day);
        map.insert((key.into(), day), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn test_hit_within_same_day() {
        let cache: DayCache<u32> = DayCache::new();
        cache.insert("sig", day(24), 7);
        assert_eq!(cache.get("sig", day(24)), Some(7));
        assert_eq!(cache.get("other", day(24)), None);
    }

    #[test]
    fn test_miss_after_day_rollover() {
        let cache: DayCache<u32> = DayCache::new();
        cache.insert("sig", day(24), 7);
        assert_eq!(cache.get("sig", day(25)), None);
    }

    #[test]
    fn test_previous_day_entries_evicted_on_insert() {
        let cache: DayCache<u32> = DayCache::new();
        let yesterday = day(24) - Duration::days(1);
        cache.insert("old", yesterday, 1);
        cache.insert("new", day(24), 2);
        // yesterday's entry is gone even when asked for under its own day
        assert_eq!(cache.get("old", yesterday), None);
        assert_eq!(cache.get("new", day(24)), Some(2));
    }
}
