//! Age and size bounded pruning for `DashMap` caches.

use dashmap::DashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

pub trait CacheEntry {
    fn fetched_at(&self) -> Instant;

    fn is_fresh(&self, max_age: Duration) -> bool {
        self.fetched_at().elapsed() <= max_age
    }
}

/// Drop entries older than `max_age`, then the oldest until at most
/// `max_entries` remain.
pub fn prune_cache<K, V>(cache: &DashMap<K, V>, max_entries: usize, max_age: Duration)
where
    K: Clone + Eq + Hash,
    V: CacheEntry,
{
    let mut entries: Vec<(K, Instant)> = cache
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().fetched_at()))
        .collect();

    entries.retain(|(key, fetched_at)| {
        if fetched_at.elapsed() > max_age {
            cache.remove(key);
            false
        } else {
            true
        }
    });

    if cache.len() <= max_entries {
        return;
    }

    entries.sort_by_key(|(_, fetched_at)| *fetched_at);
    for (key, _) in entries {
        if cache.len() <= max_entries {
            break;
        }
        cache.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stamp(Instant);

    impl CacheEntry for Stamp {
        fn fetched_at(&self) -> Instant {
            self.0
        }
    }

    #[test]
    fn prunes_expired_then_oldest() {
        let now = Instant::now();
        let cache: DashMap<&str, Stamp> = DashMap::new();
        cache.insert("stale", Stamp(now - Duration::from_secs(120)));
        cache.insert("older", Stamp(now - Duration::from_secs(20)));
        cache.insert("newer", Stamp(now - Duration::from_secs(10)));
        cache.insert("newest", Stamp(now));

        prune_cache(&cache, 2, Duration::from_secs(60));

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains_key("stale"));
        assert!(!cache.contains_key("older"));
        assert!(cache.contains_key("newest"));
    }

    #[test]
    fn freshness_uses_max_age() {
        let entry = Stamp(Instant::now() - Duration::from_secs(30));
        assert!(entry.is_fresh(Duration::from_secs(60)));
        assert!(!entry.is_fresh(Duration::from_secs(5)));
    }
}
