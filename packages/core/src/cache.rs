//! Time-to-live cache shared by the lookup flows.
//!
//! Entries expire `ttl` after insertion. Concurrent writers for the same key
//! race and the last write wins; cached values are eventually-consistent
//! snapshots, not authoritative state.
//!
//! Time comes from `tokio::time::Instant`, so tests can drive expiry with a
//! paused clock.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (V, Instant)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh value for `key`, if any. Expired entries are dropped on read.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();
        let fresh = entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(value, _)| value.clone());
        if fresh.is_none() {
            entries.remove(key);
        }
        fresh
    }

    /// Store `value` for one TTL. Expired entries of other keys are dropped
    /// here, so keys that are never read again do not pile up.
    pub fn insert(&self, key: K, value: V) {
        let now = Instant::now();
        let mut entries = self.lock();
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key, (value, now + self.ttl));
    }

    /// Number of stored entries, expired ones included until the next insert.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned lock only means another thread panicked mid-insert; the map
    // itself is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<K, (V, Instant)>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_fresh_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("p-1".to_string(), 7);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get(&"p-1".to_string()), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("p-1".to_string(), 7);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get(&"p-1".to_string()), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reinsert_refreshes_expiry() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.insert(1, "old");
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.insert(1, "new");
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get(&1), Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_drops_expired_entries() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.insert(1, ());
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.insert(2, ());
        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cache.len(), 2);

        cache.insert(3, ());
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&1).is_none());
        assert!(cache.get(&2).is_some());
        assert!(cache.get(&3).is_some());
    }
}
