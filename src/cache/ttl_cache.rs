//! In-memory cache with lazy time-based expiry
//!
//! Entries are replaced whole on `put` and read under a shared lock, so
//! concurrent readers never observe a partially written value. Expiry is
//! checked at read time; the optional background task only reclaims memory.

use super::clock::{Clock, SystemClock};
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Initial capacity for the entry map
const INITIAL_CAPACITY: usize = 64;

/// Interval of the background purge task
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently stored, expired or not
    pub size: usize,
    pub ttl: Duration,
    pub hits: u64,
    pub misses: u64,
}

/// String-keyed cache whose entries expire `ttl` after insertion
pub struct TtlCache<V> {
    namespace: &'static str,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache backed by the system clock
    #[must_use]
    pub fn new(namespace: &'static str, ttl: Duration) -> Self {
        Self::with_clock(namespace, ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source
    #[must_use]
    pub fn with_clock(namespace: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            namespace,
            ttl,
            entries: RwLock::new(HashMap::with_capacity(INITIAL_CAPACITY)),
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    #[inline]
    fn is_expired(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) >= self.ttl
    }

    /// Look up a live entry
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();

        let expired = {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !self.is_expired(entry, now) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!("{} cache hit: {key}", self.namespace);
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            let mut entries = self.entries.write();
            // Re-check: a fresh value may have been stored since the read lock was released
            if entries
                .get(key)
                .is_some_and(|entry| self.is_expired(entry, now))
            {
                entries.remove(key);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("{} cache miss: {key}", self.namespace);
        None
    }

    /// Store `value`, replacing any previous entry for `key`
    pub fn put(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry {
            value,
            inserted_at: self.clock.now(),
        };
        self.entries.write().insert(key.into(), entry);
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        info!("{} cache cleared", self.namespace);
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(
                "Purged {removed} expired {} cache entries (current size: {})",
                self.namespace,
                entries.len()
            );
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            ttl: self.ttl,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Start background purge task (call once at initialization)
    ///
    /// Requires a running tokio runtime.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                self.purge_expired();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn cache_with_clock() -> (TtlCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock("test", Duration::from_secs(60), clock.clone());
        (cache, clock)
    }

    #[test]
    fn returns_value_before_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.put("k", "v".to_string());
        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get("k").as_deref(), Some("v"));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn entry_is_absent_at_exactly_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.put("k", "v".to_string());
        clock.advance(Duration::from_secs(60));
        assert_eq!(cache.get("k"), None);
        // dropped lazily on read
        assert!(cache.is_empty());
    }

    #[test]
    fn purge_removes_only_expired() {
        let (cache, clock) = cache_with_clock();
        cache.put("old", "a".to_string());
        clock.advance(Duration::from_secs(30));
        cache.put("new", "b".to_string());
        clock.advance(Duration::from_secs(30));
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("new").as_deref(), Some("b"));
    }
}
