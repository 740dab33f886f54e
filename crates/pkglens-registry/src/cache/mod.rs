//! Response caching with TTL and LRU eviction

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

/// Default time-to-live for cached responses (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default maximum number of cached responses
pub const DEFAULT_CAPACITY: usize = 500;

/// Source of monotonic time for expiry checks
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward by `by`
    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}

/// Cached response body
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Parsed JSON document, shared with every reader
    pub value: Arc<Value>,
    /// When the entry was stored
    pub stored_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// In-memory response cache keyed by request URL
///
/// Entries expire `ttl` after insertion no matter how often they are read.
/// When full, the least recently used entry is evicted to make room.
pub struct ResponseCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    capacity: NonZeroUsize,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create a cache with the given capacity and TTL on the system clock
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, Arc::new(SystemClock))
    }

    /// Create a cache that reads time from `clock`
    pub fn with_clock(capacity: NonZeroUsize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity,
            ttl,
            clock,
        }
    }

    /// Get a cached response if fresh, refreshing its recency
    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let fresh = entries.peek(key)?.is_fresh(now, self.ttl);
        if !fresh {
            // Remove stale entry
            entries.pop(key);
            debug!(key, "cache entry expired");
            return None;
        }

        entries.get(key).map(|entry| Arc::clone(&entry.value))
    }

    /// Store a response, evicting the least recently used entry when full
    pub fn insert(&self, key: String, value: Arc<Value>) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };

        let mut entries = self.entries.lock();
        if let Some((evicted, _)) = entries.push(key.clone(), entry) {
            if evicted != key {
                debug!(key = %evicted, "cache entry evicted");
            }
        }
    }

    /// Check if key is cached and fresh, without touching recency
    #[cfg(test)]
    pub(crate) fn contains_fresh(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.entries
            .lock()
            .peek(key)
            .map(|entry| entry.is_fresh(now, self.ttl))
            .unwrap_or(false)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.lock();
        let expired = entries
            .iter()
            .filter(|(_, entry)| !entry.is_fresh(now, self.ttl))
            .count();

        CacheStats {
            size: entries.len(),
            capacity: self.capacity.get(),
            expired,
        }
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Remove expired entries, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let stale: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| !entry.is_fresh(now, self.ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            entries.pop(key);
        }
        stale.len()
    }
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("size", &self.entries.lock().len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of stored entries, expired ones included until they are purged
    pub size: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Entries past their TTL that have not been purged yet
    pub expired: usize,
}
