//! In-memory cache of catalog dimensions.
//!
//! Each entry holds the full, ordered result set of one dimension (e.g.
//! `movie:trending`); pages are sliced from it on read. Entries expire after
//! a TTL measured against an injected [`Clock`], and the least recently used
//! entry is evicted when the cache is full.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::catalog::CatalogItem;
use crate::metrics::{CACHE_ENTRIES, CACHE_EVICTIONS, CACHE_LOOKUPS};

struct CacheEntry {
    items: Arc<Vec<CatalogItem>>,
    fetched_at: Instant,
    last_used: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Monotonic use counter backing the LRU order.
    tick: u64,
}

impl CacheState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub ttl_secs: u64,
}

/// Bounded TTL + LRU cache keyed by dimension.
pub struct CatalogCache {
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState>,
}

impl CatalogCache {
    pub fn new(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            clock,
            state: Mutex::new(CacheState::default()),
        }
    }

    fn is_valid(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.fetched_at) < self.ttl
    }

    /// Return the cached items for `key` if present and fresh.
    ///
    /// Expired entries are dropped on the spot.
    pub fn get(&self, key: &str) -> Option<Arc<Vec<CatalogItem>>> {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let fresh = match state.entries.get(key) {
            None => {
                CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                return None;
            }
            Some(entry) => self.is_valid(entry, now),
        };

        if !fresh {
            state.entries.remove(key);
            CACHE_ENTRIES.set(state.entries.len() as i64);
            CACHE_LOOKUPS.with_label_values(&["expired"]).inc();
            debug!(key, "Cache entry expired");
            return None;
        }

        let tick = state.next_tick();
        let entry = state.entries.get_mut(key)?;
        entry.last_used = tick;
        CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
        Some(Arc::clone(&entry.items))
    }

    /// Store a freshly fetched result set, replacing any previous entry.
    pub fn insert(&self, key: &str, items: Vec<CatalogItem>) -> Arc<Vec<CatalogItem>> {
        let now = self.clock.now();
        let items = Arc::new(items);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if !state.entries.contains_key(key) {
            state
                .entries
                .retain(|_, entry| now.saturating_duration_since(entry.fetched_at) < self.ttl);

            if state.entries.len() >= self.capacity {
                let lru = state
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_used)
                    .map(|(k, _)| k.clone());
                if let Some(lru) = lru {
                    state.entries.remove(&lru);
                    CACHE_EVICTIONS.inc();
                    debug!(evicted = %lru, "Evicted least recently used cache entry");
                }
            }
        }

        let tick = state.next_tick();
        state.entries.insert(
            key.to_string(),
            CacheEntry {
                items: Arc::clone(&items),
                fetched_at: now,
                last_used: tick,
            },
        );
        CACHE_ENTRIES.set(state.entries.len() as i64);

        items
    }

    /// Drop one entry.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = state.entries.remove(key).is_some();
        CACHE_ENTRIES.set(state.entries.len() as i64);
        removed
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.clear();
        CACHE_ENTRIES.set(0);
    }

    pub fn contains(&self, key: &str) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.entries.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            entries: state.entries.len(),
            capacity: self.capacity,
            ttl_secs: self.ttl.as_secs(),
        }
    }
}
