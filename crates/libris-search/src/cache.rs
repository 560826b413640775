//! In-process result cache: bounded LRU with a per-entry time to live.
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use libris_core::config::CacheSettings;
use libris_core::error::Result;
use libris_core::traits::ResultCache;
use libris_core::types::CachedSearch;

struct Slot {
    value: CachedSearch,
    stored_at: Instant,
}

/// Expired entries are dropped lazily on lookup; capacity overflow evicts the
/// least recently used entry.
pub struct MemoryResultCache {
    ttl: Duration,
    slots: Mutex<LruCache<String, Slot>>,
    expirations: AtomicU64,
    evictions: AtomicU64,
}

impl MemoryResultCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN))),
            expirations: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.capacity, settings.ttl())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (expired entries dropped, entries evicted for capacity)
    pub fn stats(&self) -> (u64, u64) {
        (self.expirations.load(Ordering::Relaxed), self.evictions.load(Ordering::Relaxed))
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<CachedSearch> {
        let mut slots = self.slots.lock();
        let lookup = slots
            .get(key)
            .map(|slot| (now.saturating_duration_since(slot.stored_at) < self.ttl, slot.value.clone()));
        match lookup {
            Some((true, value)) => Some(value),
            Some((false, _)) => {
                slots.pop(key);
                self.expirations.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => None,
        }
    }

    fn put_at(&self, key: &str, value: CachedSearch, now: Instant) {
        let mut slots = self.slots.lock();
        if slots.len() == slots.cap().get() && !slots.contains(key) {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        slots.put(key.to_string(), Slot { value, stored_at: now });
    }
}

impl ResultCache for MemoryResultCache {
    fn get(&self, key: &str) -> Result<Option<CachedSearch>> {
        Ok(self.get_at(key, Instant::now()))
    }

    fn put(&self, key: &str, value: CachedSearch) -> Result<()> {
        self.put_at(key, value, Instant::now());
        Ok(())
    }
}
