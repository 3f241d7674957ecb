//! LRU cache of fetched result sets.
//!
//! Clients receive a snapshot token after a fetch and send it back with
//! each page request instead of the whole result set. A newer fetch for a
//! source evicts that source's older snapshots.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::CacheConfig;
use crate::core::{ResultSet, Source};
use crate::snapshot::SnapshotKey;

#[derive(Debug, Clone)]
struct CachedSnapshot {
    result_set: Arc<ResultSet>,
    cached_at: Instant,
}

/// Cache statistics for monitoring and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub invalidated: u64,
}

impl CacheStats {
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub struct SnapshotCache {
    entries: Option<Mutex<LruCache<SnapshotKey, CachedSnapshot>>>,
    ttl: Duration,
    stats: Mutex<CacheStats>,
}

impl SnapshotCache {
    /// Create a cache holding at most `capacity` snapshots for `ttl` each.
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            ttl,
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// A cache that never retains anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new(config.capacity, config.ttl)
        } else {
            Self::disabled()
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Store a freshly fetched result set, replacing older snapshots of the
    /// same source.
    pub fn insert(&self, result_set: ResultSet) -> (SnapshotKey, Arc<ResultSet>) {
        let key = SnapshotKey::of(&result_set);
        let result_set = Arc::new(result_set);

        if let Some(entries) = &self.entries {
            let mut entries = entries.lock();
            let stale: Vec<SnapshotKey> = entries
                .iter()
                .map(|(existing, _)| *existing)
                .filter(|existing| existing.source == key.source && *existing != key)
                .collect();
            for old in &stale {
                entries.pop(old);
            }
            if !stale.is_empty() {
                self.stats.lock().invalidated += stale.len() as u64;
                debug!(target: "snapshot", source = %key.source, dropped = stale.len(), "invalidated older snapshots");
            }
            entries.put(
                key,
                CachedSnapshot {
                    result_set: Arc::clone(&result_set),
                    cached_at: Instant::now(),
                },
            );
        }

        (key, result_set)
    }

    /// Look up a snapshot by key; expired entries are dropped.
    pub fn get(&self, key: &SnapshotKey) -> Option<Arc<ResultSet>> {
        let entries = self.entries.as_ref()?;
        let mut entries = entries.lock();
        let mut stats = self.stats.lock();

        let Some(cached) = entries.get(key) else {
            stats.misses += 1;
            return None;
        };
        if cached.cached_at.elapsed() > self.ttl {
            entries.pop(key);
            stats.expired += 1;
            stats.misses += 1;
            return None;
        }
        stats.hits += 1;
        Some(Arc::clone(&cached.result_set))
    }

    /// The newest live snapshot for `source`, if any.
    pub fn latest(&self, source: Source) -> Option<(SnapshotKey, Arc<ResultSet>)> {
        let key = {
            let entries = self.entries.as_ref()?.lock();
            entries
                .iter()
                .map(|(key, _)| *key)
                .filter(|key| key.source == source)
                .max()?
        };
        self.get(&key).map(|result_set| (key, result_set))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.lock().len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }
}
