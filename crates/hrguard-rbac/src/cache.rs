//! Decision cache.
//!
//! Caches authorization decisions keyed by principal id, role and
//! capability. Keying on the role means a principal whose role changed can
//! never hit an entry computed for the old role; [`DecisionCache::invalidate_principal`]
//! additionally drops the stale entries.
//!
//! Entries expire after a TTL so that directory changes (a manager moving
//! department) are picked up without a restart. When the cache is full the
//! least recently used entry is evicted.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use hrguard_types::PrincipalId;
use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use crate::capabilities::Capability;
use crate::enforcement::AuthorizationDecision;
use crate::roles::Role;

/// Default entry time-to-live.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Default maximum number of cached decisions.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    principal: PrincipalId,
    role: Role,
    capability: Capability,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    decision: AuthorizationDecision,
    created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped to make room for new ones.
    pub evictions: u64,
    pub invalidations: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe, TTL-bounded LRU decision cache.
#[derive(Debug)]
pub struct DecisionCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    invalidations: AtomicU64,
}

impl DecisionCache {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_CACHE_TTL, DEFAULT_MAX_ENTRIES)
    }

    /// Creates a cache with a custom TTL and capacity (at least one entry).
    pub fn with_limits(ttl: Duration, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Returns the cached decision, if present and fresh.
    ///
    /// A hit marks the entry as most recently used; an expired entry is
    /// dropped.
    pub fn get(
        &self,
        principal: PrincipalId,
        role: Role,
        capability: Capability,
    ) -> Option<AuthorizationDecision> {
        let key = CacheKey {
            principal,
            role,
            capability,
        };
        let mut entries = self.entries.lock();

        let fresh = match entries.get(&key) {
            Some(entry) if !entry.is_expired(self.ttl) => Some(entry.decision.clone()),
            Some(_) => {
                entries.pop(&key);
                None
            }
            None => None,
        };

        let counter = if fresh.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        fresh
    }

    /// Stores a decision, evicting the least recently used entry if full.
    pub fn insert(
        &self,
        principal: PrincipalId,
        role: Role,
        capability: Capability,
        decision: AuthorizationDecision,
    ) {
        let key = CacheKey {
            principal,
            role,
            capability,
        };
        let entry = CacheEntry {
            decision,
            created_at: Instant::now(),
        };

        let displaced = self.entries.lock().push(key, entry);
        if let Some((evicted, _)) = displaced
            && evicted != key
        {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(principal = %evicted.principal, "Evicted least recently used decision");
        }
    }

    /// Drops every entry for `principal`, whatever role it was computed for.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_principal(&self, principal: PrincipalId) -> usize {
        let mut entries = self.entries.lock();
        let stale: Vec<CacheKey> = entries
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| key.principal == principal)
            .collect();
        for key in &stale {
            entries.pop(key);
        }

        self.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!(principal = %principal, removed = stale.len(), "Invalidated cached decisions");
        stale.len()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl Default for DecisionCache {
    fn default() -> Self {
        Self::new()
    }
}
