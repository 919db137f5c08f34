#![forbid(unsafe_code)]

//! LRU cache for parsed labels.
//!
//! Every filter pass re-runs icon parsing over the full item set, and the
//! labels rarely change between keystrokes. This cache stores parse
//! results keyed by a hash of the raw label so repeated passes skip the
//! scanner entirely.
//!
//! # Example
//! ```
//! use quickpick_text::cache::LabelCache;
//!
//! let mut cache = LabelCache::new(128);
//!
//! let first = cache.get_or_parse("a$(icon)b");
//! assert_eq!(first.text, "ab");
//!
//! // Second call hits the cache
//! let second = cache.get_or_parse("a$(icon)b");
//! assert_eq!(second, first);
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.stats().misses, 1);
//! ```

use lru::LruCache;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use crate::icon::{ParsedLabel, parse_icon_label};

/// Default cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Current number of entries.
    pub size: usize,
    /// Maximum capacity.
    pub capacity: usize,
}

impl CacheStats {
    /// Calculate hit rate (0.0 to 1.0).
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

/// LRU cache from raw label to its parse result.
///
/// Keys are 64-bit FxHash values rather than stored strings, trading
/// theoretical collision safety for memory: with a 64-bit hash the odds
/// are ~1 in 2^64, which is fine for a highlight cache where a collision
/// costs a wrong highlight, not a wrong answer.
#[derive(Debug)]
pub struct LabelCache {
    cache: LruCache<u64, ParsedLabel>,
    hits: u64,
    misses: u64,
}

impl LabelCache {
    /// Create a cache holding up to `capacity` parsed labels.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Parse `raw`, consulting the cache first.
    pub fn get_or_parse(&mut self, raw: &str) -> ParsedLabel {
        let key = hash_label(raw);
        if let Some(parsed) = self.cache.get(&key) {
            self.hits += 1;
            return parsed.clone();
        }
        self.misses += 1;
        tracing::trace!(len = raw.len(), "label cache miss");
        let parsed = parse_icon_label(raw);
        self.cache.put(key, parsed.clone());
        parsed
    }

    /// Current number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop all entries and reset the counters.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Snapshot of hit/miss statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.cache.len(),
            capacity: self.cache.cap().get(),
        }
    }
}

impl Default for LabelCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

fn hash_label(raw: &str) -> u64 {
    let mut hasher = FxHasher::default();
    raw.hash(&mut hasher);
    hasher.finish()
}
