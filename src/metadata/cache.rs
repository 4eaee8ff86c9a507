//! LRU cache for content-addressed metadata documents.
//!
//! An `ipfs://` document can never change without its CID changing, so a
//! fetched copy stays valid forever. Caching it saves a gateway round trip
//! for repeated verifications of the same product.

use super::uri::ContentUri;
use lru::LruCache;
use parking_lot::Mutex;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Default cache capacity.
const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// LRU cache of metadata documents keyed by content URI.
///
/// Only content-addressed URIs are admitted; HTTP documents are mutable and
/// are always refetched.
#[derive(Clone)]
pub struct MetadataCache {
    inner: Arc<Mutex<LruCache<ContentUri, Value>>>,
    stats: Arc<Mutex<CacheStats>>,
}

/// Cache statistics for monitoring.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries added.
    pub additions: u64,
}

impl CacheStats {
    /// Calculate hit rate as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl MetadataCache {
    /// Create a new cache with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a new cache with the specified capacity (at least one entry).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(cap))),
            stats: Arc::new(Mutex::new(CacheStats::default())),
        }
    }

    /// Look up a cached document.
    pub fn get(&self, uri: &ContentUri) -> Option<Value> {
        if !uri.is_content_addressed() {
            return None;
        }

        let found = self.inner.lock().get(uri).cloned();

        let mut stats = self.stats.lock();
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }

        found
    }

    /// Store a fetched document. Non-content-addressed URIs are ignored.
    pub fn insert(&self, uri: &ContentUri, document: Value) {
        if !uri.is_content_addressed() {
            return;
        }

        self.inner.lock().put(uri.clone(), document);
        self.stats.lock().additions += 1;
    }

    /// Get current cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }

    /// Get the current number of entries in the cache.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Clear all entries from the cache.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}
