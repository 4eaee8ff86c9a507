//! Off-chain metadata retrieval.
//!
//! A token's metadata pointer is usually an `ipfs://` URI. Resolving it
//! takes three steps:
//!
//! ```text
//! pointer ──parse──▶ ContentUri ──cache hit──▶ document
//!                        │
//!                      miss
//!                        ▼
//!                 Gateway::resolve ──▶ DocumentStore::fetch (bounded)
//!                                             │
//!                                    cache if content-addressed
//! ```
//!
//! Metadata is enrichment: callers treat every failure here as "no
//! metadata", never as a verdict.

mod cache;
mod document;
mod store;
mod uri;

pub use cache::{CacheStats, MetadataCache};
pub use document::{
    Attribute, ProductMetadata, AUTH_STATUS_TRAIT, MINTED_ON_TRAIT, PRODUCT_HASH_TRAIT,
};
pub use store::{DocumentStore, HttpDocumentStore, MemoryDocumentStore};
pub use uri::{ContentUri, Gateway};

use crate::config::MetadataConfig;
use crate::error::{Error, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Resolves metadata pointers to documents.
#[derive(Clone)]
pub struct MetadataResolver {
    store: Arc<dyn DocumentStore>,
    gateway: Gateway,
    cache: MetadataCache,
    timeout: Duration,
}

impl MetadataResolver {
    /// Create a resolver over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, gateway: Gateway, timeout: Duration) -> Self {
        Self {
            store,
            gateway,
            cache: MetadataCache::new(),
            timeout,
        }
    }

    /// Create an HTTP-backed resolver from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an invalid gateway or HTTP client setup.
    pub fn from_config(config: &MetadataConfig) -> Result<Self> {
        let store = HttpDocumentStore::new(config)?;
        Ok(Self {
            store: Arc::new(store),
            gateway: Gateway::new(&config.gateway)?,
            cache: MetadataCache::with_capacity(config.cache_capacity),
            timeout: config.fetch_timeout(),
        })
    }

    /// Replace the document cache.
    #[must_use]
    pub fn with_cache(mut self, cache: MetadataCache) -> Self {
        self.cache = cache;
        self
    }

    /// Gateway used for `ipfs://` translation.
    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Document cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Resolve `pointer` to its document, bounded by the fetch timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataUnavailable`] on any parse, fetch, or
    /// timeout failure.
    pub async fn resolve(&self, pointer: &str) -> Result<Value> {
        let uri = ContentUri::parse(pointer)?;

        if let Some(document) = self.cache.get(&uri) {
            debug!("Metadata {} served from cache", uri);
            return Ok(document);
        }

        let url = self.gateway.resolve(&uri);
        let document = match tokio::time::timeout(self.timeout, self.store.fetch(&url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::MetadataUnavailable(format!(
                    "GET {url} timed out after {:?}",
                    self.timeout
                )))
            }
        };

        self.cache.insert(&uri, document.clone());
        Ok(document)
    }
}
