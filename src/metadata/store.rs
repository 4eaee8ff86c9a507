//! Document store fetchers.

use crate::config::MetadataConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::debug;

/// Fetches a JSON document from a resolved (gateway) URL.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch and parse the document at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataUnavailable`] if the document cannot be
    /// retrieved or is not JSON.
    async fn fetch(&self, url: &str) -> Result<Value>;
}

/// Document store reached over HTTP(S).
pub struct HttpDocumentStore {
    http: reqwest::Client,
    max_document_bytes: usize,
}

impl HttpDocumentStore {
    /// Create a fetcher using the configured timeout and size limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: &MetadataConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            max_document_bytes: config.max_document_bytes,
        })
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn fetch(&self, url: &str) -> Result<Value> {
        debug!("Fetching metadata document {}", url);

        let mut response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::MetadataUnavailable(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::MetadataUnavailable(format!(
                "GET {url} returned HTTP {status}"
            )));
        }

        let too_large = || {
            Error::MetadataUnavailable(format!(
                "document at {url} exceeds {} bytes",
                self.max_document_bytes
            ))
        };

        if response
            .content_length()
            .is_some_and(|len| len > self.max_document_bytes as u64)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::MetadataUnavailable(format!("reading {url} failed: {e}")))?
        {
            if body.len() + chunk.len() > self.max_document_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body)
            .map_err(|e| Error::MetadataUnavailable(format!("document at {url} is not JSON: {e}")))
    }
}

/// Document store held in memory, keyed by resolved URL.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, String>>,
    delay: Option<Duration>,
    fetch_count: AtomicU32,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every fetch, simulating a slow gateway.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Store a JSON document at `url`.
    pub fn insert_json(&self, url: &str, document: &Value) {
        self.insert_raw(url, &document.to_string());
    }

    /// Store an arbitrary body at `url`, JSON or not.
    pub fn insert_raw(&self, url: &str, body: &str) {
        self.documents
            .write()
            .insert(url.to_string(), body.to_string());
    }

    /// Number of fetches attempted.
    #[must_use]
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn fetch(&self, url: &str) -> Result<Value> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let body = self
            .documents
            .read()
            .get(url)
            .cloned()
            .ok_or_else(|| Error::MetadataUnavailable(format!("GET {url} returned HTTP 404")))?;

        serde_json::from_str(&body)
            .map_err(|e| Error::MetadataUnavailable(format!("document at {url} is not JSON: {e}")))
    }
}
