//! Product verification client.
//!
//! This is the core verification logic for luxauth.

use super::result::VerificationResult;
use crate::chain::{ProductLookup, RpcRegistry};
use crate::config::LuxauthConfig;
use crate::error::{Error, Result};
use crate::event::{
    create_event_channel, VerificationEvent, VerificationEventsChannel, VerificationEventsSender,
};
use crate::metadata::{CacheStats, MetadataResolver};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Reject product hashes that are empty or whitespace-only.
///
/// The hash itself is returned untouched: the registry keys on the exact
/// string a brand minted with.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for blank input.
pub fn validate_product_hash(product_hash: &str) -> Result<&str> {
    if product_hash.trim().is_empty() {
        return Err(Error::InvalidInput(
            "product hash must not be empty".to_string(),
        ));
    }
    Ok(product_hash)
}

/// Verifies product hashes against the registry.
///
/// Combines:
/// 1. A registry lookup deciding AUTHENTIC or NOT_FOUND
/// 2. Owner and metadata pointer reads for registered products
/// 3. A bounded, best-effort metadata fetch
///
/// Each call is independent; the client holds no per-request state and may
/// be shared across tasks.
pub struct VerificationClient {
    registry: Arc<dyn ProductLookup>,
    metadata: MetadataResolver,
    events_tx: VerificationEventsSender,
}

impl VerificationClient {
    /// Create a client over an existing registry reader and resolver.
    #[must_use]
    pub fn new(registry: Arc<dyn ProductLookup>, metadata: MetadataResolver) -> Self {
        let (events_tx, _) = create_event_channel();
        Self {
            registry,
            metadata,
            events_tx,
        }
    }

    /// Connect to the configured chain endpoint and document gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the chain
    /// endpoint cannot be reached.
    pub async fn from_config(config: &LuxauthConfig) -> Result<Self> {
        let registry = RpcRegistry::connect(&config.chain).await?;
        let metadata = MetadataResolver::from_config(&config.metadata)?;

        info!(
            "Verification client initialized (gateway={}, metadata_timeout={:?})",
            metadata.gateway().base(),
            config.metadata.fetch_timeout()
        );

        Ok(Self::new(Arc::new(registry), metadata))
    }

    /// Subscribe to verification events.
    #[must_use]
    pub fn subscribe_events(&self) -> VerificationEventsChannel {
        self.events_tx.subscribe()
    }

    /// Metadata resolver used for enrichment.
    #[must_use]
    pub fn metadata(&self) -> &MetadataResolver {
        &self.metadata
    }

    /// Metadata cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.metadata.cache_stats()
    }

    /// Verify a product hash.
    ///
    /// # Returns
    ///
    /// * `status = Authentic` - the registry holds a token for the hash
    /// * `status = NotFound` - the registry reports no token for the hash
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidInput`] - blank hash; nothing was sent to the chain
    /// * an inconclusive error (see [`Error::is_inconclusive`]) - a registry
    ///   read failed, so no verdict can be given
    ///
    /// Metadata failures never surface here; they leave `metadata` empty.
    pub async fn verify(&self, product_hash: &str) -> Result<VerificationResult> {
        let product_hash = validate_product_hash(product_hash)?;

        self.emit(VerificationEvent::Started {
            product_hash: product_hash.to_string(),
        });

        match self.classify(product_hash).await {
            Ok(result) => {
                let event = match result.token_id {
                    Some(token_id) => VerificationEvent::Authentic {
                        product_hash: product_hash.to_string(),
                        token_id,
                    },
                    None => VerificationEvent::NotFound {
                        product_hash: product_hash.to_string(),
                    },
                };
                self.emit(event);
                Ok(result)
            }
            Err(e) => {
                warn!("Verification of {} inconclusive: {}", product_hash, e);
                self.emit(VerificationEvent::Inconclusive {
                    product_hash: product_hash.to_string(),
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Verify a product hash within a deadline for the whole operation.
    ///
    /// # Errors
    ///
    /// As [`Self::verify`], plus [`Error::Timeout`] if the deadline passes
    /// before a verdict is reached.
    pub async fn verify_within(
        &self,
        product_hash: &str,
        timeout: Duration,
    ) -> Result<VerificationResult> {
        validate_product_hash(product_hash)?;

        if let Ok(result) = tokio::time::timeout(timeout, self.verify(product_hash)).await {
            result
        } else {
            warn!(
                "Verification of {} timed out after {:?}",
                product_hash, timeout
            );
            self.emit(VerificationEvent::Inconclusive {
                product_hash: product_hash.to_string(),
                reason: format!("timed out after {timeout:?}"),
            });
            Err(Error::Timeout(timeout))
        }
    }

    async fn classify(&self, product_hash: &str) -> Result<VerificationResult> {
        let Some(token_id) = self.registry.lookup_token_id(product_hash).await? else {
            info!("Product {} is not registered", product_hash);
            return Ok(VerificationResult::not_found(product_hash));
        };

        debug!("Product {} maps to token {}", product_hash, token_id);

        let (owner, pointer) = tokio::try_join!(
            self.registry.owner_of(token_id),
            self.registry.metadata_pointer(token_id)
        )?;

        let metadata = match self.metadata.resolve(&pointer).await {
            Ok(document) => Some(document),
            Err(e) => {
                warn!(
                    "Metadata for token {} unavailable ({}): {}",
                    token_id, pointer, e
                );
                self.emit(VerificationEvent::MetadataUnavailable {
                    product_hash: product_hash.to_string(),
                    uri: pointer.clone(),
                    reason: e.to_string(),
                });
                None
            }
        };

        info!(
            "Product {} is authentic (token {}, owner {})",
            product_hash, token_id, owner
        );

        Ok(VerificationResult::authentic(
            product_hash,
            token_id,
            owner,
            metadata,
        ))
    }

    fn emit(&self, event: VerificationEvent) {
        // No subscribers is fine
        let _ = self.events_tx.send(event);
    }
}
