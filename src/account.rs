//! Account-level registry queries.
//!
//! Everything here is read-only and works without a wallet: listing the
//! products an account holds, and checking whether an account may mint.

use crate::chain::{AccountId, ProductLookup, RegistryQueries, RpcRegistry, TokenId};
use crate::config::LuxauthConfig;
use crate::error::Result;
use crate::metadata::MetadataResolver;
use crate::verify::validate_product_hash;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A token held by an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedProduct {
    /// Token id.
    pub token_id: TokenId,
    /// Metadata document, when it could be retrieved.
    pub metadata: Option<Value>,
    /// Block explorer page for the token.
    pub explorer_url: String,
}

/// Minting rights of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandStatus {
    /// Account is on the verified brand list.
    pub is_verified: bool,
    /// Account administers the registry contract.
    pub is_contract_owner: bool,
    /// Account may mint product tokens.
    pub can_mint: bool,
}

impl BrandStatus {
    /// Derive minting rights from the two registry facts.
    #[must_use]
    pub fn new(is_verified: bool, is_contract_owner: bool) -> Self {
        Self {
            is_verified,
            is_contract_owner,
            can_mint: is_verified || is_contract_owner,
        }
    }
}

/// Runs account queries against the registry.
pub struct AccountInspector {
    registry: Arc<dyn RegistryQueries>,
    metadata: MetadataResolver,
    explorer_base: String,
    contract: AccountId,
}

impl AccountInspector {
    /// Create an inspector.
    ///
    /// `explorer_base` and `contract` are only used to build explorer links.
    #[must_use]
    pub fn new(
        registry: Arc<dyn RegistryQueries>,
        metadata: MetadataResolver,
        explorer_base: &str,
        contract: AccountId,
    ) -> Self {
        Self {
            registry,
            metadata,
            explorer_base: explorer_base.trim_end_matches('/').to_string(),
            contract,
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
        let contract = registry.contract();
        let metadata = MetadataResolver::from_config(&config.metadata)?;
        Ok(Self::new(
            Arc::new(registry),
            metadata,
            &config.explorer.base_url,
            contract,
        ))
    }

    /// Explorer page for `token_id`.
    #[must_use]
    pub fn explorer_url(&self, token_id: TokenId) -> String {
        format!("{}/nft/{}/{}", self.explorer_base, self.contract, token_id)
    }

    /// List the products `account` holds.
    ///
    /// Metadata for all tokens is fetched concurrently; a token whose
    /// metadata cannot be retrieved is still listed, with `metadata = None`.
    ///
    /// # Errors
    ///
    /// Returns an error if any registry read fails.
    pub async fn owned_products(&self, account: AccountId) -> Result<Vec<OwnedProduct>> {
        let balance = self.registry.balance_of(account).await?;
        debug!("Account {} holds {} tokens", account, balance);

        let mut token_ids = Vec::new();
        for index in 0..balance {
            token_ids.push(self.registry.token_of_owner_by_index(account, index).await?);
        }

        let products = join_all(token_ids.into_iter().map(|token_id| async move {
            let metadata = match self.registry.metadata_pointer(token_id).await {
                Ok(pointer) => match self.metadata.resolve(&pointer).await {
                    Ok(document) => Some(document),
                    Err(e) => {
                        warn!("Metadata for token {} unavailable: {}", token_id, e);
                        None
                    }
                },
                Err(e) => {
                    warn!("Metadata pointer for token {} unreadable: {}", token_id, e);
                    None
                }
            };
            OwnedProduct {
                token_id,
                metadata,
                explorer_url: self.explorer_url(token_id),
            }
        }))
        .await;

        info!("Listed {} products for {}", products.len(), account);
        Ok(products)
    }

    /// Minting rights of `account`.
    ///
    /// # Errors
    ///
    /// Returns an error if a registry read fails.
    pub async fn brand_status(&self, account: AccountId) -> Result<BrandStatus> {
        let (is_verified, admin) = tokio::try_join!(
            self.registry.is_verified_brand(account),
            self.registry.contract_owner()
        )?;
        Ok(BrandStatus::new(is_verified, admin == account))
    }

    /// Whether a product hash has been minted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] for a blank hash, or an error
    /// if the registry read fails.
    pub async fn product_exists(&self, product_hash: &str) -> Result<bool> {
        let product_hash = validate_product_hash(product_hash)?;
        self.registry.product_exists(product_hash).await
    }
}
