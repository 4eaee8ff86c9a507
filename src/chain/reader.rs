//! Read interfaces over the product registry.

use super::types::{AccountId, TokenId};
use crate::error::Result;
use async_trait::async_trait;

/// The three reads product verification needs.
///
/// Implementations translate any store-specific "absent" convention into
/// `None`; callers never see a sentinel token id.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Resolve the token minted for `product_hash`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store could not be read.
    async fn lookup_token_id(&self, product_hash: &str) -> Result<Option<TokenId>>;

    /// Current owner of `token_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store could not be read.
    async fn owner_of(&self, token_id: TokenId) -> Result<AccountId>;

    /// URI of the metadata document for `token_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store could not be read.
    async fn metadata_pointer(&self, token_id: TokenId) -> Result<String>;
}

/// Account-level registry reads.
#[async_trait]
pub trait RegistryQueries: ProductLookup {
    /// Whether a product hash has been minted.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store could not be read.
    async fn product_exists(&self, product_hash: &str) -> Result<bool>;

    /// Whether `account` is on the registry's verified brand list.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store could not be read.
    async fn is_verified_brand(&self, account: AccountId) -> Result<bool>;

    /// Administrator of the registry contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store could not be read.
    async fn contract_owner(&self) -> Result<AccountId>;

    /// Number of tokens held by `account`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store could not be read.
    async fn balance_of(&self, account: AccountId) -> Result<u64>;

    /// The `index`-th token held by `account`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store could not be read.
    async fn token_of_owner_by_index(&self, account: AccountId, index: u64) -> Result<TokenId>;
}
