//! Verification outcome types.

use crate::chain::{AccountId, TokenId};
use crate::metadata::ProductMetadata;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Verdict for a product hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// A token exists for the product hash.
    Authentic,
    /// The registry has no token for the product hash.
    NotFound,
}

impl VerificationStatus {
    /// Returns true if the product is registered.
    #[must_use]
    pub fn is_authentic(&self) -> bool {
        matches!(self, Self::Authentic)
    }
}

/// Result of verifying one product hash.
///
/// Created fresh per call; `token_id` and `owner` are present exactly when
/// the status is [`VerificationStatus::Authentic`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Verdict.
    pub status: VerificationStatus,
    /// Token minted for the product.
    pub token_id: Option<TokenId>,
    /// Current holder of the token.
    pub owner: Option<AccountId>,
    /// The product hash as supplied by the caller.
    pub product_hash: String,
    /// Off-chain metadata document, when it could be retrieved.
    pub metadata: Option<Value>,
}

impl VerificationResult {
    /// A registered product.
    #[must_use]
    pub fn authentic(
        product_hash: &str,
        token_id: TokenId,
        owner: AccountId,
        metadata: Option<Value>,
    ) -> Self {
        Self {
            status: VerificationStatus::Authentic,
            token_id: Some(token_id),
            owner: Some(owner),
            product_hash: product_hash.to_string(),
            metadata,
        }
    }

    /// An unregistered product.
    #[must_use]
    pub fn not_found(product_hash: &str) -> Self {
        Self {
            status: VerificationStatus::NotFound,
            token_id: None,
            owner: None,
            product_hash: product_hash.to_string(),
            metadata: None,
        }
    }

    /// Typed view of the metadata document, if it has the expected shape.
    #[must_use]
    pub fn product_metadata(&self) -> Option<ProductMetadata> {
        self.metadata.as_ref().and_then(ProductMetadata::from_document)
    }
}
