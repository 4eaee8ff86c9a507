//! Verification event system.
//!
//! A presentation layer subscribes here instead of polling the client.

use crate::chain::TokenId;
use tokio::sync::broadcast;

/// Events emitted while verifying products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationEvent {
    /// A verification request passed input validation.
    Started {
        /// Product hash being verified.
        product_hash: String,
    },

    /// The product is registered.
    Authentic {
        /// Product hash verified.
        product_hash: String,
        /// Token minted for the product.
        token_id: TokenId,
    },

    /// The registry has no token for the product.
    NotFound {
        /// Product hash verified.
        product_hash: String,
    },

    /// The registry could not be read; no verdict.
    Inconclusive {
        /// Product hash verified.
        product_hash: String,
        /// Error message.
        reason: String,
    },

    /// Metadata could not be retrieved; the verdict is unaffected.
    MetadataUnavailable {
        /// Product hash verified.
        product_hash: String,
        /// Metadata pointer that failed.
        uri: String,
        /// Error message.
        reason: String,
    },
}

/// Channel for receiving verification events.
pub type VerificationEventsChannel = broadcast::Receiver<VerificationEvent>;

/// Sender for verification events.
pub type VerificationEventsSender = broadcast::Sender<VerificationEvent>;

/// Create a new event channel pair.
#[must_use]
pub fn create_event_channel() -> (VerificationEventsSender, VerificationEventsChannel) {
    broadcast::channel(256)
}
