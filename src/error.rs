//! Error types for luxauth.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by luxauth operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied unusable input. No I/O was attempted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A chain read could not be completed.
    #[error("network error: {0}")]
    Network(String),

    /// The RPC endpoint answered, but with an error object or undecodable data.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The whole operation exceeded its deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// The RPC endpoint serves a different chain than configured.
    #[error("wrong chain: expected chain id {expected}, endpoint reports {actual}")]
    WrongChain {
        /// Configured chain id.
        expected: u64,
        /// Chain id reported by the endpoint.
        actual: u64,
    },

    /// An off-chain metadata document could not be fetched or parsed.
    #[error("metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if this error means the verdict is unknown.
    ///
    /// Inconclusive outcomes must never be presented as "not found" or
    /// "counterfeit": the record store was simply not consulted successfully.
    #[must_use]
    pub fn is_inconclusive(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Protocol(_) | Self::Timeout(_) | Self::WrongChain { .. }
        )
    }
}
