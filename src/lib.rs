//! # luxauth
//!
//! Read-only verification client for NFT-backed luxury product authentication.
//!
//! A brand mints one ERC-721 token per physical product, keyed by a product
//! hash printed on the product's certificate. Anyone holding the hash can ask
//! the registry whether it was minted, who holds it now, and what the
//! product's pinned metadata says. No wallet or signing key is needed.
//!
//! ## Outcomes
//!
//! Verification has exactly two verdicts, `AUTHENTIC` and `NOT_FOUND`. A
//! failed registry read is neither: it is reported as an error for which
//! [`Error::is_inconclusive`] returns true, and must not be shown to users
//! as a counterfeit.
//!
//! ## Example
//!
//! ```rust,ignore
//! use luxauth::{LuxauthConfig, VerificationClient};
//!
//! #[tokio::main]
//! async fn main() -> luxauth::Result<()> {
//!     let client = VerificationClient::from_config(&LuxauthConfig::default()).await?;
//!     let result = client.verify("0x9f2c...").await?;
//!     println!("{:?} token={:?}", result.status, result.token_id);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod chain;
pub mod config;
pub mod error;
pub mod event;
pub mod metadata;
pub mod verify;

pub use account::{AccountInspector, BrandStatus, OwnedProduct};
pub use chain::{AccountId, MemoryRegistry, ProductLookup, RegistryQueries, RpcRegistry, TokenId};
pub use config::LuxauthConfig;
pub use error::{Error, Result};
pub use event::{VerificationEvent, VerificationEventsChannel};
pub use metadata::{ContentUri, Gateway, MetadataResolver, ProductMetadata};
pub use verify::{VerificationClient, VerificationResult, VerificationStatus};
