//! Product authentication.
//!
//! # Flow
//!
//! ```text
//! verify(product_hash)
//!        │
//!        ▼
//! ┌─────────────────────┐
//! │ Reject blank input  │──▶ InvalidInput (no I/O)
//! └─────────┬───────────┘
//!           ▼
//!   lookup_token_id ──── read failed ──▶ inconclusive error
//!           │
//!    ┌──────┴──────┐
//!    │             │
//!  None        Some(token)
//!    │             │
//!    ▼             ▼
//! NOT_FOUND   owner_of ∥ metadata_pointer ── read failed ──▶ inconclusive error
//!                  │
//!                  ▼
//!           fetch metadata (bounded; failure ⇒ metadata = None)
//!                  │
//!                  ▼
//!              AUTHENTIC
//! ```

mod result;
mod verifier;

pub use result::{VerificationResult, VerificationStatus};
pub use verifier::{validate_product_hash, VerificationClient};
