//! Read access to the product registry contract.
//!
//! The registry is an ERC-721 contract that maps a brand-supplied product
//! hash to the token minted for it. This module exposes that mapping through
//! two traits:
//!
//! - [`ProductLookup`]: the reads product verification needs
//! - [`RegistryQueries`]: account-level reads (balances, brands, admin)
//!
//! and two implementations:
//!
//! - [`RpcRegistry`]: `eth_call` over a JSON-RPC endpoint
//! - [`MemoryRegistry`]: an in-memory registry for tests and offline use

pub mod abi;
mod memory;
mod reader;
mod rpc;
mod types;

pub use memory::MemoryRegistry;
pub use reader::{ProductLookup, RegistryQueries};
pub use rpc::RpcRegistry;
pub use types::{parse_account, AccountId, TokenId};
