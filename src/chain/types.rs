//! Identifiers shared by every chain reader.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An account on the registry chain (brand, owner, or contract).
pub type AccountId = Address;

/// An ERC-721 token id.
///
/// Rendered and serialized as a decimal string, the way wallets and block
/// explorers show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(U256);

impl TokenId {
    /// Wrap a raw token id.
    #[must_use]
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// The raw 256-bit value.
    #[must_use]
    pub const fn as_u256(&self) -> U256 {
        self.0
    }
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for TokenId {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TokenId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_str_radix(s.trim(), 10)
            .map(Self)
            .map_err(|e| crate::Error::InvalidInput(format!("invalid token id {s:?}: {e}")))
    }
}

impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a 0x-prefixed account address.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] if `s` is not a 20-byte hex address.
pub fn parse_account(s: &str) -> crate::Result<AccountId> {
    s.trim()
        .parse::<Address>()
        .map_err(|e| crate::Error::InvalidInput(format!("invalid account address {s:?}: {e}")))
}
