//! JSON-RPC registry reader.
//!
//! Issues `eth_call` requests against the registry contract over plain HTTP.
//! No signing key is involved; every call reads the `latest` block.

use super::abi;
use super::reader::{ProductLookup, RegistryQueries};
use super::types::{parse_account, AccountId, TokenId};
use crate::config::ChainConfig;
use crate::error::{Error, Result};
use alloy_primitives::U256;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// JSON-RPC request envelope.
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Registry reader backed by an Ethereum JSON-RPC endpoint.
pub struct RpcRegistry {
    http: reqwest::Client,
    rpc_url: String,
    contract: AccountId,
    next_id: AtomicU64,
}

impl RpcRegistry {
    /// Create a reader for the configured endpoint and contract.
    ///
    /// When the configuration asks for it, the endpoint's chain id is
    /// checked before the reader is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unusable contract address,
    /// [`Error::WrongChain`] if the endpoint serves another chain, or a
    /// network error if the chain id query fails.
    pub async fn connect(config: &ChainConfig) -> Result<Self> {
        let contract = parse_account(&config.contract_address)
            .map_err(|e| Error::Config(format!("contract_address: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        let registry = Self {
            http,
            rpc_url: config.rpc_url.clone(),
            contract,
            next_id: AtomicU64::new(1),
        };

        if let Some(expected) = config.expected_chain_id() {
            let actual = registry.chain_id().await?;
            if actual != expected {
                return Err(Error::WrongChain { expected, actual });
            }
            debug!("Endpoint {} serves chain {}", registry.rpc_url, actual);
        }

        info!(
            "Registry reader ready (rpc={}, contract={})",
            registry.rpc_url, registry.contract
        );

        Ok(registry)
    }

    /// Address of the registry contract being read.
    #[must_use]
    pub fn contract(&self) -> AccountId {
        self.contract
    }

    /// Chain id reported by the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply is not a quantity.
    pub async fn chain_id(&self) -> Result<u64> {
        let value = self.request("eth_chainId", json!([])).await?;
        let quantity = value
            .as_str()
            .ok_or_else(|| Error::Protocol(format!("eth_chainId returned {value}")))?;
        parse_quantity(quantity)
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Network(format!("{method} request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!("{method} returned HTTP {status}")));
        }

        let reply: RpcResponse = response
            .json()
            .await
            .map_err(|e| Error::Protocol(format!("{method} reply is not JSON-RPC: {e}")))?;

        if let Some(err) = reply.error {
            return Err(Error::Protocol(format!(
                "{method} failed: {} (code {})",
                err.message, err.code
            )));
        }

        reply
            .result
            .ok_or_else(|| Error::Protocol(format!("{method} reply has no result")))
    }

    async fn call<C: SolCall + Send>(&self, call: C) -> Result<C::Return> {
        let data = format!("0x{}", hex::encode(call.abi_encode()));
        debug!("eth_call {} on {}", C::SIGNATURE, self.contract);

        let params = json!([{ "to": self.contract.to_string(), "data": data }, "latest"]);
        let value = self.request("eth_call", params).await?;
        let raw = value
            .as_str()
            .ok_or_else(|| Error::Protocol(format!("eth_call returned {value}")))?;

        let bytes = decode_hex(raw)?;
        C::abi_decode_returns(&bytes, true)
            .map_err(|e| Error::Protocol(format!("cannot decode {} result: {e}", C::SIGNATURE)))
    }
}

#[async_trait]
impl ProductLookup for RpcRegistry {
    async fn lookup_token_id(&self, product_hash: &str) -> Result<Option<TokenId>> {
        let ret = self
            .call(abi::productToTokenCall {
                productHash: product_hash.to_string(),
            })
            .await?;
        Ok(token_from_registry(ret._0))
    }

    async fn owner_of(&self, token_id: TokenId) -> Result<AccountId> {
        let ret = self
            .call(abi::ownerOfCall {
                tokenId: token_id.as_u256(),
            })
            .await?;
        Ok(ret._0)
    }

    async fn metadata_pointer(&self, token_id: TokenId) -> Result<String> {
        let ret = self
            .call(abi::tokenURICall {
                tokenId: token_id.as_u256(),
            })
            .await?;
        Ok(ret._0)
    }
}

#[async_trait]
impl RegistryQueries for RpcRegistry {
    async fn product_exists(&self, product_hash: &str) -> Result<bool> {
        let ret = self
            .call(abi::productExistsCall {
                productHash: product_hash.to_string(),
            })
            .await?;
        Ok(ret.exists)
    }

    async fn is_verified_brand(&self, account: AccountId) -> Result<bool> {
        let ret = self.call(abi::verifiedBrandsCall { brand: account }).await?;
        Ok(ret._0)
    }

    async fn contract_owner(&self) -> Result<AccountId> {
        let ret = self.call(abi::ownerCall {}).await?;
        Ok(ret._0)
    }

    async fn balance_of(&self, account: AccountId) -> Result<u64> {
        let ret = self.call(abi::balanceOfCall { account }).await?;
        u64::try_from(ret._0)
            .map_err(|_| Error::Protocol(format!("balance {} does not fit in u64", ret._0)))
    }

    async fn token_of_owner_by_index(&self, account: AccountId, index: u64) -> Result<TokenId> {
        let ret = self
            .call(abi::tokenOfOwnerByIndexCall {
                account,
                index: U256::from(index),
            })
            .await?;
        Ok(TokenId::new(ret._0))
    }
}

/// The registry stores token id 0 for unknown products.
fn token_from_registry(raw: U256) -> Option<TokenId> {
    (!raw.is_zero()).then_some(TokenId::new(raw))
}

fn decode_hex(raw: &str) -> Result<Vec<u8>> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits).map_err(|e| Error::Protocol(format!("invalid hex in RPC result: {e}")))
}

fn parse_quantity(raw: &str) -> Result<u64> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16)
        .map_err(|e| Error::Protocol(format!("invalid quantity {raw:?}: {e}")))
}
