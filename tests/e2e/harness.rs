//! Test harness that emulates the registry chain and the document gateway.
//!
//! Two `wiremock` servers stand in for the outside world:
//!
//! - a JSON-RPC endpoint whose `eth_call` handler decodes calldata against
//!   the registry ABI and answers from an in-memory token table
//! - an IPFS-style gateway serving documents under `/ipfs/<cid>`
//!
//! The crate under test talks to both through its real HTTP clients.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use luxauth::chain::abi;
use luxauth::config::{LuxauthConfig, DEFAULT_CONTRACT_ADDRESS, SEPOLIA_CHAIN_ID};
use luxauth::TokenId;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// JSON-RPC error code used by nodes for reverted calls.
const EXECUTION_REVERTED: i64 = 3;

/// Contract state served by the fake endpoint.
#[derive(Default)]
struct ContractState {
    products: HashMap<String, U256>,
    tokens: BTreeMap<U256, (Address, String)>,
    brands: HashSet<Address>,
    admin: Address,
    next_token: u64,
}

impl ContractState {
    fn holdings(&self, account: Address) -> Vec<U256> {
        self.tokens
            .iter()
            .filter(|(_, (owner, _))| *owner == account)
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Outcome of one emulated `eth_call`.
enum CallOutcome {
    Return(Vec<u8>),
    Revert(String),
}

/// `wiremock` responder emulating the registry contract.
struct FakeContract {
    state: Arc<Mutex<ContractState>>,
    chain_id: u64,
}

impl FakeContract {
    fn dispatch(&self, data: &[u8]) -> CallOutcome {
        let state = self.state.lock();
        let Some(selector) = data.get(..4) else {
            return CallOutcome::Revert("missing selector".to_string());
        };

        if selector == abi::productToTokenCall::SELECTOR {
            let Ok(call) = abi::productToTokenCall::abi_decode(data, true) else {
                return CallOutcome::Revert("bad calldata".to_string());
            };
            let id = state
                .products
                .get(&call.productHash)
                .copied()
                .unwrap_or(U256::ZERO);
            CallOutcome::Return(abi::productToTokenCall::abi_encode_returns(&(id,)))
        } else if selector == abi::productExistsCall::SELECTOR {
            let Ok(call) = abi::productExistsCall::abi_decode(data, true) else {
                return CallOutcome::Revert("bad calldata".to_string());
            };
            let exists = state.products.contains_key(&call.productHash);
            CallOutcome::Return(abi::productExistsCall::abi_encode_returns(&(exists,)))
        } else if selector == abi::ownerOfCall::SELECTOR {
            let Ok(call) = abi::ownerOfCall::abi_decode(data, true) else {
                return CallOutcome::Revert("bad calldata".to_string());
            };
            match state.tokens.get(&call.tokenId) {
                Some((owner, _)) => {
                    CallOutcome::Return(abi::ownerOfCall::abi_encode_returns(&(*owner,)))
                }
                None => CallOutcome::Revert("ERC721NonexistentToken".to_string()),
            }
        } else if selector == abi::tokenURICall::SELECTOR {
            let Ok(call) = abi::tokenURICall::abi_decode(data, true) else {
                return CallOutcome::Revert("bad calldata".to_string());
            };
            match state.tokens.get(&call.tokenId) {
                Some((_, uri)) => {
                    CallOutcome::Return(abi::tokenURICall::abi_encode_returns(&(uri.clone(),)))
                }
                None => CallOutcome::Revert("ERC721NonexistentToken".to_string()),
            }
        } else if selector == abi::verifiedBrandsCall::SELECTOR {
            let Ok(call) = abi::verifiedBrandsCall::abi_decode(data, true) else {
                return CallOutcome::Revert("bad calldata".to_string());
            };
            let verified = state.brands.contains(&call.brand);
            CallOutcome::Return(abi::verifiedBrandsCall::abi_encode_returns(&(verified,)))
        } else if selector == abi::ownerCall::SELECTOR {
            CallOutcome::Return(abi::ownerCall::abi_encode_returns(&(state.admin,)))
        } else if selector == abi::balanceOfCall::SELECTOR {
            let Ok(call) = abi::balanceOfCall::abi_decode(data, true) else {
                return CallOutcome::Revert("bad calldata".to_string());
            };
            let balance = U256::from(state.holdings(call.account).len());
            CallOutcome::Return(abi::balanceOfCall::abi_encode_returns(&(balance,)))
        } else if selector == abi::tokenOfOwnerByIndexCall::SELECTOR {
            let Ok(call) = abi::tokenOfOwnerByIndexCall::abi_decode(data, true) else {
                return CallOutcome::Revert("bad calldata".to_string());
            };
            let holdings = state.holdings(call.account);
            let index = u64::try_from(call.index)
                .ok()
                .and_then(|i| usize::try_from(i).ok())
                .unwrap_or(usize::MAX);
            match holdings.get(index) {
                Some(id) => CallOutcome::Return(
                    abi::tokenOfOwnerByIndexCall::abi_encode_returns(&(*id,)),
                ),
                None => CallOutcome::Revert("ERC721OutOfBoundsIndex".to_string()),
            }
        } else {
            CallOutcome::Revert("unknown selector".to_string())
        }
    }
}

impl Respond for FakeContract {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = request.body_json::<Value>() else {
            return ResponseTemplate::new(400);
        };
        let id = body["id"].clone();

        let reply = match body["method"].as_str() {
            Some("eth_chainId") => json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": format!("0x{:x}", self.chain_id),
            }),
            Some("eth_call") => {
                let data = body["params"][0]["data"]
                    .as_str()
                    .and_then(|s| hex::decode(s.trim_start_matches("0x")).ok())
                    .unwrap_or_default();
                match self.dispatch(&data) {
                    CallOutcome::Return(bytes) => json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "result": format!("0x{}", hex::encode(bytes)),
                    }),
                    CallOutcome::Revert(reason) => json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": {
                            "code": EXECUTION_REVERTED,
                            "message": format!("execution reverted: {reason}"),
                        },
                    }),
                }
            }
            _ => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": "method not found" },
            }),
        };

        ResponseTemplate::new(200).set_body_json(reply)
    }
}

/// Emulated chain endpoint plus gateway.
pub struct TestHarness {
    chain: MockServer,
    gateway: MockServer,
    state: Arc<Mutex<ContractState>>,
}

impl TestHarness {
    /// Start both servers with an empty registry administered by `admin`.
    pub async fn start(admin: Address) -> Self {
        let chain = MockServer::start().await;
        let gateway = MockServer::start().await;
        let state = Arc::new(Mutex::new(ContractState {
            admin,
            next_token: 1,
            ..ContractState::default()
        }));

        Mock::given(method("POST"))
            .respond_with(FakeContract {
                state: Arc::clone(&state),
                chain_id: SEPOLIA_CHAIN_ID,
            })
            .mount(&chain)
            .await;

        Self {
            chain,
            gateway,
            state,
        }
    }

    /// Configuration pointing the crate at the emulated services.
    pub fn config(&self) -> LuxauthConfig {
        let mut config = LuxauthConfig::default();
        config.chain.rpc_url = self.chain.uri();
        config.chain.contract_address = DEFAULT_CONTRACT_ADDRESS.to_string();
        config.chain.request_timeout_secs = 5;
        config.metadata.gateway = format!("{}/ipfs/", self.gateway.uri());
        config.metadata.fetch_timeout_secs = 1;
        config
    }

    /// Register a product; token ids are assigned sequentially from 1.
    pub fn mint(&self, product_hash: &str, owner: Address, token_uri: &str) -> TokenId {
        let mut state = self.state.lock();
        let id = U256::from(state.next_token);
        state.next_token += 1;
        state.products.insert(product_hash.to_string(), id);
        state.tokens.insert(id, (owner, token_uri.to_string()));
        TokenId::new(id)
    }

    /// Put `brand` on the verified brand list.
    pub fn add_brand(&self, brand: Address) {
        self.state.lock().brands.insert(brand);
    }

    /// Serve `document` at `/ipfs/<cid>`.
    pub async fn serve_document(&self, cid: &str, document: &Value) {
        self.serve(cid, ResponseTemplate::new(200).set_body_json(document))
            .await;
    }

    /// Serve `document` at `/ipfs/<cid>` after `delay`.
    pub async fn serve_document_slowly(&self, cid: &str, document: &Value, delay: Duration) {
        self.serve(
            cid,
            ResponseTemplate::new(200)
                .set_body_json(document)
                .set_delay(delay),
        )
        .await;
    }

    /// Serve a raw body with the given status at `/ipfs/<cid>`.
    pub async fn serve_raw(&self, cid: &str, status: u16, body: &str) {
        self.serve(
            cid,
            ResponseTemplate::new(status).set_body_string(body.to_string()),
        )
        .await;
    }

    async fn serve(&self, cid: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/ipfs/{cid}")))
            .respond_with(template)
            .mount(&self.gateway)
            .await;
    }

    /// Make every further chain request fail with HTTP `status`.
    pub async fn break_chain_with_status(&self, status: u16) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .with_priority(1)
            .mount(&self.chain)
            .await;
    }

    /// Make every further chain request return a JSON-RPC error object.
    pub async fn break_chain_with_rpc_error(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32005, "message": "rate limit exceeded" },
            })))
            .with_priority(1)
            .mount(&self.chain)
            .await;
    }

    /// Number of requests the gateway has received.
    pub async fn gateway_requests(&self) -> usize {
        self.gateway
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}
