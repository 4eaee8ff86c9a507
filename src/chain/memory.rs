//! In-memory registry.
//!
//! Mirrors the contract's read surface without a chain. Used by tests and by
//! embedders that want to exercise verification offline.

use super::reader::{ProductLookup, RegistryQueries};
use super::types::{AccountId, TokenId};
use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[derive(Debug, Clone)]
struct Token {
    product_hash: String,
    owner: AccountId,
    uri: String,
}

#[derive(Debug, Default)]
struct State {
    products: HashMap<String, TokenId>,
    tokens: BTreeMap<TokenId, Token>,
    brands: HashSet<AccountId>,
    next_token: u64,
}

/// Registry held in memory.
///
/// Token ids start at 1, matching the deployed contract.
pub struct MemoryRegistry {
    state: RwLock<State>,
    admin: AccountId,
    offline: AtomicBool,
    call_count: AtomicU32,
}

impl MemoryRegistry {
    /// Create an empty registry administered by `admin`.
    #[must_use]
    pub fn new(admin: AccountId) -> Self {
        Self {
            state: RwLock::new(State {
                next_token: 1,
                ..State::default()
            }),
            admin,
            offline: AtomicBool::new(false),
            call_count: AtomicU32::new(0),
        }
    }

    /// Record a minted product and return its token id.
    ///
    /// Minting a hash twice returns the existing token.
    pub fn mint(&self, product_hash: &str, owner: AccountId, uri: &str) -> TokenId {
        let mut state = self.state.write();
        if let Some(id) = state.products.get(product_hash) {
            return *id;
        }
        let id = TokenId::from(state.next_token);
        state.next_token += 1;
        state.products.insert(product_hash.to_string(), id);
        state.tokens.insert(
            id,
            Token {
                product_hash: product_hash.to_string(),
                owner,
                uri: uri.to_string(),
            },
        );
        id
    }

    /// Move `token_id` to a new owner.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown token.
    pub fn transfer(&self, token_id: TokenId, to: AccountId) -> Result<()> {
        let mut state = self.state.write();
        let token = state
            .tokens
            .get_mut(&token_id)
            .ok_or_else(|| Error::InvalidInput(format!("unknown token {token_id}")))?;
        token.owner = to;
        Ok(())
    }

    /// Add `account` to the verified brand list.
    pub fn add_brand(&self, account: AccountId) {
        self.state.write().brands.insert(account);
    }

    /// Make every read fail with a network error, as if the endpoint were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of reads served or refused so far.
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Product hash recorded for `token_id`.
    #[must_use]
    pub fn product_hash(&self, token_id: TokenId) -> Option<String> {
        self.state
            .read()
            .tokens
            .get(&token_id)
            .map(|t| t.product_hash.clone())
    }

    fn enter(&self) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network("registry offline".to_string()));
        }
        Ok(())
    }

    fn token(&self, token_id: TokenId) -> Result<Token> {
        self.state
            .read()
            .tokens
            .get(&token_id)
            .cloned()
            .ok_or_else(|| Error::Protocol(format!("execution reverted: token {token_id} does not exist")))
    }
}

#[async_trait]
impl ProductLookup for MemoryRegistry {
    async fn lookup_token_id(&self, product_hash: &str) -> Result<Option<TokenId>> {
        self.enter()?;
        Ok(self.state.read().products.get(product_hash).copied())
    }

    async fn owner_of(&self, token_id: TokenId) -> Result<AccountId> {
        self.enter()?;
        self.token(token_id).map(|t| t.owner)
    }

    async fn metadata_pointer(&self, token_id: TokenId) -> Result<String> {
        self.enter()?;
        self.token(token_id).map(|t| t.uri)
    }
}

#[async_trait]
impl RegistryQueries for MemoryRegistry {
    async fn product_exists(&self, product_hash: &str) -> Result<bool> {
        self.enter()?;
        Ok(self.state.read().products.contains_key(product_hash))
    }

    async fn is_verified_brand(&self, account: AccountId) -> Result<bool> {
        self.enter()?;
        Ok(self.state.read().brands.contains(&account))
    }

    async fn contract_owner(&self) -> Result<AccountId> {
        self.enter()?;
        Ok(self.admin)
    }

    async fn balance_of(&self, account: AccountId) -> Result<u64> {
        self.enter()?;
        let held = self
            .state
            .read()
            .tokens
            .values()
            .filter(|t| t.owner == account)
            .count();
        Ok(held as u64)
    }

    async fn token_of_owner_by_index(&self, account: AccountId, index: u64) -> Result<TokenId> {
        self.enter()?;
        let state = self.state.read();
        let position = usize::try_from(index)
            .map_err(|_| Error::Protocol(format!("owner index {index} out of bounds")))?;
        state
            .tokens
            .iter()
            .filter(|(_, t)| t.owner == account)
            .nth(position)
            .map(|(id, _)| *id)
            .ok_or_else(|| Error::Protocol(format!("execution reverted: owner index {index} out of bounds")))
    }
}
