//! Configuration for luxauth.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Sepolia testnet chain id.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Address of the deployed LuxuryAuthNFT registry on Sepolia.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x4513736493A24cccB3c7Ff0AadFd7b16faf6087f";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuxauthConfig {
    /// Chain endpoint configuration.
    #[serde(default)]
    pub chain: ChainConfig,

    /// Metadata document store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Block explorer configuration.
    #[serde(default)]
    pub explorer: ExplorerConfig,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Chain endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Registry contract address (hex, 0x-prefixed).
    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    /// Expected chain id.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Check `eth_chainId` against `chain_id` when connecting.
    #[serde(default = "default_true")]
    pub verify_chain_id: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Metadata document store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Gateway base used to translate `ipfs://` URIs.
    #[serde(default = "default_gateway")]
    pub gateway: String,

    /// Upper bound on a single document fetch, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Number of content-addressed documents to keep in memory.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Largest accepted document body, in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

/// Block explorer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Explorer base URL used to build NFT links.
    #[serde(default = "default_explorer_url")]
    pub base_url: String,
}

impl Default for LuxauthConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            metadata: MetadataConfig::default(),
            explorer: ExplorerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract_address: default_contract_address(),
            chain_id: default_chain_id(),
            verify_chain_id: true,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ChainConfig {
    /// Chain id to enforce on connect, if the check is enabled.
    #[must_use]
    pub fn expected_chain_id(&self) -> Option<u64> {
        self.verify_chain_id.then_some(self.chain_id)
    }

    /// Per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            gateway: default_gateway(),
            fetch_timeout_secs: default_fetch_timeout(),
            cache_capacity: default_cache_capacity(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

impl MetadataConfig {
    /// Document fetch timeout.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: default_explorer_url(),
        }
    }
}

fn default_rpc_url() -> String {
    "https://rpc.sepolia.org".to_string()
}

fn default_contract_address() -> String {
    DEFAULT_CONTRACT_ADDRESS.to_string()
}

const fn default_chain_id() -> u64 {
    SEPOLIA_CHAIN_ID
}

const fn default_true() -> bool {
    true
}

const fn default_request_timeout() -> u64 {
    30
}

fn default_gateway() -> String {
    "https://ipfs.io/ipfs/".to_string()
}

const fn default_fetch_timeout() -> u64 {
    10
}

const fn default_cache_capacity() -> usize {
    1024
}

const fn default_max_document_bytes() -> usize {
    1024 * 1024
}

fn default_explorer_url() -> String {
    "https://sepolia.etherscan.io".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LuxauthConfig {
    /// Default location of the configuration file, if the platform has one.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "luxauth")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
