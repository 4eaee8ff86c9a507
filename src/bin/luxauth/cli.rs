//! Command-line interface definition.

use clap::{Parser, Subcommand, ValueEnum};
use luxauth::config::LuxauthConfig;
use std::path::PathBuf;

/// Verify NFT-backed luxury product certificates.
#[derive(Parser, Debug)]
#[command(name = "luxauth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(long, short, global = true, env = "LUXAUTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint.
    #[arg(long, global = true, env = "LUXAUTH_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Registry contract address.
    #[arg(long, global = true, env = "LUXAUTH_CONTRACT")]
    pub contract: Option<String>,

    /// Gateway base for `ipfs://` documents.
    #[arg(long, global = true, env = "LUXAUTH_GATEWAY")]
    pub gateway: Option<String>,

    /// Log level.
    #[arg(long, global = true, env = "RUST_LOG")]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, value_enum, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify a product hash.
    Verify {
        /// Product hash from the certificate.
        hash: String,

        /// Give up after this many seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Check whether a product hash has been minted.
    Exists {
        /// Product hash.
        hash: String,
    },

    /// List products held by an account.
    Owned {
        /// Account address.
        address: String,
    },

    /// Show minting rights of an account.
    Brand {
        /// Account address.
        address: String,
    },

    /// Print the metadata document a brand would pin for a new product.
    Metadata {
        /// Product name.
        #[arg(long)]
        name: String,

        /// Product hash.
        #[arg(long)]
        hash: String,

        /// Image URI (`ipfs://` or https).
        #[arg(long)]
        image: String,
    },

    /// Write the default configuration file.
    InitConfig {
        /// Destination (defaults to the per-user config path).
        path: Option<PathBuf>,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

impl Cli {
    /// Build the effective configuration.
    ///
    /// An explicit `--config` file must exist; otherwise the per-user file
    /// is loaded when present. Command-line values override file values.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file cannot be loaded.
    pub fn load_config(&self) -> color_eyre::Result<LuxauthConfig> {
        let mut config = if let Some(ref path) = self.config {
            LuxauthConfig::from_file(path)?
        } else {
            match LuxauthConfig::default_path() {
                Some(path) if path.exists() => LuxauthConfig::from_file(&path)?,
                _ => LuxauthConfig::default(),
            }
        };

        if let Some(ref rpc_url) = self.rpc_url {
            config.chain.rpc_url.clone_from(rpc_url);
        }
        if let Some(ref contract) = self.contract {
            config.chain.contract_address.clone_from(contract);
        }
        if let Some(ref gateway) = self.gateway {
            config.metadata.gateway.clone_from(gateway);
        }
        if let Some(ref log_level) = self.log_level {
            config.log_level.clone_from(log_level);
        }

        Ok(config)
    }
}
