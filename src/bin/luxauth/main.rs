//! luxauth CLI entry point.

mod cli;

use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command, LogFormat};
use color_eyre::eyre::eyre;
use luxauth::chain::parse_account;
use luxauth::metadata::Gateway;
use luxauth::verify::validate_product_hash;
use luxauth::{
    AccountInspector, LuxauthConfig, ProductMetadata, VerificationClient, VerificationResult,
};
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit status for a product the registry does not know.
const EXIT_NOT_FOUND: u8 = 2;

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = cli.load_config()?;

    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    match cli.log_format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }

    debug!("luxauth v{}", env!("CARGO_PKG_VERSION"));

    run(cli.command, &config, cli.json).await
}

async fn run(command: Command, config: &LuxauthConfig, json: bool) -> color_eyre::Result<ExitCode> {
    match command {
        Command::Verify { hash, timeout_secs } => {
            let client = VerificationClient::from_config(config).await?;
            let result = match timeout_secs {
                Some(secs) => {
                    client
                        .verify_within(&hash, Duration::from_secs(secs))
                        .await?
                }
                None => client.verify(&hash).await?,
            };
            if json {
                print_json(&result)?;
            } else {
                print_verdict(&result);
            }
            if result.status.is_authentic() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_NOT_FOUND))
            }
        }
        Command::Exists { hash } => {
            let inspector = AccountInspector::from_config(config).await?;
            let exists = inspector.product_exists(&hash).await?;
            if json {
                print_json(&serde_json::json!({ "productHash": hash, "exists": exists }))?;
            } else {
                println!("{hash}: {}", if exists { "minted" } else { "not minted" });
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Owned { address } => {
            let account = parse_account(&address)?;
            let inspector = AccountInspector::from_config(config).await?;
            let products = inspector.owned_products(account).await?;
            if json {
                print_json(&products)?;
            } else if products.is_empty() {
                println!("{account} holds no products");
            } else {
                for product in &products {
                    let name = product
                        .metadata
                        .as_ref()
                        .and_then(ProductMetadata::from_document)
                        .and_then(|m| m.name)
                        .unwrap_or_else(|| "(metadata unavailable)".to_string());
                    println!("#{}  {}  {}", product.token_id, name, product.explorer_url);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Brand { address } => {
            let account = parse_account(&address)?;
            let inspector = AccountInspector::from_config(config).await?;
            let status = inspector.brand_status(account).await?;
            if json {
                print_json(&status)?;
            } else {
                println!("verified brand: {}", status.is_verified);
                println!("contract owner: {}", status.is_contract_owner);
                println!("can mint:       {}", status.can_mint);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Metadata { name, hash, image } => {
            validate_product_hash(&hash)?;
            let gateway = Gateway::new(&config.metadata.gateway)?;
            let document = ProductMetadata::for_product(&name, &hash, &image, &gateway, Utc::now());
            print_json(&document)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::InitConfig { path } => {
            let path = path
                .or_else(LuxauthConfig::default_path)
                .ok_or_else(|| eyre!("no default config directory on this platform"))?;
            LuxauthConfig::default().to_file(&path)?;
            info!("Wrote default configuration to {}", path.display());
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_verdict(result: &VerificationResult) {
    let (Some(token_id), Some(owner)) = (result.token_id, result.owner) else {
        println!("NOT_FOUND  {}", result.product_hash);
        return;
    };
    println!("AUTHENTIC  {}", result.product_hash);
    println!("  token:  {token_id}");
    println!("  owner:  {owner}");
    match result.product_metadata().and_then(|m| m.name) {
        Some(name) => println!("  name:   {name}"),
        None if result.metadata.is_none() => println!("  metadata unavailable"),
        None => {}
    }
}

fn print_json<T: Serialize>(value: &T) -> color_eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
