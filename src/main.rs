//! Mintsmith - SPL token launcher
//!
//! Entry point wiring configuration, wallet loading, and the RPC client
//! around the two-phase flow: launch the token, then mint the initial
//! supply to a recipient.

use anyhow::{Context, Result};
use clap::Parser;
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use std::str::FromStr;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mintsmith::config::Config;
use mintsmith::flow;
use mintsmith::metadata::TokenMetadata;
use mintsmith::wallet::WalletManager;
use mintsmith::RpcSubmissionClient;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "mintsmith.toml")]
    config: String,

    /// Recipient of the initial supply (base58 address)
    #[arg(short, long)]
    recipient: String,

    /// Amount to mint, in base units
    #[arg(short, long, default_value = "1300")]
    amount: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose)?;

    info!("🚀 Starting Mintsmith token launcher");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    info!("📋 Loading configuration from: {}", args.config);
    let config = load_config(&args.config)?;
    let registry = config.registry().context("Invalid program registry")?;

    let recipient = Pubkey::from_str(&args.recipient)
        .with_context(|| format!("Invalid recipient address: {}", args.recipient))?;

    info!("🔑 Loading authority from: {}", config.wallet.keypair_path);
    let wallet = WalletManager::from_file(&config.wallet.keypair_path)
        .context("Failed to load authority keypair")?;
    info!("💼 Authority address: {}", wallet.pubkey());

    // The mint identity is fresh per launch; it signs only at creation.
    let mint = Keypair::new();
    info!("🪙 Mint address: {}", mint.pubkey());

    let client = RpcSubmissionClient::from_config(&config.rpc);
    let record = TokenMetadata {
        name: config.token.name.clone(),
        symbol: config.token.symbol.clone(),
        uri: config.token.uri.clone(),
        seller_fee_basis_points: config.token.seller_fee_basis_points,
        creators: None,
    };

    let confirmed = flow::launch_token(
        &client,
        &registry,
        &mint,
        wallet.keypair(),
        record,
        config.token.is_mutable,
    )
    .await
    .context("Token launch failed")?;
    info!(
        "✅ Token launched: mint {} (signature {})",
        confirmed.mint(),
        confirmed.signature()
    );

    let signature = flow::mint_supply(
        &client,
        &registry,
        wallet.keypair(),
        &confirmed,
        &recipient,
        args.amount,
    )
    .await
    .context("Minting initial supply failed")?;
    info!(
        "✅ Minted {} base units to {} (signature {})",
        args.amount, recipient, signature
    );

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "mintsmith=debug,info"
    } else {
        "mintsmith=info,warn,error"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file(path).with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        Ok(Config::default())
    }
}
