//! Configuration for the token launcher
//!
//! TOML-backed configuration with serde defaults, plus the typed
//! [`ProgramRegistry`] the builders consume. Program ids live in an
//! explicit immutable value passed down the call chain rather than in
//! free-floating globals, so tests can target alternate deployments (a
//! local test validator with different program addresses) deterministically.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::errors::LaunchError;

/// Metaplex token metadata program (mainnet/devnet deployment)
pub const METADATA_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// RPC endpoint configuration
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Wallet configuration
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Token parameters for the launch
    #[serde(default)]
    pub token: TokenConfig,

    /// Target program deployments
    #[serde(default)]
    pub programs: ProgramsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Confirmation poll interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Confirmation deadline in seconds
    #[serde(default = "default_confirm_timeout")]
    pub confirm_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to the authority keypair file
    #[serde(default = "default_keypair_path")]
    pub keypair_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token name, e.g. "0xAlice"
    #[serde(default = "default_name")]
    pub name: String,

    /// Ticker symbol, e.g. "ALICE"
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Off-chain metadata URI (may be empty)
    #[serde(default)]
    pub uri: String,

    /// Royalty basis points on secondary sales
    #[serde(default)]
    pub seller_fee_basis_points: u16,

    /// Number of decimals for the mint
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Whether the metadata stays mutable after creation
    #[serde(default = "default_true")]
    pub is_mutable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramsConfig {
    /// SPL token program id (base58)
    #[serde(default = "default_token_program")]
    pub token_program: String,

    /// Associated token account program id (base58)
    #[serde(default = "default_associated_token_program")]
    pub associated_token_program: String,

    /// Metaplex token metadata program id (base58)
    #[serde(default = "default_metadata_program")]
    pub metadata_program: String,
}

// Default value functions
fn default_endpoint() -> String {
    "https://api.devnet.solana.com".to_string()
}
fn default_poll_interval() -> u64 {
    500
}
fn default_confirm_timeout() -> u64 {
    60
}
fn default_keypair_path() -> String {
    "~/.config/solana/id.json".to_string()
}
fn default_name() -> String {
    "0xAlice".to_string()
}
fn default_symbol() -> String {
    "ALICE".to_string()
}
fn default_decimals() -> u8 {
    2
}
fn default_true() -> bool {
    true
}
fn default_token_program() -> String {
    spl_token::id().to_string()
}
fn default_associated_token_program() -> String {
    spl_associated_token_account::id().to_string()
}
fn default_metadata_program() -> String {
    METADATA_PROGRAM_ID.to_string()
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            poll_interval_ms: default_poll_interval(),
            confirm_timeout_secs: default_confirm_timeout(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: default_keypair_path(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            uri: String::new(),
            seller_fee_basis_points: 0,
            decimals: default_decimals(),
            is_mutable: default_true(),
        }
    }
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            token_program: default_token_program(),
            associated_token_program: default_associated_token_program(),
            metadata_program: default_metadata_program(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse the program section into a typed registry
    pub fn registry(&self) -> Result<ProgramRegistry, LaunchError> {
        ProgramRegistry::from_config(&self.programs, self.token.decimals)
    }
}

/// The immutable set of program deployments and mint constants a launch
/// targets
///
/// Passed explicitly to builders and the flow; never read from globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramRegistry {
    /// SPL token program
    pub token_program: Pubkey,
    /// Associated token account program
    pub associated_token_program: Pubkey,
    /// Metaplex token metadata program
    pub metadata_program: Pubkey,
    /// Decimals for mints created under this registry
    pub decimals: u8,
}

impl ProgramRegistry {
    /// Registry for the canonical mainnet/devnet deployments
    pub fn standard(decimals: u8) -> Self {
        Self {
            token_program: spl_token::id(),
            associated_token_program: spl_associated_token_account::id(),
            metadata_program: METADATA_PROGRAM_ID,
            decimals,
        }
    }

    /// Parse a registry out of the raw config strings
    fn from_config(programs: &ProgramsConfig, decimals: u8) -> Result<Self, LaunchError> {
        Ok(Self {
            token_program: parse_program_id("token_program", &programs.token_program)?,
            associated_token_program: parse_program_id(
                "associated_token_program",
                &programs.associated_token_program,
            )?,
            metadata_program: parse_program_id("metadata_program", &programs.metadata_program)?,
            decimals,
        })
    }
}

fn parse_program_id(field: &str, value: &str) -> Result<Pubkey, LaunchError> {
    Pubkey::from_str(value)
        .map_err(|e| LaunchError::config(format!("invalid {field} '{value}': {e}")))
}
