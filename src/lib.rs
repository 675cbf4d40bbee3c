//! Mintsmith - SPL token launcher library
//!
//! Builds, signs, and submits the two transactions that launch a fungible
//! token: mint creation with Metaplex metadata, then associated-account
//! creation and the initial mint. The instruction and derivation layers
//! are pure and fully testable offline; network effects are confined to
//! the [`client::SubmissionClient`] boundary.

pub mod assembler;
pub mod client;
pub mod config;
pub mod errors;
pub mod flow;
pub mod instructions;
pub mod metadata;
pub mod pda;
pub mod wallet;

// Re-export commonly used types
pub use client::{ConfirmationOutcome, RpcSubmissionClient, SubmissionClient};
pub use config::{Config, ProgramRegistry};
pub use errors::LaunchError;
pub use flow::{launch_token, mint_supply, ConfirmedMint};
pub use metadata::{CreateMetadataArgs, Creator, TokenMetadata};
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
