//! The two-phase launch flow
//!
//! Phase 1 creates the mint and its metadata in one atomic transaction;
//! phase 2 creates the recipient's associated account and mints supply
//! into it. Phase 2's instructions reference an account that only exists
//! once phase 1 has landed, so the dependency is made structural:
//! [`mint_supply`] takes a [`ConfirmedMint`], and the only way to obtain
//! one is a successful, confirmed [`launch_token`].
//!
//! Each phase fetches its own blockhash. A blockhash held across the
//! confirmation wait may have expired by the time the next transaction is
//! built, so reuse is never attempted.

use solana_sdk::{
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use spl_token::state::Mint;
use tracing::{debug, info};

use crate::assembler;
use crate::client::{ConfirmationOutcome, SubmissionClient};
use crate::config::ProgramRegistry;
use crate::errors::LaunchError;
use crate::instructions;
use crate::metadata::{CreateMetadataArgs, TokenMetadata};
use crate::pda;

/// Proof that a mint's creation transaction was confirmed on-chain
///
/// Unforgeable outside this module: phase 2 demands one, which makes
/// "confirm transaction 1 before building transaction 2" a requirement the
/// type system enforces instead of a calling convention.
#[derive(Debug)]
pub struct ConfirmedMint {
    mint: Pubkey,
    signature: Signature,
}

impl ConfirmedMint {
    /// The confirmed mint's address
    pub fn mint(&self) -> Pubkey {
        self.mint
    }

    /// Signature of the confirmed creation transaction
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

/// Phase 1: create the mint account, initialize it, and attach metadata
///
/// Builds exactly [CreateAccount, InitializeMint, CreateMetadataAccount]
/// in one transaction signed by the mint keypair (creation only) and the
/// authority (fee payer, mint authority, update authority). Returns only
/// after the ledger confirms the transaction.
pub async fn launch_token<C: SubmissionClient + ?Sized>(
    client: &C,
    registry: &ProgramRegistry,
    mint: &Keypair,
    authority: &Keypair,
    record: TokenMetadata,
    is_mutable: bool,
) -> Result<ConfirmedMint, LaunchError> {
    let mint_pubkey = mint.pubkey();
    let authority_pubkey = authority.pubkey();

    let rent = client.minimum_rent_exempt_balance(Mint::LEN).await?;
    debug!(lamports = rent, space = Mint::LEN, "Sized mint account");

    let create_account_ix = instructions::create_account(
        &authority_pubkey,
        &mint_pubkey,
        rent,
        Mint::LEN as u64,
        &registry.token_program,
    );
    let initialize_mint_ix = instructions::initialize_mint(
        &registry.token_program,
        &mint_pubkey,
        registry.decimals,
        &authority_pubkey,
        None,
    );

    let (metadata_pda, _bump) = pda::metadata_account(&registry.metadata_program, &mint_pubkey)?;
    let create_metadata_ix = instructions::create_metadata_account(
        &registry.metadata_program,
        &metadata_pda,
        &mint_pubkey,
        &authority_pubkey,
        &authority_pubkey,
        &authority_pubkey,
        &CreateMetadataArgs {
            data: record,
            is_mutable,
        },
    )?;

    let blockhash = client.latest_blockhash().await?;
    let message = assembler::assemble(
        &[create_account_ix, initialize_mint_ix, create_metadata_ix],
        &authority_pubkey,
        blockhash,
    );
    let tx = assembler::sign(message, &[mint, authority])?;

    let signature = client.submit(&tx).await?;
    info!(
        mint = %mint_pubkey,
        metadata = %metadata_pda,
        signature = %signature,
        "Submitted mint creation transaction"
    );

    match client.await_confirmation(&signature).await? {
        ConfirmationOutcome::Confirmed => {
            info!(mint = %mint_pubkey, "Mint creation confirmed");
            Ok(ConfirmedMint {
                mint: mint_pubkey,
                signature,
            })
        }
        ConfirmationOutcome::Failed(reason) => Err(LaunchError::OnChainExecution { reason }),
        ConfirmationOutcome::TimedOut => Err(LaunchError::ConfirmationTimeout { signature }),
    }
}

/// Phase 2: create the recipient's associated account and mint supply
///
/// Builds exactly [CreateAssociatedTokenAccount, MintTo] in one
/// transaction signed by the authority alone. The associated account
/// address is derived, not communicated: `[recipient, token program,
/// mint]` under the associated-token program.
pub async fn mint_supply<C: SubmissionClient + ?Sized>(
    client: &C,
    registry: &ProgramRegistry,
    authority: &Keypair,
    confirmed: &ConfirmedMint,
    recipient: &Pubkey,
    amount: u64,
) -> Result<Signature, LaunchError> {
    let mint = confirmed.mint();
    let authority_pubkey = authority.pubkey();

    let (associated, _bump) = pda::associated_token_address(
        recipient,
        &registry.token_program,
        &mint,
        &registry.associated_token_program,
    )?;
    debug!(recipient = %recipient, associated = %associated, "Derived associated account");

    let create_associated_ix = instructions::create_associated_token_account(
        &registry.associated_token_program,
        &registry.token_program,
        &authority_pubkey,
        &associated,
        recipient,
        &mint,
    );
    let mint_to_ix = instructions::mint_to(
        &registry.token_program,
        &mint,
        &associated,
        &authority_pubkey,
        &[],
        amount,
    );

    // Fresh blockhash for this transaction; the one from phase 1 is stale.
    let blockhash = client.latest_blockhash().await?;
    let message = assembler::assemble(
        &[create_associated_ix, mint_to_ix],
        &authority_pubkey,
        blockhash,
    );
    let tx = assembler::sign(message, &[authority])?;

    let signature = client.submit(&tx).await?;
    info!(
        mint = %mint,
        recipient = %recipient,
        amount,
        signature = %signature,
        "Submitted mint-to transaction"
    );

    match client.await_confirmation(&signature).await? {
        ConfirmationOutcome::Confirmed => Ok(signature),
        ConfirmationOutcome::Failed(reason) => Err(LaunchError::OnChainExecution { reason }),
        ConfirmationOutcome::TimedOut => Err(LaunchError::ConfirmationTimeout { signature }),
    }
}
