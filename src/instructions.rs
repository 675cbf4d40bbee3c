//! Instruction builders for the launch-and-mint flow
//!
//! Each builder is a pure function from typed parameters to an
//! [`Instruction`]. The account list of every instruction is a hard
//! contract with the target program: a wrong order or a wrong
//! signer/writable flag is rejected on-chain, often opaquely, so the
//! tuples below are fixed and covered by fixture tests.
//!
//! Token-program payloads are packed by `spl_token`'s own
//! [`TokenInstruction`] codec so the data bytes stay byte-exact with what
//! validators expect, while the account lists are laid out here against a
//! caller-supplied program id (see [`crate::config::ProgramRegistry`]).

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction, system_program, sysvar,
};
use spl_token::instruction::TokenInstruction;

use crate::errors::LaunchError;
use crate::metadata::{self, CreateMetadataArgs};

/// Build a system-program CreateAccount instruction
///
/// Accounts: `[payer (signer, writable), new_account (signer, writable)]`.
/// Data: opcode 0 + lamports (u64 LE) + space (u64 LE) + owner (32 bytes).
pub fn create_account(
    payer: &Pubkey,
    new_account: &Pubkey,
    lamports: u64,
    space: u64,
    owner: &Pubkey,
) -> Instruction {
    system_instruction::create_account(payer, new_account, lamports, space, owner)
}

/// Build a token-program InitializeMint instruction
///
/// Accounts: `[mint (writable), rent sysvar (readonly)]`. Neither account
/// signs; the mint keypair signs only the enclosing CreateAccount.
pub fn initialize_mint(
    token_program: &Pubkey,
    mint: &Pubkey,
    decimals: u8,
    mint_authority: &Pubkey,
    freeze_authority: Option<&Pubkey>,
) -> Instruction {
    let data = TokenInstruction::InitializeMint {
        decimals,
        mint_authority: *mint_authority,
        freeze_authority: freeze_authority.copied().into(),
    }
    .pack();

    Instruction {
        program_id: *token_program,
        accounts: vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data,
    }
}

/// Build a metadata-program CreateMetadataAccount instruction
///
/// Accounts, in exactly this order:
/// 1. metadata PDA (writable)
/// 2. mint (readonly)
/// 3. mint authority (signer)
/// 4. payer (signer, writable)
/// 5. update authority (readonly)
/// 6. system program (readonly)
/// 7. rent sysvar (readonly)
///
/// Data is the one-byte opcode followed by the Borsh-serialized record and
/// mutability flag.
pub fn create_metadata_account(
    metadata_program: &Pubkey,
    metadata_account: &Pubkey,
    mint: &Pubkey,
    mint_authority: &Pubkey,
    payer: &Pubkey,
    update_authority: &Pubkey,
    args: &CreateMetadataArgs,
) -> Result<Instruction, LaunchError> {
    let data = metadata::encode_create_metadata(args)?;

    Ok(Instruction {
        program_id: *metadata_program,
        accounts: vec![
            AccountMeta::new(*metadata_account, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*mint_authority, true),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(*update_authority, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data,
    })
}

/// Build a CreateAssociatedTokenAccount instruction
///
/// Accounts: `[payer (signer, writable), associated (writable), owner,
/// mint, system program, token program, rent sysvar]` with the tail all
/// readonly. Data is empty; the opcode is implicit in the target program.
pub fn create_associated_token_account(
    associated_token_program: &Pubkey,
    token_program: &Pubkey,
    payer: &Pubkey,
    associated_account: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *associated_token_program,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*associated_account, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(*token_program, false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: Vec::new(),
    }
}

/// Build a token-program MintTo instruction
///
/// Accounts: `[mint (writable), destination (writable), authority
/// (signer)]`, followed by any extra multisig signers (readonly, signer).
/// When extra signers are present the authority itself does not sign.
/// Data: opcode + amount (u64 LE).
pub fn mint_to(
    token_program: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    extra_signers: &[&Pubkey],
    amount: u64,
) -> Instruction {
    let data = TokenInstruction::MintTo { amount }.pack();

    let mut accounts = Vec::with_capacity(3 + extra_signers.len());
    accounts.push(AccountMeta::new(*mint, false));
    accounts.push(AccountMeta::new(*destination, false));
    accounts.push(AccountMeta::new_readonly(
        *authority,
        extra_signers.is_empty(),
    ));
    for signer in extra_signers {
        accounts.push(AccountMeta::new_readonly(**signer, true));
    }

    Instruction {
        program_id: *token_program,
        accounts,
        data,
    }
}
