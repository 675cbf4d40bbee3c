//! Transaction assembly and signing
//!
//! Assembly produces a canonical legacy message: identical instructions,
//! fee payer, and blockhash always serialize to identical message bytes,
//! which matters because every signer independently signs those bytes.
//! Signing validates the required-signer set up front and fails with
//! [`LaunchError::MissingSigner`] before any signature is produced, so a
//! failed sign never leaves a partially signed transaction behind.

use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    transaction::Transaction,
};

use crate::errors::LaunchError;

/// Assemble instructions into an unsigned legacy message
///
/// The fee payer is placed first in the account table; the blockhash bounds
/// the transaction's validity window and must be freshly fetched per
/// transaction, never reused across a confirmation boundary.
pub fn assemble(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    recent_blockhash: Hash,
) -> Message {
    Message::new_with_blockhash(instructions, Some(fee_payer), &recent_blockhash)
}

/// The deduplicated set of signers this message requires
///
/// The union of every `is_signer` account across all instructions, which
/// the message layout places at the front of its account table.
pub fn required_signers(message: &Message) -> &[Pubkey] {
    let count = message.header.num_required_signatures as usize;
    &message.account_keys[..count]
}

/// Sign a message with the supplied keypairs
///
/// Signer order does not affect the resulting wire bytes: signatures are
/// positioned by address, not by argument order.
///
/// # Errors
///
/// [`LaunchError::MissingSigner`] naming the first required address with no
/// matching keypair; [`LaunchError::Signing`] for residual SDK failures
/// (e.g. a supplied keypair the message does not reference).
pub fn sign(message: Message, signers: &[&Keypair]) -> Result<Transaction, LaunchError> {
    for required in required_signers(&message) {
        if !signers.iter().any(|keypair| keypair.pubkey() == *required) {
            return Err(LaunchError::MissingSigner {
                missing: *required,
            });
        }
    }

    let mut tx = Transaction::new_unsigned(message);
    let recent_blockhash = tx.message.recent_blockhash;
    tx.try_sign(&signers.to_vec(), recent_blockhash)
        .map_err(|e| LaunchError::Signing(e.to_string()))?;
    Ok(tx)
}

/// Serialize a signed transaction to validator wire format
///
/// Shortvec signature count + signatures + message bytes, exactly as
/// validators deserialize it.
pub fn wire_bytes(tx: &Transaction) -> Result<Vec<u8>, LaunchError> {
    bincode::serialize(tx).map_err(|e| LaunchError::submission(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::instruction::AccountMeta;

    fn two_signer_instruction(program_id: Pubkey, a: Pubkey, b: Pubkey) -> Instruction {
        Instruction {
            program_id,
            data: vec![1, 2, 3],
            accounts: vec![AccountMeta::new(a, true), AccountMeta::new(b, true)],
        }
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let program_id = Pubkey::new_unique();
        let payer = Keypair::new();
        let other = Keypair::new();
        let blockhash = Hash::new_unique();
        let ix = two_signer_instruction(program_id, payer.pubkey(), other.pubkey());

        let first = assemble(std::slice::from_ref(&ix), &payer.pubkey(), blockhash);
        let second = assemble(std::slice::from_ref(&ix), &payer.pubkey(), blockhash);

        assert_eq!(first.serialize(), second.serialize());
    }

    #[test]
    fn test_required_signers_deduplicated() {
        let program_id = Pubkey::new_unique();
        let payer = Keypair::new();
        let other = Keypair::new();
        // payer appears as signer in both instructions
        let instructions = vec![
            two_signer_instruction(program_id, payer.pubkey(), other.pubkey()),
            two_signer_instruction(program_id, payer.pubkey(), other.pubkey()),
        ];

        let message = assemble(&instructions, &payer.pubkey(), Hash::new_unique());
        let signers = required_signers(&message);

        assert_eq!(signers.len(), 2);
        assert_eq!(signers[0], payer.pubkey());
        assert!(signers.contains(&other.pubkey()));
    }

    #[test]
    fn test_sign_missing_signer() {
        let program_id = Pubkey::new_unique();
        let payer = Keypair::new();
        let other = Keypair::new();
        let ix = two_signer_instruction(program_id, payer.pubkey(), other.pubkey());
        let message = assemble(std::slice::from_ref(&ix), &payer.pubkey(), Hash::new_unique());

        let result = sign(message, &[&payer]);

        match result {
            Err(LaunchError::MissingSigner { missing }) => {
                assert_eq!(missing, other.pubkey());
            }
            other => panic!("Expected MissingSigner, got {other:?}"),
        }
    }

    #[test]
    fn test_sign_order_independent() {
        let program_id = Pubkey::new_unique();
        let payer = Keypair::new();
        let other = Keypair::new();
        let ix = two_signer_instruction(program_id, payer.pubkey(), other.pubkey());
        let message = assemble(std::slice::from_ref(&ix), &payer.pubkey(), Hash::new_unique());

        let forward = sign(message.clone(), &[&payer, &other]).expect("sign should succeed");
        let reversed = sign(message, &[&other, &payer]).expect("sign should succeed");

        assert_eq!(
            wire_bytes(&forward).expect("serialize should succeed"),
            wire_bytes(&reversed).expect("serialize should succeed")
        );
    }

    #[test]
    fn test_signed_transaction_verifies() {
        let program_id = Pubkey::new_unique();
        let payer = Keypair::new();
        let other = Keypair::new();
        let ix = two_signer_instruction(program_id, payer.pubkey(), other.pubkey());
        let message = assemble(std::slice::from_ref(&ix), &payer.pubkey(), Hash::new_unique());

        let tx = sign(message, &[&payer, &other]).expect("sign should succeed");

        tx.verify().expect("signatures should verify");
        assert_eq!(tx.signatures.len(), 2);
    }

    #[test]
    fn test_wire_bytes_round_trip() {
        let program_id = Pubkey::new_unique();
        let payer = Keypair::new();
        let other = Keypair::new();
        let ix = two_signer_instruction(program_id, payer.pubkey(), other.pubkey());
        let message = assemble(std::slice::from_ref(&ix), &payer.pubkey(), Hash::new_unique());
        let tx = sign(message, &[&payer, &other]).expect("sign should succeed");

        let bytes = wire_bytes(&tx).expect("serialize should succeed");
        let decoded: Transaction =
            bincode::deserialize(&bytes).expect("wire bytes should deserialize");

        assert_eq!(decoded, tx);
    }
}
