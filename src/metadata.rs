//! Metaplex metadata schema and its Borsh codec
//!
//! The on-chain metadata program deserializes its instruction payload with
//! a fixed Borsh layout: u32-length-prefixed UTF-8 strings, little-endian
//! integers, and a one-byte presence tag for the optional creator list.
//! Field order is part of the wire contract and must never change.
//!
//! Encoding validates representability bounds (the lengths the program
//! reserves account space for); semantic invariants such as creator shares
//! summing to 100 are the caller's responsibility.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::errors::LaunchError;

/// Maximum byte lengths reserved by the metadata program
pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;

/// Maximum number of creators per metadata record
pub const MAX_CREATORS: usize = 5;

/// One entry in a metadata record's creator list
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Creator {
    /// Creator's wallet address
    pub address: Pubkey,
    /// Whether this creator has countersigned the metadata
    pub verified: bool,
    /// Royalty share percentage (creators collectively sum to 100)
    pub share: u8,
}

/// The descriptive record attached to a mint
///
/// Immutable once constructed; `creators: None` is the common case and the
/// only "absent" representation (there is no present-but-empty state).
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    /// Full token name, e.g. "0xAlice"
    pub name: String,
    /// Ticker symbol, e.g. "ALICE"
    pub symbol: String,
    /// Off-chain JSON URI (may be empty)
    pub uri: String,
    /// Royalty basis points charged on secondary sales
    pub seller_fee_basis_points: u16,
    /// Optional ordered creator list, 1..=5 entries when present
    pub creators: Option<Vec<Creator>>,
}

impl TokenMetadata {
    /// Check the representability bounds the codec enforces
    pub fn validate(&self) -> Result<(), LaunchError> {
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(LaunchError::field_too_long(
                "name",
                self.name.len(),
                MAX_NAME_LENGTH,
            ));
        }
        if self.symbol.len() > MAX_SYMBOL_LENGTH {
            return Err(LaunchError::field_too_long(
                "symbol",
                self.symbol.len(),
                MAX_SYMBOL_LENGTH,
            ));
        }
        if self.uri.len() > MAX_URI_LENGTH {
            return Err(LaunchError::field_too_long(
                "uri",
                self.uri.len(),
                MAX_URI_LENGTH,
            ));
        }
        if let Some(creators) = &self.creators {
            if creators.is_empty() {
                return Err(LaunchError::SchemaEncoding(
                    "creators list is present but empty; use None instead".to_string(),
                ));
            }
            if creators.len() > MAX_CREATORS {
                return Err(LaunchError::field_too_long(
                    "creators",
                    creators.len(),
                    MAX_CREATORS,
                ));
            }
        }
        Ok(())
    }
}

/// Arguments for the create-metadata instruction
///
/// Same record layout as [`TokenMetadata`] with the mutability flag
/// appended after it.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateMetadataArgs {
    /// The record to attach to the mint
    pub data: TokenMetadata,
    /// Whether the update authority may change the record later
    pub is_mutable: bool,
}

/// Metadata-program instructions used by this crate
///
/// The Borsh enum discriminant doubles as the program's one-byte opcode:
/// CreateMetadataAccount is variant 0.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum MetadataInstruction {
    /// Create and populate a metadata account for a mint
    CreateMetadataAccount(CreateMetadataArgs),
}

/// Encode a metadata record to its Borsh bytes
pub fn encode_record(record: &TokenMetadata) -> Result<Vec<u8>, LaunchError> {
    record.validate()?;
    borsh::to_vec(record).map_err(|e| LaunchError::SchemaEncoding(e.to_string()))
}

/// Decode a metadata record from Borsh bytes
pub fn decode_record(bytes: &[u8]) -> Result<TokenMetadata, LaunchError> {
    borsh::from_slice(bytes).map_err(|e| LaunchError::SchemaEncoding(e.to_string()))
}

/// Encode the create-metadata instruction payload (opcode + args)
pub fn encode_create_metadata(args: &CreateMetadataArgs) -> Result<Vec<u8>, LaunchError> {
    args.data.validate()?;
    borsh::to_vec(&MetadataInstruction::CreateMetadataAccount(args.clone()))
        .map_err(|e| LaunchError::SchemaEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(creators: Option<Vec<Creator>>) -> TokenMetadata {
        TokenMetadata {
            name: "0xAlice".to_string(),
            symbol: "ALICE".to_string(),
            uri: String::new(),
            seller_fee_basis_points: 0,
            creators,
        }
    }

    #[test]
    fn test_round_trip_without_creators() {
        let original = record(None);
        let bytes = encode_record(&original).expect("encode should succeed");
        let decoded = decode_record(&bytes).expect("decode should succeed");
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_round_trip_with_creators() {
        let original = record(Some(vec![
            Creator {
                address: Pubkey::new_unique(),
                verified: true,
                share: 60,
            },
            Creator {
                address: Pubkey::new_unique(),
                verified: false,
                share: 40,
            },
        ]));
        let bytes = encode_record(&original).expect("encode should succeed");
        let decoded = decode_record(&bytes).expect("decode should succeed");
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_wire_layout() {
        // name(4+7) symbol(4+5) uri(4+0) fee(2) creators tag(1)
        let bytes = encode_record(&record(None)).expect("encode should succeed");
        assert_eq!(bytes.len(), 4 + 7 + 4 + 5 + 4 + 2 + 1);

        // u32 LE length prefix, then raw UTF-8
        assert_eq!(&bytes[..4], &7u32.to_le_bytes());
        assert_eq!(&bytes[4..11], b"0xAlice");
        assert_eq!(&bytes[11..15], &5u32.to_le_bytes());
        assert_eq!(&bytes[15..20], b"ALICE");
        // empty uri encodes as length 0 with no following bytes
        assert_eq!(&bytes[20..24], &0u32.to_le_bytes());
        // fee, then absent-creators tag
        assert_eq!(&bytes[24..26], &0u16.to_le_bytes());
        assert_eq!(bytes[26], 0);
    }

    #[test]
    fn test_create_metadata_payload_layout() {
        let args = CreateMetadataArgs {
            data: record(None),
            is_mutable: true,
        };
        let payload = encode_create_metadata(&args).expect("encode should succeed");
        let body = encode_record(&args.data).expect("encode should succeed");

        // opcode 0, record bytes, trailing mutability flag
        assert_eq!(payload[0], 0);
        assert_eq!(&payload[1..1 + body.len()], &body[..]);
        assert_eq!(payload[payload.len() - 1], 1);
        assert_eq!(payload.len(), 1 + body.len() + 1);
    }

    #[test]
    fn test_overlong_name_rejected() {
        let mut bad = record(None);
        bad.name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            encode_record(&bad),
            Err(LaunchError::SchemaEncoding(_))
        ));
    }

    #[test]
    fn test_empty_creator_list_rejected() {
        let bad = record(Some(vec![]));
        assert!(matches!(
            encode_record(&bad),
            Err(LaunchError::SchemaEncoding(_))
        ));
    }

    #[test]
    fn test_too_many_creators_rejected() {
        let creator = Creator {
            address: Pubkey::new_unique(),
            verified: false,
            share: 0,
        };
        let bad = record(Some(vec![creator; MAX_CREATORS + 1]));
        assert!(matches!(
            encode_record(&bad),
            Err(LaunchError::SchemaEncoding(_))
        ));
    }

    fn creator_strategy() -> impl Strategy<Value = Creator> {
        (any::<[u8; 32]>(), any::<bool>(), any::<u8>()).prop_map(|(address, verified, share)| {
            Creator {
                address: Pubkey::new_from_array(address),
                verified,
                share,
            }
        })
    }

    fn record_strategy() -> impl Strategy<Value = TokenMetadata> {
        (
            "[a-zA-Z0-9 ]{0,32}",
            "[A-Z]{0,10}",
            "[a-z:/.]{0,200}",
            any::<u16>(),
            proptest::option::of(proptest::collection::vec(creator_strategy(), 1..=5)),
        )
            .prop_map(|(name, symbol, uri, fee, creators)| TokenMetadata {
                name,
                symbol,
                uri,
                seller_fee_basis_points: fee,
                creators,
            })
    }

    proptest! {
        #[test]
        fn prop_round_trip(original in record_strategy()) {
            let bytes = encode_record(&original).expect("encode should succeed");
            let decoded = decode_record(&bytes).expect("decode should succeed");
            prop_assert_eq!(decoded, original);
        }
    }
}
