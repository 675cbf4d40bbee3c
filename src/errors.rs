//! Error types for the token launch pipeline
//!
//! Every fallible operation in this crate returns one of these variants
//! explicitly; nothing is swallowed and nothing is retried internally. The
//! retry decision belongs to the caller, informed by [`LaunchError::is_retryable`].

use solana_sdk::{pubkey::Pubkey, signature::Signature};
use thiserror::Error;

/// Comprehensive error type for the launch-and-mint lifecycle
///
/// Covers address derivation, metadata serialization, signing, and the
/// submission boundary. Variants carry enough context for a caller to
/// decide between fixing input, resupplying a key, or retrying submission.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// No off-curve address found within the 256 bump trials
    ///
    /// Fatal for the given seeds; retrying with the same seeds and program
    /// will fail identically.
    #[error("Derivation exhausted: no off-curve address for program {program_id}")]
    DerivationExhausted {
        /// Program the derivation was attempted under
        program_id: Pubkey,
    },

    /// Seed list violates the runtime's derivation constraints
    ///
    /// At most 16 seeds, each at most 32 bytes.
    #[error("Invalid derivation seeds: {0}")]
    InvalidSeeds(String),

    /// A metadata field exceeds its representable length or range
    ///
    /// Fatal; the caller must shorten the offending field.
    #[error("Schema encoding error: {0}")]
    SchemaEncoding(String),

    /// A required signer was not supplied at sign time
    ///
    /// Produced before any signature bytes are written, so a failed sign
    /// never yields a partially signed transaction.
    #[error("Missing signer: {missing}")]
    MissingSigner {
        /// The required signer that was absent
        missing: Pubkey,
    },

    /// Signing failed for a reason other than an absent key
    ///
    /// Wraps residual SDK signer errors (e.g. a supplied keypair that is
    /// not part of the message).
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Transport-level rejection before the transaction reached a slot
    ///
    /// Malformed bytes, connection failure, or an RPC-side refusal.
    /// Potentially recoverable by resubmitting the same transaction.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Submission was accepted but confirmation was not observed in budget
    ///
    /// Ambiguous outcome: the transaction may still land. The caller must
    /// query ledger state for `signature` before retrying, or risk
    /// duplicate on-chain effects.
    #[error("Confirmation timed out for {signature}")]
    ConfirmationTimeout {
        /// Signature of the transaction whose fate is unknown
        signature: Signature,
    },

    /// The target program rejected an instruction during execution
    ///
    /// Bad account ordering, insufficient funds, already-initialized
    /// account. Resubmission without changed inputs will fail again.
    #[error("On-chain execution error: {reason}")]
    OnChainExecution {
        /// The program's error, as reported by the ledger
        reason: String,
    },

    /// Configuration or validation error
    ///
    /// Unparseable program id, out-of-range decimals, and similar
    /// constraint violations.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LaunchError {
    /// Check if this error is potentially retryable
    ///
    /// `ConfirmationTimeout` is deliberately `false`: the transaction may
    /// have landed, so the caller must query the ledger before resubmitting.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Submission(_) => true,

            Self::DerivationExhausted { .. } => false,
            Self::InvalidSeeds(_) => false,
            Self::SchemaEncoding(_) => false,
            Self::MissingSigner { .. } => false,
            Self::Signing(_) => false,
            Self::ConfirmationTimeout { .. } => false,
            Self::OnChainExecution { .. } => false,
            Self::Configuration(_) => false,
        }
    }

    /// Get the error category for log labels
    pub fn category(&self) -> &'static str {
        match self {
            Self::DerivationExhausted { .. } => "derivation",
            Self::InvalidSeeds(_) => "derivation",
            Self::SchemaEncoding(_) => "schema",
            Self::MissingSigner { .. } => "signing",
            Self::Signing(_) => "signing",
            Self::Submission(_) => "submission",
            Self::ConfirmationTimeout { .. } => "confirmation",
            Self::OnChainExecution { .. } => "execution",
            Self::Configuration(_) => "config",
        }
    }
}

// Convenience constructors for common error scenarios
impl LaunchError {
    /// Create a schema encoding error for a specific field
    pub fn field_too_long(field: &str, len: usize, max: usize) -> Self {
        Self::SchemaEncoding(format!("{field} is {len} bytes, maximum is {max}"))
    }

    /// Create a submission error
    pub fn submission(reason: impl Into<String>) -> Self {
        Self::Submission(reason.into())
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }
}
