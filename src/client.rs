//! Submission client boundary
//!
//! The core builds and signs transactions without touching the network;
//! everything asynchronous goes through [`SubmissionClient`]. The trait is
//! the seam tests mock out, and [`RpcSubmissionClient`] is the production
//! implementation over the nonblocking RPC client.
//!
//! The client performs no retries itself. Errors come back in the §7-style
//! taxonomy so a caller can wrap its own retry/backoff around submission
//! without rebuilding already-valid instructions.

use async_trait::async_trait;
use solana_client::{client_error::ClientError, nonblocking::rpc_client::RpcClient};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, signature::Signature,
    transaction::Transaction,
};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::config::RpcConfig;
use crate::errors::LaunchError;

/// Terminal states of a confirmation wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// The transaction reached the requested commitment
    Confirmed,
    /// The ledger executed the transaction and it failed
    Failed(String),
    /// No status observed within the deadline; the transaction may still
    /// land, so the caller must query before resubmitting
    TimedOut,
}

/// Ledger operations the launch flow depends on
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    /// Minimum lamport balance for an account of `size` bytes to be
    /// rent-exempt
    async fn minimum_rent_exempt_balance(&self, size: usize) -> Result<u64, LaunchError>;

    /// A fresh blockhash bounding the next transaction's validity
    ///
    /// Must be called once per transaction; a blockhash fetched before a
    /// confirmation wait is stale for the transaction built after it.
    async fn latest_blockhash(&self) -> Result<Hash, LaunchError>;

    /// Broadcast a signed transaction
    async fn submit(&self, tx: &Transaction) -> Result<Signature, LaunchError>;

    /// Poll until the transaction reaches a terminal state or the deadline
    async fn await_confirmation(
        &self,
        signature: &Signature,
    ) -> Result<ConfirmationOutcome, LaunchError>;
}

/// Production submission client over JSON-RPC
pub struct RpcSubmissionClient {
    rpc: RpcClient,
    commitment: CommitmentConfig,
    poll_interval: Duration,
    confirm_timeout: Duration,
}

impl RpcSubmissionClient {
    /// Create a client for `endpoint` with confirmed commitment
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timing(endpoint, Duration::from_millis(500), Duration::from_secs(60))
    }

    /// Create a client from the RPC config section
    pub fn from_config(config: &RpcConfig) -> Self {
        Self::with_timing(
            config.endpoint.clone(),
            Duration::from_millis(config.poll_interval_ms),
            Duration::from_secs(config.confirm_timeout_secs),
        )
    }

    fn with_timing(
        endpoint: impl Into<String>,
        poll_interval: Duration,
        confirm_timeout: Duration,
    ) -> Self {
        let commitment = CommitmentConfig::confirmed();
        Self {
            rpc: RpcClient::new_with_commitment(endpoint.into(), commitment),
            commitment,
            poll_interval,
            confirm_timeout,
        }
    }
}

/// Map an RPC client error into the launch taxonomy
///
/// A preflight or execution failure carries the program's error and is not
/// recoverable by resubmission; anything else is transport-level.
fn map_client_error(error: ClientError) -> LaunchError {
    match error.get_transaction_error() {
        Some(tx_error) => LaunchError::OnChainExecution {
            reason: tx_error.to_string(),
        },
        None => LaunchError::submission(error.to_string()),
    }
}

#[async_trait]
impl SubmissionClient for RpcSubmissionClient {
    async fn minimum_rent_exempt_balance(&self, size: usize) -> Result<u64, LaunchError> {
        self.rpc
            .get_minimum_balance_for_rent_exemption(size)
            .await
            .map_err(map_client_error)
    }

    async fn latest_blockhash(&self) -> Result<Hash, LaunchError> {
        self.rpc
            .get_latest_blockhash()
            .await
            .map_err(map_client_error)
    }

    async fn submit(&self, tx: &Transaction) -> Result<Signature, LaunchError> {
        debug!(signatures = tx.signatures.len(), "Submitting transaction");

        self.rpc
            .send_transaction(tx)
            .await
            .map_err(map_client_error)
    }

    async fn await_confirmation(
        &self,
        signature: &Signature,
    ) -> Result<ConfirmationOutcome, LaunchError> {
        let deadline = Instant::now() + self.confirm_timeout;

        loop {
            let status = self
                .rpc
                .get_signature_status_with_commitment(signature, self.commitment)
                .await
                .map_err(map_client_error)?;

            match status {
                Some(Ok(())) => return Ok(ConfirmationOutcome::Confirmed),
                Some(Err(tx_error)) => {
                    return Ok(ConfirmationOutcome::Failed(tx_error.to_string()))
                }
                None => {}
            }

            if Instant::now() >= deadline {
                warn!(signature = %signature, "Confirmation deadline exceeded");
                return Ok(ConfirmationOutcome::TimedOut);
            }
            sleep(self.poll_interval).await;
        }
    }
}
