//! Client configuration.
//!
//! Retry counts, timeout durations, and funding thresholds are not
//! observable from the on-chain program; they are explicit configuration
//! with documented defaults, never hidden constants.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::native_token::LAMPORTS_PER_SOL;

use crate::error::{ClientError, ClientResult};

/// Tunables for funding, submission, and confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Commitment level for reads and confirmation.
    pub commitment: CommitmentConfig,
    /// Minimum payer balance required before any submission is attempted.
    pub min_payer_balance: u64,
    /// Lamports requested from the faucet when the payer is under-funded.
    pub airdrop_lamports: u64,
    /// Balance polls after an airdrop before giving up.
    pub funding_max_attempts: u32,
    /// Wait between funding balance polls.
    pub funding_poll_interval: Duration,
    /// Total window to observe a confirmation before reporting `Timeout`.
    pub confirm_timeout: Duration,
    /// Wait between signature status polls.
    pub confirm_poll_interval: Duration,
    /// Resubmission attempts on network-level transient failures.
    pub max_network_retries: u32,
    /// Base delay for exponential backoff between transient retries.
    pub retry_backoff_base: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            commitment: CommitmentConfig::confirmed(),
            min_payer_balance: LAMPORTS_PER_SOL / 10,
            airdrop_lamports: LAMPORTS_PER_SOL,
            funding_max_attempts: 5,
            funding_poll_interval: Duration::from_millis(800),
            confirm_timeout: Duration::from_secs(30),
            confirm_poll_interval: Duration::from_millis(500),
            max_network_retries: 3,
            retry_backoff_base: Duration::from_millis(200),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> ClientResult<()> {
        if self.funding_max_attempts == 0 {
            return Err(ClientError::InvalidConfig(
                "funding_max_attempts must be greater than zero".to_string(),
            ));
        }
        if self.funding_poll_interval.is_zero() || self.confirm_poll_interval.is_zero() {
            return Err(ClientError::InvalidConfig(
                "poll intervals must be greater than zero".to_string(),
            ));
        }
        if self.confirm_timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "confirm_timeout must be greater than zero".to_string(),
            ));
        }
        if self.retry_backoff_base.is_zero() {
            return Err(ClientError::InvalidConfig(
                "retry_backoff_base must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
