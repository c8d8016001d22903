//! Payer manager.
//!
//! Establishes the fee-paying, transaction-signing identity and ensures it
//! holds enough balance before anything is submitted. On test networks the
//! shortfall is covered by a faucet airdrop, polled until the credit lands
//! or the attempt budget is exhausted.
//!
//! Concurrent submissions for a single payer race on the freshness reference
//! they sign, so every submission takes this payer's lock for the
//! sign-and-send window. Reads stay lock-free.

use std::path::PathBuf;
use std::sync::Arc;

use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::pubkey::Pubkey;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::{ClientError, ClientResult};

/// Where the payer keypair comes from.
#[derive(Debug, Clone)]
pub enum PayerSource {
    /// A Solana CLI keypair file: a JSON array of 64 bytes.
    File(PathBuf),
    /// An environment variable holding a base58-encoded 64-byte secret key.
    Env(String),
    /// A fresh keypair, funded entirely by airdrop. Test networks only.
    Ephemeral,
}

#[derive(Clone)]
pub struct Payer {
    keypair: Arc<Keypair>,
    submit_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for Payer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payer").field("pubkey", &self.pubkey()).finish()
    }
}

impl Payer {
    /// Load or generate the signing identity and ensure it is funded.
    ///
    /// Idempotent: establishing an already-funded payer is a balance check
    /// and nothing else.
    pub async fn establish(
        connection: &Connection,
        config: &ClientConfig,
        source: PayerSource,
    ) -> ClientResult<Self> {
        let keypair = load_keypair(&source)?;
        let payer = Self {
            keypair: Arc::new(keypair),
            submit_lock: Arc::new(Mutex::new(())),
        };
        info!(pubkey = %payer.pubkey(), "established payer identity");
        payer.ensure_funded(connection, config).await?;
        Ok(payer)
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub(crate) fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Serialize submissions on this payer.
    pub(crate) async fn lock_for_submission(&self) -> MutexGuard<'_, ()> {
        self.submit_lock.lock().await
    }

    async fn ensure_funded(
        &self,
        connection: &Connection,
        config: &ClientConfig,
    ) -> ClientResult<()> {
        let pubkey = self.pubkey();
        let balance = connection.balance(&pubkey).await?;
        if balance >= config.min_payer_balance {
            debug!(%pubkey, balance, "payer already funded");
            return Ok(());
        }

        info!(
            %pubkey,
            balance,
            required = config.min_payer_balance,
            lamports = config.airdrop_lamports,
            "payer under-funded, requesting airdrop"
        );
        connection
            .rpc()
            .request_airdrop(&pubkey, config.airdrop_lamports)
            .await
            .map_err(|e| ClientError::Funding(format!("airdrop request for {pubkey}: {e}")))?;

        for attempt in 1..=config.funding_max_attempts {
            tokio::time::sleep(config.funding_poll_interval).await;
            let balance = connection.balance(&pubkey).await?;
            if balance >= config.min_payer_balance {
                info!(%pubkey, balance, "airdrop credited");
                return Ok(());
            }
            debug!(%pubkey, balance, attempt, "airdrop not yet credited");
        }

        warn!(%pubkey, "airdrop never credited within the attempt budget");
        Err(ClientError::FundingTimeout(format!(
            "balance of {pubkey} still below {} lamports after {} polls",
            config.min_payer_balance, config.funding_max_attempts
        )))
    }
}

fn load_keypair(source: &PayerSource) -> ClientResult<Keypair> {
    match source {
        PayerSource::File(path) => {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                ClientError::Funding(format!("reading keypair file {}: {e}", path.display()))
            })?;
            let bytes: Vec<u8> = serde_json::from_str(&contents).map_err(|e| {
                ClientError::Funding(format!(
                    "keypair file {} is not a JSON byte array: {e}",
                    path.display()
                ))
            })?;
            keypair_from_bytes(&bytes)
        }
        PayerSource::Env(var) => {
            let encoded = std::env::var(var)
                .map_err(|_| ClientError::Funding(format!("environment variable {var} not set")))?;
            let bytes = bs58::decode(encoded.trim())
                .into_vec()
                .map_err(|e| ClientError::Funding(format!("{var} is not valid base58: {e}")))?;
            keypair_from_bytes(&bytes)
        }
        PayerSource::Ephemeral => Ok(Keypair::new()),
    }
}

fn keypair_from_bytes(bytes: &[u8]) -> ClientResult<Keypair> {
    if bytes.len() != 64 {
        return Err(ClientError::Funding(format!(
            "keypair must be 64 bytes, got {}",
            bytes.len()
        )));
    }
    Keypair::from_bytes(bytes)
        .map_err(|e| ClientError::Funding(format!("keypair bytes rejected: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn ephemeral_source_generates_distinct_keys() {
        let a = load_keypair(&PayerSource::Ephemeral).unwrap();
        let b = load_keypair(&PayerSource::Ephemeral).unwrap();
        assert_ne!(a.pubkey(), b.pubkey());
    }

    #[test]
    fn file_round_trip() {
        let keypair = Keypair::new();
        let dir = std::env::temp_dir().join("kycreg-payer-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.json", keypair.pubkey()));
        std::fs::write(&path, serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap())
            .unwrap();

        let loaded = load_keypair(&PayerSource::File(path.clone())).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_a_funding_error() {
        let result = load_keypair(&PayerSource::File(PathBuf::from("/nonexistent/payer.json")));
        assert_matches!(result, Err(ClientError::Funding(_)));
    }

    #[test]
    fn truncated_key_material_rejected() {
        assert_matches!(keypair_from_bytes(&[0u8; 31]), Err(ClientError::Funding(_)));
    }

    #[test]
    fn env_round_trip() {
        let keypair = Keypair::new();
        let var = format!("KYCREG_TEST_PAYER_{}", std::process::id());
        std::env::set_var(&var, bs58::encode(keypair.to_bytes()).into_string());
        let loaded = load_keypair(&PayerSource::Env(var.clone())).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
        std::env::remove_var(var);
    }
}
