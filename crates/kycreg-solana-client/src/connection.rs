//! Connection manager.
//!
//! Owns the handle to the ledger RPC endpoint. `connect` probes node health
//! before returning, so later stages can assume a live endpoint. Everything
//! here is read-only network I/O.

use std::sync::Arc;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult};

#[derive(Clone)]
pub struct Connection {
    endpoint: String,
    commitment: CommitmentConfig,
    rpc: Arc<RpcClient>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("commitment", &self.commitment)
            .finish()
    }
}

impl Connection {
    /// Connect to an RPC endpoint and verify it answers a liveness probe.
    pub async fn connect(endpoint: &str, commitment: CommitmentConfig) -> ClientResult<Self> {
        let rpc = RpcClient::new_with_commitment(endpoint.to_string(), commitment);
        rpc.get_health().await.map_err(|e| {
            ClientError::Connectivity(format!("health probe failed for {endpoint}: {e}"))
        })?;
        info!(endpoint, "connected to ledger endpoint");
        Ok(Self {
            endpoint: endpoint.to_string(),
            commitment,
            rpc: Arc::new(rpc),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }

    /// The underlying nonblocking RPC client.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Fetch an account, distinguishing "absent" from transport failure.
    pub async fn get_account(&self, address: &Pubkey) -> ClientResult<Option<Account>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(|e| ClientError::Rpc(format!("get_account({address}): {e}")))?;
        Ok(response.value)
    }

    pub async fn account_exists(&self, address: &Pubkey) -> ClientResult<bool> {
        Ok(self.get_account(address).await?.is_some())
    }

    /// Balance in lamports.
    pub async fn balance(&self, address: &Pubkey) -> ClientResult<u64> {
        self.rpc
            .get_balance(address)
            .await
            .map_err(|e| ClientError::Rpc(format!("get_balance({address}): {e}")))
    }

    /// A recent blockhash used to freshness-bound transactions.
    pub async fn latest_blockhash(&self) -> ClientResult<Hash> {
        let blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .map_err(|e| ClientError::Rpc(format!("get_latest_blockhash: {e}")))?;
        debug!(%blockhash, "fetched latest blockhash");
        Ok(blockhash)
    }
}
