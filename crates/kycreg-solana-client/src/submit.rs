//! Transaction submitter.
//!
//! Builds a transaction referencing the latest blockhash, signs it with the
//! payer, sends it, and drives it to a terminal state:
//!
//! - a stale blockhash is retried exactly once with a refreshed reference
//! - network-level transient failures are retried with bounded exponential
//!   backoff, resubmitting the same signed transaction (idempotent)
//! - pre-execution rejections and program-logic errors are never retried
//! - confirmation is an async poll with a deadline; a timeout stops the
//!   local wait only, and the outcome can still be queried later by
//!   signature via [`poll_outcome`]

use solana_program::instruction::Instruction;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{Transaction, TransactionError};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::{classify_rpc_error, outcome_error, ClientError, ClientResult, RpcErrorClass};
use crate::payer::Payer;

/// Terminal state of a submission. Never silently dropped.
#[derive(Debug)]
pub enum TransactionOutcome {
    /// The ledger accepted the transaction and the program succeeded.
    Confirmed { signature: Signature },
    /// The ledger or the program rejected the transaction.
    Failed { error: ClientError },
    /// No confirmation was observed within the window. The transaction may
    /// still land; re-poll with the signature, do not resubmit.
    Timeout { signature: Signature },
}

impl TransactionOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    /// The signature, when one was assigned (everything past pre-flight).
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Self::Confirmed { signature } | Self::Timeout { signature } => Some(signature),
            Self::Failed { .. } => None,
        }
    }
}

/// Sign, send, and confirm one instruction.
pub async fn submit(
    connection: &Connection,
    payer: &Payer,
    instruction: Instruction,
    config: &ClientConfig,
) -> ClientResult<TransactionOutcome> {
    let payer_pubkey = payer.pubkey();

    // Fail fast before anything reaches the network.
    let balance = connection.balance(&payer_pubkey).await?;
    if balance < config.min_payer_balance {
        return Err(ClientError::Funding(format!(
            "payer {payer_pubkey} holds {balance} lamports, below the {} required for submission",
            config.min_payer_balance
        )));
    }

    // Serialize the sign-and-send window per payer: two transactions signed
    // against the same freshness reference would race on sequencing. The
    // lock is released before confirmation polling so pending confirmations
    // can be composed concurrently.
    let guard = payer.lock_for_submission().await;

    let program_id = instruction.program_id;
    let mut blockhash = connection.latest_blockhash().await?;
    let mut blockhash_refreshed = false;
    let mut transient_attempts = 0u32;

    let signature = loop {
        let transaction = Transaction::new_signed_with_payer(
            &[instruction.clone()],
            Some(&payer_pubkey),
            &[payer.keypair()],
            blockhash,
        );
        let signature = transaction.signatures[0];

        match connection.rpc().send_transaction(&transaction).await {
            Ok(signature) => break signature,
            Err(err) => match classify_rpc_error(&err) {
                RpcErrorClass::StaleBlockhash => {
                    if blockhash_refreshed {
                        warn!(%signature, "blockhash stale again after refresh");
                        return Ok(TransactionOutcome::Failed {
                            error: ClientError::TransactionRejected(
                                "blockhash still stale after one refresh".to_string(),
                            ),
                        });
                    }
                    debug!(%signature, "stale blockhash, refreshing once");
                    blockhash_refreshed = true;
                    blockhash = connection.latest_blockhash().await?;
                }
                RpcErrorClass::Transient => {
                    transient_attempts += 1;
                    if transient_attempts > config.max_network_retries {
                        return Err(ClientError::Rpc(format!(
                            "send failed after {} transient retries: {err}",
                            config.max_network_retries
                        )));
                    }
                    let backoff =
                        config.retry_backoff_base * 2u32.pow(transient_attempts - 1);
                    warn!(
                        %signature,
                        attempt = transient_attempts,
                        ?backoff,
                        "transient send failure, backing off"
                    );
                    sleep(backoff).await;
                }
                RpcErrorClass::AlreadyProcessed => {
                    // The cluster has already seen this exact transaction;
                    // fall through to confirmation polling.
                    debug!(%signature, "transaction already processed, polling status");
                    break signature;
                }
                RpcErrorClass::ProgramLogic(tx_err) => {
                    return Ok(TransactionOutcome::Failed {
                        error: ClientError::ProgramExecution(tx_err.to_string()),
                    });
                }
                RpcErrorClass::Rejected(tx_err) => {
                    if matches!(tx_err, TransactionError::ProgramAccountNotFound) {
                        // The registry gate no longer holds; the caller must
                        // re-run the program check.
                        return Err(ClientError::ProgramNotFound(program_id));
                    }
                    return Ok(TransactionOutcome::Failed {
                        error: ClientError::TransactionRejected(tx_err.to_string()),
                    });
                }
                RpcErrorClass::Fatal => {
                    return Err(ClientError::Rpc(format!("send_transaction: {err}")));
                }
            },
        }
    };

    drop(guard);

    debug!(%signature, "transaction sent, awaiting confirmation");
    let outcome = await_confirmation(connection, signature, config).await?;
    match &outcome {
        TransactionOutcome::Confirmed { signature } => info!(%signature, "transaction confirmed"),
        TransactionOutcome::Failed { error } => warn!(%signature, %error, "transaction failed"),
        TransactionOutcome::Timeout { signature } => {
            warn!(%signature, "no confirmation within the timeout window")
        }
    }
    Ok(outcome)
}

/// Re-poll the outcome of an earlier submission by signature.
///
/// Idempotent: this never resubmits, so it is safe after a local `Timeout`
/// or a cancelled wait.
pub async fn poll_outcome(
    connection: &Connection,
    signature: Signature,
    config: &ClientConfig,
) -> ClientResult<TransactionOutcome> {
    await_confirmation(connection, signature, config).await
}

async fn await_confirmation(
    connection: &Connection,
    signature: Signature,
    config: &ClientConfig,
) -> ClientResult<TransactionOutcome> {
    let deadline = Instant::now() + config.confirm_timeout;

    loop {
        match connection
            .rpc()
            .get_signature_status_with_commitment(&signature, connection.commitment())
            .await
        {
            Ok(Some(Ok(()))) => return Ok(TransactionOutcome::Confirmed { signature }),
            Ok(Some(Err(tx_err))) => {
                return Ok(TransactionOutcome::Failed {
                    error: outcome_error(&tx_err),
                })
            }
            Ok(None) => {
                debug!(%signature, "not yet confirmed");
            }
            Err(err) => match classify_rpc_error(&err) {
                RpcErrorClass::Transient => {
                    warn!(%signature, %err, "transient failure while polling status");
                }
                _ => return Err(ClientError::Rpc(format!("get_signature_status: {err}"))),
            },
        }

        if Instant::now() + config.confirm_poll_interval > deadline {
            return Ok(TransactionOutcome::Timeout { signature });
        }
        sleep(config.confirm_poll_interval).await;
    }
}
