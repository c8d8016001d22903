//! Client error taxonomy.
//!
//! Every component failure surfaces as a [`ClientError`] with enough
//! structure for the caller to distinguish "retry is safe" from "this is a
//! permanent logic error". The native RPC error envelope is mapped into this
//! taxonomy by [`classify_rpc_error`]; nothing is swallowed.

use solana_client::client_error::{ClientError as RpcClientError, ClientErrorKind};
use solana_client::rpc_request::RpcError;
use solana_program::pubkey::Pubkey;
use solana_sdk::transaction::TransactionError;
use thiserror::Error;

use kycreg_core::KycError;

/// Result alias used throughout the client crate.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint is unreachable or failed its liveness probe.
    #[error("endpoint unreachable or unhealthy: {0}")]
    Connectivity(String),

    /// The payer could not be established or funded.
    #[error("payer funding failed: {0}")]
    Funding(String),

    /// Funding was requested but the balance never reflected the credit
    /// within the bounded number of polls.
    #[error("payer funding timed out: {0}")]
    FundingTimeout(String),

    /// No account exists at the program address.
    #[error("program {0} is not deployed")]
    ProgramNotFound(Pubkey),

    /// The program account exists but is not marked executable.
    #[error("program {0} exists but is not executable")]
    ProgramNotExecutable(Pubkey),

    /// The record violates a field constraint or could not be decoded from
    /// its wire form. Validation failures are caught before anything is
    /// encoded or sent.
    #[error("record failed validation: {0}")]
    Encoding(#[from] KycError),

    /// An update addressed a customer account that does not exist.
    /// Updates never implicitly create.
    #[error("no customer account exists for id `{customer_id}`")]
    AccountNotFound { customer_id: String },

    /// The ledger rejected the transaction before execution.
    #[error("transaction rejected before execution: {0}")]
    TransactionRejected(String),

    /// The program executed and returned a logical error (e.g. duplicate
    /// customer id). Never retried.
    #[error("program execution failed: {0}")]
    ProgramExecution(String),

    /// A client stage was invoked before the payer was established.
    #[error("payer has not been established")]
    PayerNotEstablished,

    /// A submission stage was invoked before the program check passed.
    #[error("program has not been checked")]
    ProgramNotChecked,

    /// The client configuration failed validation.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// A transport-level RPC failure that exhausted the retry budget.
    #[error("rpc error: {0}")]
    Rpc(String),
}

impl ClientError {
    /// Whether retrying the failed operation is safe.
    ///
    /// Transport and liveness failures are transient; everything else is a
    /// precondition or logic error that retrying cannot fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity(_) | Self::Rpc(_))
    }
}

/// Coarse class of a native RPC failure, used to drive the retry policy.
#[derive(Debug)]
pub(crate) enum RpcErrorClass {
    /// Network-level transient failure; safe to retry with backoff.
    Transient,
    /// The referenced blockhash is no longer current; refresh and retry once.
    StaleBlockhash,
    /// The transaction was already seen by the cluster; poll its signature.
    AlreadyProcessed,
    /// The program itself rejected the instruction. Never retried.
    ProgramLogic(TransactionError),
    /// Pre-execution rejection (fees, malformed transaction). Not retried.
    Rejected(TransactionError),
    /// Anything else; surfaced verbatim.
    Fatal,
}

/// Map the Solana client's native error envelope into [`RpcErrorClass`].
pub(crate) fn classify_rpc_error(err: &RpcClientError) -> RpcErrorClass {
    if let Some(tx_err) = err.get_transaction_error() {
        return match tx_err {
            TransactionError::BlockhashNotFound => RpcErrorClass::StaleBlockhash,
            TransactionError::AlreadyProcessed => RpcErrorClass::AlreadyProcessed,
            TransactionError::InstructionError(_, _) => RpcErrorClass::ProgramLogic(tx_err),
            other => RpcErrorClass::Rejected(other),
        };
    }
    match &err.kind {
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => RpcErrorClass::Transient,
        ClientErrorKind::RpcError(RpcError::RpcRequestError(_)) => RpcErrorClass::Transient,
        _ => RpcErrorClass::Fatal,
    }
}

/// Map a transaction-level error observed during confirmation polling.
pub(crate) fn outcome_error(tx_err: &TransactionError) -> ClientError {
    match tx_err {
        TransactionError::InstructionError(_, _) => {
            ClientError::ProgramExecution(tx_err.to_string())
        }
        other => ClientError::TransactionRejected(other.to_string()),
    }
}
