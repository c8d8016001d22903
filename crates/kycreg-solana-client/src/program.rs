//! Program registry check.
//!
//! Precondition gate: no instruction may be encoded or submitted against a
//! program that has not passed this check in the current run. The handle is
//! treated as immutable once established; callers re-run the check only if
//! a submission later fails with a program-not-found class of error.

use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::connection::Connection;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy)]
pub struct ProgramHandle {
    pub program_id: Pubkey,
    /// Verified "deployed and executable" flag.
    pub executable: bool,
}

impl ProgramHandle {
    /// Verify the target program is deployed and executable.
    pub async fn check(connection: &Connection, program_id: Pubkey) -> ClientResult<Self> {
        let account = connection
            .get_account(&program_id)
            .await?
            .ok_or(ClientError::ProgramNotFound(program_id))?;
        if !account.executable {
            return Err(ClientError::ProgramNotExecutable(program_id));
        }
        info!(%program_id, "program is deployed and executable");
        Ok(Self {
            program_id,
            executable: true,
        })
    }
}
