//! Caller-facing client facade.
//!
//! Wires the pipeline stages together in their required order: connection,
//! payer, program check, then per-operation encode + submit. Each stage is
//! an explicit value threaded through the next, never ambient state, so
//! operations for independent customer ids can run concurrently against one
//! client.

use borsh::BorshDeserialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tracing::info;

use kycreg_core::model::CustomerRecord;

use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::{ClientError, ClientResult};
use crate::instruction::{encode_create_customer, encode_update_kyc_status};
use crate::payer::{Payer, PayerSource};
use crate::pda;
use crate::program::ProgramHandle;
use crate::submit::{poll_outcome, submit, TransactionOutcome};

#[derive(Debug, Clone)]
pub struct KycRegistryClient {
    connection: Connection,
    program_id: Pubkey,
    config: ClientConfig,
    payer: Option<Payer>,
    program: Option<ProgramHandle>,
}

impl KycRegistryClient {
    /// Establish the connection. First stage of every run.
    pub async fn connect(
        endpoint: &str,
        program_id: Pubkey,
        config: ClientConfig,
    ) -> ClientResult<Self> {
        config.validate()?;
        let connection = Connection::connect(endpoint, config.commitment).await?;
        Ok(Self {
            connection,
            program_id,
            config,
            payer: None,
            program: None,
        })
    }

    /// Establish and fund the fee-paying identity.
    pub async fn establish_payer(&mut self, source: PayerSource) -> ClientResult<&Payer> {
        let payer = Payer::establish(&self.connection, &self.config, source).await?;
        Ok(&*self.payer.insert(payer))
    }

    /// Verify the target program is deployed and executable.
    ///
    /// Must pass before any instruction is encoded or submitted. Re-run it
    /// if a later submission fails with [`ClientError::ProgramNotFound`].
    pub async fn check_program(&mut self) -> ClientResult<&ProgramHandle> {
        let handle = ProgramHandle::check(&self.connection, self.program_id).await?;
        Ok(&*self.program.insert(handle))
    }

    /// Submit a CreateCustomer operation and drive it to a terminal state.
    pub async fn create_customer(
        &self,
        record: &CustomerRecord,
    ) -> ClientResult<TransactionOutcome> {
        let (payer, program) = self.ready()?;
        info!(customer_id = %record.customer_id, "creating customer");
        let ix = encode_create_customer(program, &payer.pubkey(), record)?;
        submit(&self.connection, payer, ix, &self.config).await
    }

    /// Submit an UpdateKycStatus operation and drive it to a terminal state.
    pub async fn update_kyc_status(
        &self,
        record: &CustomerRecord,
    ) -> ClientResult<TransactionOutcome> {
        let (payer, program) = self.ready()?;
        info!(
            customer_id = %record.customer_id,
            kyc_status = record.kyc_status,
            "updating kyc status"
        );
        let ix =
            encode_update_kyc_status(&self.connection, program, &payer.pubkey(), record).await?;
        submit(&self.connection, payer, ix, &self.config).await
    }

    /// Read back the record stored for a customer id, if any.
    ///
    /// Account data may be zero-padded past the record, so decoding reads a
    /// prefix and ignores the remainder.
    pub async fn get_customer(&self, customer_id: &str) -> ClientResult<Option<CustomerRecord>> {
        let (account_address, _bump) = pda::derive_customer(&self.program_id, customer_id);
        let Some(account) = self.connection.get_account(&account_address).await? else {
            return Ok(None);
        };
        let mut data: &[u8] = &account.data;
        let record = CustomerRecord::deserialize(&mut data).map_err(|e| {
            ClientError::Encoding(kycreg_core::KycError::malformed_input(format!(
                "account {account_address} holds undecodable record data: {e}"
            )))
        })?;
        Ok(Some(record))
    }

    /// Re-poll an earlier submission by signature without resubmitting.
    pub async fn poll_outcome(&self, signature: Signature) -> ClientResult<TransactionOutcome> {
        poll_outcome(&self.connection, signature, &self.config).await
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    fn ready(&self) -> ClientResult<(&Payer, &ProgramHandle)> {
        let payer = self.payer.as_ref().ok_or(ClientError::PayerNotEstablished)?;
        let program = self.program.as_ref().ok_or(ClientError::ProgramNotChecked)?;
        Ok((payer, program))
    }
}
