//! Instruction encoding for the kycreg on-chain program.
//!
//! This is the bit-exact boundary of the system: a one-byte tag followed by
//! the borsh encoding of the record (u32-LE length-prefixed strings, u8 enum
//! discriminants, u8 bools). Field order and widths must match the program's
//! expected schema exactly.

use borsh::BorshDeserialize;
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;
use tracing::debug;

use kycreg_core::model::CustomerRecord;
use kycreg_core::KycError;

use crate::connection::Connection;
use crate::constants::{TAG_CREATE_CUSTOMER, TAG_UPDATE_KYC_STATUS};
use crate::error::{ClientError, ClientResult};
use crate::pda;
use crate::program::ProgramHandle;

/// A logical operation against the customer registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KycInstruction {
    CreateCustomer(CustomerRecord),
    UpdateKycStatus(CustomerRecord),
}

impl KycInstruction {
    pub fn tag(&self) -> u8 {
        match self {
            Self::CreateCustomer(_) => TAG_CREATE_CUSTOMER,
            Self::UpdateKycStatus(_) => TAG_UPDATE_KYC_STATUS,
        }
    }

    pub fn record(&self) -> &CustomerRecord {
        match self {
            Self::CreateCustomer(record) | Self::UpdateKycStatus(record) => record,
        }
    }

    /// Serialize to the program's wire form: tag byte + borsh payload.
    pub fn to_bytes(&self) -> ClientResult<Vec<u8>> {
        let payload = borsh::to_vec(self.record())
            .map_err(|e| ClientError::Encoding(KycError::invalid_argument(e.to_string())))?;
        let mut out = Vec::with_capacity(1 + payload.len());
        out.push(self.tag());
        out.extend_from_slice(&payload);
        Ok(out)
    }

    /// Decode the wire form back into the logical operation.
    pub fn try_from_bytes(data: &[u8]) -> ClientResult<Self> {
        let (tag, payload) = data.split_first().ok_or_else(|| {
            ClientError::Encoding(KycError::invalid_argument("empty instruction data"))
        })?;
        let record = CustomerRecord::try_from_slice(payload)
            .map_err(|e| ClientError::Encoding(KycError::invalid_argument(e.to_string())))?;
        match *tag {
            TAG_CREATE_CUSTOMER => Ok(Self::CreateCustomer(record)),
            TAG_UPDATE_KYC_STATUS => Ok(Self::UpdateKycStatus(record)),
            other => Err(ClientError::Encoding(KycError::invalid_argument(format!(
                "unknown instruction tag {other}"
            )))),
        }
    }
}

/// Encode a CreateCustomer instruction.
///
/// The duplicate-id invariant is enforced on-ledger by the program; the
/// client only validates the record and derives the target account.
pub fn encode_create_customer(
    program: &ProgramHandle,
    payer: &Pubkey,
    record: &CustomerRecord,
) -> ClientResult<Instruction> {
    record.validate()?;
    let (customer_account, _bump) = pda::derive_customer(&program.program_id, &record.customer_id);
    let data = KycInstruction::CreateCustomer(record.clone()).to_bytes()?;
    debug!(
        customer_id = %record.customer_id,
        %customer_account,
        bytes = data.len(),
        "encoded CreateCustomer"
    );
    Ok(Instruction {
        program_id: program.program_id,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(customer_account, false),
            AccountMeta::new_readonly(solana_program::system_program::id(), false),
        ],
        data,
    })
}

/// Encode an UpdateKycStatus instruction.
///
/// The derived account must already exist; updates never implicitly create,
/// so the existence check happens here, before anything reaches the
/// submitter.
pub async fn encode_update_kyc_status(
    connection: &Connection,
    program: &ProgramHandle,
    payer: &Pubkey,
    record: &CustomerRecord,
) -> ClientResult<Instruction> {
    record.validate()?;
    let (customer_account, _bump) = pda::derive_customer(&program.program_id, &record.customer_id);
    if !connection.account_exists(&customer_account).await? {
        return Err(ClientError::AccountNotFound {
            customer_id: record.customer_id.clone(),
        });
    }
    let data = KycInstruction::UpdateKycStatus(record.clone()).to_bytes()?;
    debug!(
        customer_id = %record.customer_id,
        %customer_account,
        bytes = data.len(),
        "encoded UpdateKycStatus"
    );
    Ok(Instruction {
        program_id: program.program_id,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(customer_account, false),
        ],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use kycreg_core::model::LeiRegistrationStatus;

    fn sample_record() -> CustomerRecord {
        CustomerRecord {
            customer_id: "1".to_string(),
            legal_name: "ABC Corporation".to_string(),
            registration_number: "1002343-AXZSDF".to_string(),
            incorporation_country: "Singapore".to_string(),
            lei_registration_status: LeiRegistrationStatus::Registered,
            lei: "ABC4097092374092BDJ3".to_string(),
            incorporation_date: "12 May 2012".to_string(),
            primary_country_operation: "Singapore".to_string(),
            primary_isic_code: "1122 - Food and Beverages".to_string(),
            entity_type: "Subsidiary".to_string(),
            swift_code: "ABCFSGS1".to_string(),
            kyc_status: false,
            is_active: true,
            addresses: vec![],
            kyc_documents: vec![],
        }
    }

    fn program_handle() -> ProgramHandle {
        ProgramHandle {
            program_id: Pubkey::new_unique(),
            executable: true,
        }
    }

    #[test]
    fn wire_form_starts_with_the_tag() {
        let create = KycInstruction::CreateCustomer(sample_record()).to_bytes().unwrap();
        let update = KycInstruction::UpdateKycStatus(sample_record()).to_bytes().unwrap();
        assert_eq!(create[0], TAG_CREATE_CUSTOMER);
        assert_eq!(update[0], TAG_UPDATE_KYC_STATUS);
        // Identical records differ only in the tag byte.
        assert_eq!(create[1..], update[1..]);
    }

    #[test]
    fn unknown_tag_rejected() {
        let mut bytes = KycInstruction::CreateCustomer(sample_record()).to_bytes().unwrap();
        bytes[0] = 9;
        assert_matches!(
            KycInstruction::try_from_bytes(&bytes),
            Err(ClientError::Encoding(_))
        );
    }

    #[test]
    fn truncated_payload_rejected() {
        let bytes = KycInstruction::CreateCustomer(sample_record()).to_bytes().unwrap();
        assert_matches!(
            KycInstruction::try_from_bytes(&bytes[..bytes.len() / 2]),
            Err(ClientError::Encoding(_))
        );
    }

    #[test]
    fn create_targets_the_customer_pda() {
        let program = program_handle();
        let payer = Pubkey::new_unique();
        let record = sample_record();
        let ix = encode_create_customer(&program, &payer, &record).unwrap();

        let (expected, _) = pda::derive_customer(&program.program_id, &record.customer_id);
        assert_eq!(ix.program_id, program.program_id);
        assert_eq!(ix.accounts.len(), 3);
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[1].pubkey, expected);
        assert!(ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, solana_program::system_program::id());
    }

    #[test]
    fn invalid_record_never_encodes() {
        let program = program_handle();
        let payer = Pubkey::new_unique();
        let mut record = sample_record();
        record.swift_code = "BAD".to_string();
        assert_matches!(
            encode_create_customer(&program, &payer, &record),
            Err(ClientError::Encoding(_))
        );
    }
}
