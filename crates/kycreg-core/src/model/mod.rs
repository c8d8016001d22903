//! Customer record model.
//!
//! These types are the logical schema shared by the instruction encoder and
//! any read-back verification: the borsh encoding of `CustomerRecord` is the
//! bit-exact payload the on-chain program consumes and stores. Field order
//! and types must therefore never change within v1.
//!
//! Design goals:
//! - **Construction-time rejection:** `CustomerRecord::from_json` parses and
//!   validates in one step, so malformed input never reaches the encoder.
//! - **Dumb data:** the model carries no policy beyond its own field
//!   constraints. Addressing, funding, and submission live in the client.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::errors::{KycError, KycResult};

/// Registration state of a Legal Entity Identifier.
///
/// Borsh discriminants are assigned in declaration order and are part of the
/// program ABI: Registered = 0, Unregistered = 1, Pending = 2.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub enum LeiRegistrationStatus {
    Registered,
    Unregistered,
    Pending,
}

impl LeiRegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "Registered",
            Self::Unregistered => "Unregistered",
            Self::Pending => "Pending",
        }
    }
}

/// A postal address attached to a customer record.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize, Default,
)]
pub struct CustomerAddress {
    pub address_type: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

/// A reference to an off-ledger KYC document.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize, Default,
)]
pub struct KycDocument {
    pub document_id: String,
    pub document_type: String,
    pub document_name: String,
    pub document_transaction_id: String,
}

/// One customer's KYC record.
///
/// `customer_id` uniquely addresses exactly one on-ledger account. Creation
/// fails on-ledger if that account already holds a record; updates fail
/// client-side if it does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub legal_name: String,
    pub registration_number: String,
    pub incorporation_country: String,
    pub lei_registration_status: LeiRegistrationStatus,
    pub lei: String,
    pub incorporation_date: String,
    pub primary_country_operation: String,
    pub primary_isic_code: String,
    pub entity_type: String,
    pub swift_code: String,
    pub kyc_status: bool,
    pub is_active: bool,
    #[serde(default)]
    pub addresses: Vec<CustomerAddress>,
    #[serde(default)]
    pub kyc_documents: Vec<KycDocument>,
}

/// Longest accepted `customer_id`, in bytes.
pub const MAX_CUSTOMER_ID_LEN: usize = 64;

/// ISO 17442 LEI length.
pub const LEI_LEN: usize = 20;

/// ISO 9362 BIC lengths.
pub const SWIFT_CODE_LENGTHS: [usize; 2] = [8, 11];

impl CustomerRecord {
    /// Parse a record from its structured JSON form and validate it.
    ///
    /// This is the supported entry point for untrusted input: parse failures
    /// and field violations both surface here, before any encoding happens.
    pub fn from_json(input: &str) -> KycResult<Self> {
        let record: CustomerRecord =
            serde_json::from_str(input).map_err(KycError::malformed_input)?;
        record.validate()?;
        Ok(record)
    }

    /// Check every field constraint on an already-built record.
    pub fn validate(&self) -> KycResult<()> {
        let id = self.customer_id.trim();
        if id.is_empty() {
            return Err(KycError::invalid_field("customer_id", "must not be empty"));
        }
        if id.len() > MAX_CUSTOMER_ID_LEN {
            return Err(KycError::invalid_field(
                "customer_id",
                format!("must not exceed {MAX_CUSTOMER_ID_LEN} bytes"),
            ));
        }

        require_non_empty("legal_name", &self.legal_name)?;
        require_non_empty("registration_number", &self.registration_number)?;
        require_non_empty("incorporation_country", &self.incorporation_country)?;
        require_non_empty("incorporation_date", &self.incorporation_date)?;
        require_non_empty("primary_country_operation", &self.primary_country_operation)?;
        require_non_empty("primary_isic_code", &self.primary_isic_code)?;
        require_non_empty("entity_type", &self.entity_type)?;

        if !SWIFT_CODE_LENGTHS.contains(&self.swift_code.len())
            || !self.swift_code.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(KycError::invalid_field(
                "swift_code",
                "must be 8 or 11 ASCII alphanumeric characters",
            ));
        }

        let lei_required = self.lei_registration_status == LeiRegistrationStatus::Registered;
        if lei_required || !self.lei.is_empty() {
            if self.lei.len() != LEI_LEN
                || !self.lei.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(KycError::invalid_field(
                    "lei",
                    format!("must be exactly {LEI_LEN} ASCII alphanumeric characters"),
                ));
            }
        }

        for (i, addr) in self.addresses.iter().enumerate() {
            for (name, value) in [
                ("address_type", &addr.address_type),
                ("address_line1", &addr.address_line1),
                ("city", &addr.city),
                ("country", &addr.country),
            ] {
                if value.trim().is_empty() {
                    return Err(KycError::invalid_field(
                        "addresses",
                        format!("address {i}: {name} must not be empty"),
                    ));
                }
            }
        }

        for (i, doc) in self.kyc_documents.iter().enumerate() {
            for (name, value) in [
                ("document_id", &doc.document_id),
                ("document_type", &doc.document_type),
            ] {
                if value.trim().is_empty() {
                    return Err(KycError::invalid_field(
                        "kyc_documents",
                        format!("document {i}: {name} must not be empty"),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn require_non_empty(field: &'static str, value: &str) -> KycResult<()> {
    if value.trim().is_empty() {
        return Err(KycError::invalid_field(field, "must not be empty"));
    }
    Ok(())
}
