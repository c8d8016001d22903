//! Constants shared between the on-chain program and clients.
//!
//! Keep these stable because they affect PDA derivation and the wire format.

use solana_program::pubkey::Pubkey;

/// PDA seed prefix for customer record accounts.
pub const SEED_CUSTOMER: &[u8] = b"kycreg:customer";

/// Instruction tag for CreateCustomer. Tag 0 is reserved as invalid.
pub const TAG_CREATE_CUSTOMER: u8 = 1;

/// Instruction tag for UpdateKycStatus.
pub const TAG_UPDATE_KYC_STATUS: u8 = 2;

/// Default program id (placeholder).
///
/// Replace this with the deployed program id when available.
pub const DEFAULT_PROGRAM_ID: &str = "KycReg1111111111111111111111111111111111111";

pub fn default_program_id() -> Pubkey {
    DEFAULT_PROGRAM_ID.parse().unwrap_or_else(|_| Pubkey::default())
}
