//! PDA derivation for customer record accounts.
//!
//! Creation and later updates must address the same account without a
//! lookup table, so the address is derived deterministically from
//! `(program_id, customer_id)`. Customer ids are arbitrary strings and PDA
//! seeds cap at 32 bytes, so the id seed is the sha256 digest of the
//! trimmed id.

use sha2::{Digest, Sha256};
use solana_program::pubkey::Pubkey;

use crate::constants::SEED_CUSTOMER;

/// Derive the account address holding the record for `customer_id`.
pub fn derive_customer(program_id: &Pubkey, customer_id: &str) -> (Pubkey, u8) {
    let seed = customer_seed(customer_id);
    Pubkey::find_program_address(&[SEED_CUSTOMER, &seed], program_id)
}

/// The fixed-width seed for a customer id.
pub fn customer_seed(customer_id: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(customer_id.trim().as_bytes());
    hasher.finalize().into()
}
