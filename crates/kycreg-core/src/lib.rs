//! kycreg-core
//!
//! Core primitives for the kycreg customer registry:
//! - Customer record model (v1) with addresses and KYC documents
//! - Field validation so malformed input fails at construction, not inside
//!   instruction encoding
//! - Shared error types
//!
//! This crate performs no I/O and reads no environment variables. All policy
//! (endpoints, funding, retry budgets) lives in the client crate.

pub mod errors;
pub mod model;

pub use crate::errors::{KycError, KycResult};

/// Record schema version string.
///
/// The on-chain account layout and the instruction payload are both derived
/// from the v1 model. New wire formats go in a new module, never by mutating
/// the v1 types.
pub const RECORD_SCHEMA_VERSION: &str = "v1";

/// Convenience re-exports.
pub mod prelude {
    pub use crate::model::{CustomerAddress, CustomerRecord, KycDocument, LeiRegistrationStatus};
    pub use crate::{KycError, KycResult};
}
