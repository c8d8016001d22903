//! Error types shared across kycreg crates.

use thiserror::Error;

/// Result alias used throughout the core crate.
pub type KycResult<T> = std::result::Result<T, KycError>;

/// Core-level failures: malformed input and field constraint violations.
#[derive(Debug, Error)]
pub enum KycError {
    /// A caller-supplied value is unusable for reasons not tied to a single
    /// record field.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A record field violates its type or length constraint.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Record input could not be parsed into the structured form at all.
    #[error("malformed record input: {0}")]
    MalformedInput(String),
}

impl KycError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn malformed_input(msg: impl std::fmt::Display) -> Self {
        Self::MalformedInput(msg.to_string())
    }
}
