//! kycreg-solana-client
//!
//! This crate provides a small, focused Rust client for getting KYC customer
//! record mutations committed to the kycreg on-chain program.
//!
//! It includes:
//! - a liveness-probed connection to an RPC endpoint
//! - payer establishment with test-network airdrop funding
//! - a deployed-and-executable gate for the target program
//! - PDA derivation for customer accounts
//! - bit-exact instruction encoding (tag byte + borsh payload)
//! - transaction submission driven to a confirmed or failed terminal state
//!
//! Note: The on-chain program id is expected to be provided by the consumer.
//! The default here is a placeholder constant for local development.

pub mod client;
pub mod config;
pub mod connection;
pub mod constants;
pub mod error;
pub mod instruction;
pub mod payer;
pub mod pda;
pub mod program;
pub mod submit;

pub use client::*;
pub use config::*;
pub use connection::*;
pub use constants::*;
pub use error::*;
pub use instruction::*;
pub use payer::*;
pub use pda::*;
pub use program::*;
pub use submit::*;
