//! # truthchain-identity
//!
//! Pseudonymous identity for the TruthChain consensus engine.
//!
//! Provides:
//! - Salted one-way hashing of a registration identifier (campus email)
//! - Deterministic 16-character pseudonyms
//! - An identity registry whose check-and-insert is the sole Sybil barrier

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod identifier_hash;
pub mod pseudonym;
pub mod registry;

#[cfg(test)]
mod proptests;

pub use error::{IdentityError, Result};
pub use identifier_hash::IdentifierHash;
pub use pseudonym::{
    derive_pseudonym, derive_seeded_pseudonym, seeded_key_material, Pseudonym, PSEUDONYM_LEN,
};
pub use registry::{IdentityRegistry, Registration};
