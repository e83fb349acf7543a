//! Salted one-way hashing of registration identifiers.
//!
//! An `IdentifierHash` is the deduplication digest of a real-world identifier
//! (typically a campus email address). The raw identifier is never stored;
//! only this digest is kept in the registry.
//!
//! ## Security Properties
//!
//! - **Determinism**: the same identifier always yields the same digest
//! - **Pre-image Resistance**: the identifier cannot be recovered from the digest
//! - **Normalisation**: surrounding whitespace and letter case are ignored
//! - **Domain Separation**: a fixed salt prefix keeps these digests distinct
//!   from any other BLAKE3 hash in the system
//! - **Constant-Time Comparison**: via [`subtle::ConstantTimeEq`]

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::{IdentityError, Result};

/// Salt and domain separator for identifier hashing.
const IDENTIFIER_HASH_DOMAIN: &[u8] = b"TruthChain_v1_Salt";

/// Deduplication digest of a registration identifier.
///
/// Computed as:
/// ```text
/// BLAKE3(IDENTIFIER_HASH_DOMAIN || lowercase(trim(identifier)))
/// ```
///
/// Treat the value as opaque: it is only ever compared for set membership.
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct IdentifierHash([u8; 32]);

impl IdentifierHash {
    /// Size of the digest in bytes.
    pub const SIZE: usize = 32;

    /// Hash a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::EmptyIdentifier` if the identifier is empty
    /// after trimming.
    pub fn from_identifier(identifier: &str) -> Result<Self> {
        let normalized = normalize(identifier);
        if normalized.is_empty() {
            return Err(IdentityError::EmptyIdentifier);
        }

        let mut hasher = blake3::Hasher::new();
        hasher.update(IDENTIFIER_HASH_DOMAIN);
        hasher.update(normalized.as_bytes());
        Ok(Self(*hasher.finalize().as_bytes()))
    }

    /// Get the digest as a byte slice.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Format as a lowercase hexadecimal string (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hexadecimal string.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidHash` if the input is not exactly
    /// 64 hexadecimal characters.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| IdentityError::InvalidHash(e.to_string()))?;
        let array: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            IdentityError::InvalidHash(format!("expected 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(array))
    }

    /// Truncated representation for logging.
    pub fn short(&self) -> String {
        let hex = self.to_hex();
        format!("{}...", &hex[..16])
    }
}

/// Canonical form of an identifier before hashing.
fn normalize(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

impl ConstantTimeEq for IdentifierHash {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for IdentifierHash {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for IdentifierHash {}

impl std::hash::Hash for IdentifierHash {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl std::fmt::Debug for IdentifierHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdentifierHash({})", self.short())
    }
}

impl std::fmt::Display for IdentifierHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
