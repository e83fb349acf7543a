//! Pseudonym derivation.
//!
//! A pseudonym is the first 16 hex characters (upper-case) of a BLAKE3
//! digest over some seed material. It is derived once at registration and
//! stays stable forever after.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{IdentityError, Result};

/// Length of a pseudonym in characters.
pub const PSEUDONYM_LEN: usize = 16;

/// Domain separator for pseudonym derivation.
const PSEUDONYM_DOMAIN: &[u8] = b"TruthChain-Pseudonym-v1";

/// Domain separator for seeded (demo) key material.
const SEEDED_KEY_DOMAIN: &[u8] = b"_TruthChain_KeyPair";

/// Random seed material size used for fresh registrations.
const SEED_MATERIAL_SIZE: usize = 32;

/// Stable anonymous identifier for a participant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pseudonym(String);

impl Pseudonym {
    /// Parse and validate a pseudonym string.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidPseudonym` unless the input is exactly
    /// 16 upper-case hexadecimal characters.
    pub fn parse(s: &str) -> Result<Self> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(IdentityError::InvalidPseudonym {
                reason: format!("expected {PSEUDONYM_LEN} upper-case hex characters"),
            })
        }
    }

    /// Check whether a string is a well-formed pseudonym.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        s.len() == PSEUDONYM_LEN
            && s
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    }

    /// Get the pseudonym as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Pseudonym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Pseudonym {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive a pseudonym from seed material.
#[must_use]
pub fn derive_pseudonym(seed_material: &[u8]) -> Pseudonym {
    let mut hasher = blake3::Hasher::new();
    hasher.update(PSEUDONYM_DOMAIN);
    hasher.update(seed_material);
    let hex = hasher.finalize().to_hex();
    Pseudonym(hex.as_str()[..PSEUDONYM_LEN].to_ascii_uppercase())
}

/// Deterministic seed material for a human-readable seed.
///
/// Used for demo participants so their pseudonyms survive restarts.
#[must_use]
pub fn seeded_key_material(seed: &str) -> [u8; SEED_MATERIAL_SIZE] {
    *blake3::Hasher::new()
        .update(seed.as_bytes())
        .update(SEEDED_KEY_DOMAIN)
        .finalize()
        .as_bytes()
}

/// Derive a stable pseudonym from a human-readable seed.
#[must_use]
pub fn derive_seeded_pseudonym(seed: &str) -> Pseudonym {
    derive_pseudonym(&seeded_key_material(seed))
}

/// Fresh random seed material for a new registration.
pub(crate) fn random_seed_material() -> [u8; SEED_MATERIAL_SIZE] {
    let mut seed = [0u8; SEED_MATERIAL_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut seed);
    seed
}
