//! Sybil-resistant identity registry.
//!
//! One identifier, one hash, one pseudonym. Registration is a pure
//! set-membership check on the [`IdentifierHash`]: it is not behavioural.
//! Check and insert happen under a single `&mut self` borrow, so a host that
//! shares the registry behind a lock gets an atomic check-and-insert.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::pseudonym::{derive_pseudonym, random_seed_material};
use crate::{IdentifierHash, IdentityError, Pseudonym, Result};

/// Outcome of a successful registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// The new participant's pseudonym.
    pub pseudonym: Pseudonym,
    /// Deduplication digest of the identifier.
    pub identifier_hash: IdentifierHash,
}

/// Registry of every identifier hash and pseudonym ever issued.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdentityRegistry {
    hashes: HashSet<IdentifierHash>,
    pseudonyms: HashSet<Pseudonym>,
}

impl IdentityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identifier with fresh random seed material.
    ///
    /// # Errors
    ///
    /// - `IdentityError::EmptyIdentifier` if the identifier is blank
    /// - `IdentityError::DuplicateIdentity` if its hash is already registered
    pub fn register(&mut self, identifier: &str) -> Result<Registration> {
        let seed = random_seed_material();
        self.register_with_seed(identifier, &seed)
    }

    /// Register an identifier, deriving the pseudonym from the given seed
    /// material.
    ///
    /// Nothing is inserted unless both the hash and the pseudonym are new.
    ///
    /// # Errors
    ///
    /// - `IdentityError::EmptyIdentifier` if the identifier is blank
    /// - `IdentityError::DuplicateIdentity` if its hash is already registered
    /// - `IdentityError::PseudonymTaken` if the seed collides with an
    ///   existing pseudonym
    pub fn register_with_seed(&mut self, identifier: &str, seed: &[u8]) -> Result<Registration> {
        let identifier_hash = IdentifierHash::from_identifier(identifier)?;
        if self.hashes.contains(&identifier_hash) {
            warn!(hash = %identifier_hash.short(), "Duplicate registration blocked");
            return Err(IdentityError::DuplicateIdentity);
        }

        let pseudonym = derive_pseudonym(seed);
        if self.pseudonyms.contains(&pseudonym) {
            return Err(IdentityError::PseudonymTaken(pseudonym.to_string()));
        }

        self.hashes.insert(identifier_hash);
        self.pseudonyms.insert(pseudonym.clone());
        debug!(pseudonym = %pseudonym, "Registered identity");

        Ok(Registration {
            pseudonym,
            identifier_hash,
        })
    }

    /// Check whether an identifier has already been registered.
    #[must_use]
    pub fn is_registered(&self, identifier: &str) -> bool {
        IdentifierHash::from_identifier(identifier)
            .map(|hash| self.hashes.contains(&hash))
            .unwrap_or(false)
    }

    /// Check whether a digest is present.
    #[must_use]
    pub fn contains_hash(&self, hash: &IdentifierHash) -> bool {
        self.hashes.contains(hash)
    }

    /// Number of registered identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
