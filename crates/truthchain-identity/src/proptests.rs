//! Property-based tests for identity components.
//!
//! These tests verify identity system invariants:
//!
//! - Identifier hashes are deterministic and case/whitespace-insensitive
//! - Pseudonyms always have the canonical format
//! - Registering the same identifier twice never succeeds twice

use proptest::prelude::*;

use crate::{derive_pseudonym, IdentifierHash, IdentityError, IdentityRegistry, Pseudonym};

proptest! {
    /// Hashing is deterministic for any non-blank identifier.
    #[test]
    fn identifier_hash_deterministic(id in "[a-z0-9._]{1,24}@[a-z]{2,12}\\.edu") {
        let h1 = IdentifierHash::from_identifier(&id).unwrap();
        let h2 = IdentifierHash::from_identifier(&id).unwrap();
        prop_assert_eq!(h1, h2);
    }

    /// Case and surrounding whitespace never change the digest.
    #[test]
    fn identifier_hash_normalized(id in "[a-z0-9]{1,24}@[a-z]{2,12}\\.edu", pad in " {0,4}") {
        let plain = IdentifierHash::from_identifier(&id).unwrap();
        let noisy = IdentifierHash::from_identifier(&format!("{pad}{}{pad}", id.to_uppercase())).unwrap();
        prop_assert_eq!(plain, noisy);
    }

    /// Distinct identifiers produce distinct digests.
    #[test]
    fn distinct_identifiers_distinct_hashes(
        a in "[a-z0-9]{1,16}@campus\\.edu",
        b in "[a-z0-9]{1,16}@campus\\.edu"
    ) {
        prop_assume!(a != b);
        let ha = IdentifierHash::from_identifier(&a).unwrap();
        let hb = IdentifierHash::from_identifier(&b).unwrap();
        prop_assert_ne!(ha, hb);
    }

    /// Every derived pseudonym is well-formed.
    #[test]
    fn pseudonym_always_valid(seed: Vec<u8>) {
        let p = derive_pseudonym(&seed);
        prop_assert!(Pseudonym::is_valid(p.as_str()));
    }

    /// The second registration of an identifier is always rejected.
    #[test]
    fn second_registration_rejected(id in "[a-z0-9]{1,16}@campus\\.edu") {
        let mut registry = IdentityRegistry::new();
        prop_assert!(registry.register(&id).is_ok());
        prop_assert_eq!(registry.register(&id), Err(IdentityError::DuplicateIdentity));
        prop_assert_eq!(registry.len(), 1);
    }
}
