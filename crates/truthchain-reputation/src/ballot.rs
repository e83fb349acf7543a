//! Claim identifiers and immutable vote records.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use truthchain_identity::Pseudonym;

use crate::score::effective_weight;
use crate::{ReputationError, Result};

/// Unique claim identifier (128 random bits).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId([u8; 16]);

impl ClaimId {
    /// Size of the identifier in bytes.
    pub const SIZE: usize = 16;

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; Self::SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Parse from 32 hex characters.
    ///
    /// # Errors
    ///
    /// Returns `ReputationError::InvalidClaimId` for malformed input.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| ReputationError::InvalidClaimId(e.to_string()))?;
        let array: [u8; 16] = bytes
            .try_into()
            .map_err(|_| ReputationError::InvalidClaimId(s.to_string()))?;
        Ok(Self(array))
    }

    /// Format as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClaimId({})", &self.to_hex()[..8])
    }
}

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A voter's judgment on a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteDirection {
    /// +1: the claim is true.
    True,
    /// -1: the claim is false.
    False,
}

impl VoteDirection {
    /// Numeric sign: `+1.0` or `-1.0`.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::True => 1.0,
            Self::False => -1.0,
        }
    }
}

impl TryFrom<i64> for VoteDirection {
    type Error = ReputationError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Self::True),
            -1 => Ok(Self::False),
            other => Err(ReputationError::InvalidDirection(other)),
        }
    }
}

impl From<VoteDirection> for i64 {
    fn from(direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::True => 1,
            VoteDirection::False => -1,
        }
    }
}

/// One participant's vote on one claim.
///
/// The trust snapshot and weight are fixed at cast time and never
/// recomputed, even if the voter's trust later changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// The claim voted on.
    pub claim_id: ClaimId,
    /// The voter.
    pub voter: Pseudonym,
    /// Direction of the vote.
    pub direction: VoteDirection,
    /// When the vote was cast.
    pub timestamp: DateTime<Utc>,
    /// Voter's trust when the vote was cast.
    pub trust_at_cast: f64,
    /// `sqrt(trust_at_cast)`, floored at the trust minimum.
    pub weight: f64,
}

impl Vote {
    /// Record a vote with the default weight floor.
    #[must_use]
    pub fn new(
        claim_id: ClaimId,
        voter: Pseudonym,
        direction: VoteDirection,
        trust_at_cast: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::with_weight(
            claim_id,
            voter,
            direction,
            trust_at_cast,
            effective_weight(trust_at_cast),
            timestamp,
        )
    }

    /// Record a vote whose weight was computed by the caller's trust model.
    #[must_use]
    pub fn with_weight(
        claim_id: ClaimId,
        voter: Pseudonym,
        direction: VoteDirection,
        trust_at_cast: f64,
        weight: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            claim_id,
            voter,
            direction,
            timestamp,
            trust_at_cast,
            weight,
        }
    }

    /// `weight * sign(direction)`.
    #[must_use]
    pub fn signed_weight(&self) -> f64 {
        self.weight * self.direction.sign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truthchain_identity::derive_seeded_pseudonym;

    #[test]
    fn test_claim_id_hex_roundtrip() {
        let id = ClaimId::generate();
        assert_eq!(ClaimId::from_hex(&id.to_hex()).unwrap(), id);
        assert!(ClaimId::from_hex("zz").is_err());
        assert!(ClaimId::from_hex("abcd").is_err());
    }

    #[test]
    fn test_claim_ids_unique() {
        assert_ne!(ClaimId::generate(), ClaimId::generate());
    }

    #[test]
    fn test_direction_conversion() {
        assert_eq!(VoteDirection::try_from(1).unwrap(), VoteDirection::True);
        assert_eq!(VoteDirection::try_from(-1).unwrap(), VoteDirection::False);
        assert_eq!(
            VoteDirection::try_from(0),
            Err(ReputationError::InvalidDirection(0))
        );
        assert_eq!(i64::from(VoteDirection::False), -1);
    }

    #[test]
    fn test_vote_snapshots_weight() {
        let vote = Vote::new(
            ClaimId::generate(),
            derive_seeded_pseudonym("voter"),
            VoteDirection::False,
            4.0,
            Utc::now(),
        );
        assert!((vote.weight - 2.0).abs() < 1e-12);
        assert!((vote.signed_weight() + 2.0).abs() < 1e-12);
    }
}
