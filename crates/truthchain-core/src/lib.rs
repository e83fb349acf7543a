//! # truthchain-core
//!
//! Trust-weighted anonymous consensus for TruthChain.
//!
//! Participants register under a pseudonym derived from their identifier,
//! submit claims, and vote true or false. Each vote is weighted by
//! `sqrt(trust)` at the moment it is cast. Once a claim has enough votes,
//! enough weight and enough age, its credibility score is classified and
//! voters gain or lose trust depending on whether they agreed.
//!
//! ## Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use truthchain_core::{TruthEngine, VoteDirection};
//!
//! let mut engine = TruthEngine::default();
//! let now = Utc::now();
//! let author = engine.register_at("author@campus.edu", now).unwrap();
//! let voter = engine.register_at("voter@campus.edu", now).unwrap();
//!
//! let claim = engine
//!     .submit_claim_at(&author.pseudonym, "Library open until 2 AM", "Campus", vec![], now)
//!     .unwrap();
//! engine
//!     .cast_vote_at(&voter.pseudonym, &claim.id, VoteDirection::True, now)
//!     .unwrap();
//!
//! // One vote is far from the stabilization gate.
//! let result = engine.resolve_at(&claim.id, now + Duration::days(1)).unwrap();
//! assert!(!result.stabilized);
//! assert!(result.trust_updates.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod config;
pub mod consensus;
pub mod demo;
pub mod engine;
pub mod error;
pub mod metrics;

#[cfg(test)]
mod proptests;

pub use claim::{Claim, ClaimStatus, Resolution, DEFAULT_CATEGORY};
pub use config::{
    ConfigError, ConsensusConfig, EngineConfig, EngineConfigBuilder, TrustConfig,
    VoteFeedbackConfig,
};
pub use consensus::{
    classify, credibility_score, is_stabilized, popularity_vs_truth, resolve, validate_vote,
    BlocSummary, ConsensusResult, PopularityReport,
};
pub use demo::DemoSeed;
pub use engine::{CollusionReport, TruthEngine, VoteReceipt};
pub use error::{CoreError, Result, VoteRejection};
pub use metrics::SystemMetrics;

pub use truthchain_identity::{IdentifierHash, Pseudonym};
pub use truthchain_reputation::{
    payoffs, payoffs_with, simulate_attack, AttackReport, ClaimId, CollusionEdge,
    CollusionPenalty, DayClock, Participant, PayoffAssumptions, PayoffReport, Strategy,
    TrustModel, TrustUpdate, TrustUpdateSource, Vote, VoteDirection,
};
