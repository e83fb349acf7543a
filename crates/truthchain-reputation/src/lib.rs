//! # truthchain-reputation
//!
//! Trust scoring and anti-manipulation for the TruthChain consensus engine.
//!
//! This crate provides:
//! - **TrustModel**: bounded trust arithmetic and the `sqrt(trust)` vote weight
//! - **Inactivity decay**: monthly compounding decay toward the floor
//! - **Vote**: immutable ballot with a trust snapshot taken at cast time
//! - **CollusionDetector**: pairwise correlation graph over the vote history
//! - **Attack simulation** and **incentive analysis**: closed-form reports
//!
//! ## Anti-Gaming Measures
//!
//! - Vote weight grows with `sqrt(trust)`, so influence has diminishing returns
//! - Losses are 1.5x gains, so sustained dishonesty is a losing strategy
//! - Pairs agreeing >= 85% across >= 20 shared claims over >= 30 days are flagged
//! - Flagged participants lose 40% of trust once and earn 60% of future updates

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attack;
pub mod ballot;
pub mod clock;
pub mod collusion;
pub mod decay;
pub mod error;
pub mod incentives;
pub mod model;
pub mod numeric;
pub mod participant;
pub mod record;
pub mod score;

#[cfg(test)]
mod proptests;

pub use attack::{simulate_attack, AttackEconomics, AttackReport};
pub use ballot::{ClaimId, Vote, VoteDirection};
pub use clock::DayClock;
pub use collusion::{CollusionConfig, CollusionDetector, CollusionEdge, CollusionPenalty};
pub use decay::{apply_inactivity_decay, InactivityDecayConfig};
pub use error::{ReputationError, Result};
pub use incentives::{payoffs, payoffs_with, PayoffAssumptions, PayoffReport, Strategy, StrategyPayoff};
pub use model::{TrustChange, TrustModel};
pub use participant::Participant;
pub use record::{TrustUpdate, TrustUpdateSource};
pub use score::{clamp_trust, effective_weight, limits, trust_percentile};
