//! Demonstration dataset.
//!
//! Ten campus participants spanning the trust range and six claims with
//! mixed vote patterns. The first three claims are backdated past the
//! stabilization window; the rest are still maturing. Everything is
//! deterministic: pseudonyms come from seeded key material and all time
//! offsets are fixed fractions of a claim-day.

use chrono::{DateTime, Utc};
use truthchain_identity::Pseudonym;
use truthchain_reputation::{ClaimId, Vote, VoteDirection};

use crate::claim::Claim;
use crate::config::EngineConfig;
use crate::engine::TruthEngine;
use crate::error::{CoreError, Result};

/// Claim-days a seeded claim accepts votes.
pub const DEMO_VOTING_WINDOW_DAYS: i64 = 30;

/// Multiplier carried by the pre-flagged participant.
pub const DEMO_FLAGGED_MULTIPLIER: f64 = 0.6;

/// Seeded participants: identifier, trust, flagged.
pub const DEMO_PROFILES: [(&str, f64, bool); 10] = [
    ("alice@campus.edu", 3.2, false),
    ("bob@campus.edu", 1.8, false),
    ("carol@campus.edu", 0.9, false),
    ("dave@campus.edu", 0.5, false),
    ("eve@campus.edu", 0.3, false),
    ("frank@campus.edu", 4.5, false),
    ("grace@campus.edu", 2.1, false),
    ("hank@campus.edu", 0.2, false),
    ("ivy@campus.edu", 1.2, false),
    ("jake@campus.edu", 0.15, true),
];

/// Authors are drawn round-robin from this profile index onward.
const AUTHOR_POOL_START: usize = 5;

/// Seeded votes come from this profile index onward, leaving the first
/// four participants free to vote interactively.
const VOTER_POOL_START: usize = 4;

struct DemoClaim {
    content: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    pattern: &'static [i8],
}

const DEMO_CLAIMS: [DemoClaim; 6] = [
    DemoClaim {
        content: "Library extending hours to 2 AM during finals week",
        category: "Campus Services",
        tags: &["library", "finals", "hours"],
        pattern: &[1, 1, 1, 1, 1, 1, -1, 1, 1, 1],
    },
    DemoClaim {
        content: "New dining hall opening in the science building next semester",
        category: "Campus Development",
        tags: &["dining", "food", "construction"],
        pattern: &[1, 1, -1, -1, 1, 1, -1, 1, 1, -1],
    },
    DemoClaim {
        content: "Professor Smith cancelling all Monday lectures for the rest of the semester",
        category: "Academics",
        tags: &["lectures", "professor", "schedule"],
        pattern: &[-1, -1, 1, -1, -1, -1, -1, 1, -1, -1],
    },
    DemoClaim {
        content: "Campus WiFi upgrade to 10Gbps happening this weekend",
        category: "Technology",
        tags: &["wifi", "internet", "IT"],
        pattern: &[1, 1, 1, -1, 1, 1, 1, -1, 1, 1],
    },
    DemoClaim {
        content: "Free concert by major artist at the amphitheater on Friday",
        category: "Events",
        tags: &["concert", "music", "free"],
        pattern: &[-1, -1, -1, 1, -1, 1, -1, -1, -1, 1],
    },
    DemoClaim {
        content: "Parking garage on East side closing permanently due to structural issues",
        category: "Infrastructure",
        tags: &["parking", "safety", "closure"],
        pattern: &[1, -1, 1, 1, -1, 1, 1, 1],
    },
];

/// What [`TruthEngine::seed_demo`] created.
#[derive(Clone, Debug, PartialEq)]
pub struct DemoSeed {
    /// Participants in profile order.
    pub participants: Vec<Pseudonym>,
    /// Claims in creation order.
    pub claims: Vec<ClaimId>,
}

impl TruthEngine {
    /// Build an engine on the demo clock and seed it.
    ///
    /// # Errors
    ///
    /// Propagates seeding failures.
    pub fn demo(now: DateTime<Utc>) -> Result<(Self, DemoSeed)> {
        let mut engine = Self::new(EngineConfig::demo())?;
        let seed = engine.seed_demo(now)?;
        Ok((engine, seed))
    }

    /// Populate the engine with the demonstration dataset.
    ///
    /// Vote counters on seeded participants are synthetic history
    /// (`floor(trust * 15)` votes, 70% correct) and seeded votes apply no
    /// feedback.
    ///
    /// # Errors
    ///
    /// `CoreError::DuplicateIdentity` if any profile is already registered.
    pub fn seed_demo(&mut self, now: DateTime<Utc>) -> Result<DemoSeed> {
        let mut participants = Vec::with_capacity(DEMO_PROFILES.len());
        for (identifier, trust, flagged) in DEMO_PROFILES {
            let pseudonym = self.register_seeded_at(identifier, identifier, now)?.pseudonym;
            self.seed_trust(&pseudonym, trust)?;

            let participant = self
                .participant_mut(&pseudonym)
                .ok_or_else(|| CoreError::ParticipantNotFound(pseudonym.clone()))?;
            let total = (trust * 15.0).floor() as u64;
            let correct = (total as f64 * 0.7).floor() as u64;
            participant.total_votes = total;
            participant.correct_votes = correct;
            participant.incorrect_votes = total - correct;
            if flagged {
                participant.flag_for_collusion(DEMO_FLAGGED_MULTIPLIER);
            }
            participants.push(pseudonym);
        }

        let day = self.clock().day_length();
        let authors = &participants[AUTHOR_POOL_START..];
        let voters = &participants[VOTER_POOL_START..];
        let mut claims = Vec::with_capacity(DEMO_CLAIMS.len());

        for (index, data) in DEMO_CLAIMS.iter().enumerate() {
            let author = &authors[index % authors.len()];
            // 8, 8.5, 9 claim-days for the first three; 2, 3, 4 after.
            let age = if index < 3 {
                day * 8 + day * (index as i32) / 2
            } else {
                day * (index as i32 - 1)
            };
            let created_at = now - age;

            let mut claim = Claim::new(
                author.clone(),
                data.content,
                data.category,
                data.tags.iter().map(|t| (*t).to_string()).collect(),
                created_at,
                self.clock().span(DEMO_VOTING_WINDOW_DAYS),
            );

            let mut votes = Vec::new();
            for (i, (voter, &sign)) in voters.iter().zip(data.pattern).enumerate() {
                if voter == author {
                    continue;
                }
                let Some(participant) = self.participant(voter) else {
                    continue;
                };
                let direction = if sign < 0 {
                    VoteDirection::False
                } else {
                    VoteDirection::True
                };
                let trust = participant.trust();
                votes.push(Vote::with_weight(
                    claim.id,
                    voter.clone(),
                    direction,
                    trust,
                    self.model().weight(trust),
                    created_at + day * (i as i32) / 3,
                ));
            }

            claim.recompute_aggregates(&votes);
            claims.push(claim.id);
            self.insert_seeded_claim(claim, votes);
        }

        tracing::info!(
            participants = participants.len(),
            claims = claims.len(),
            "Demo data seeded"
        );
        Ok(DemoSeed {
            participants,
            claims,
        })
    }
}
