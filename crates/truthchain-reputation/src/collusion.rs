//! Collusion detection via pairwise vote correlation.
//!
//! For every pair of participants who voted on the same claims:
//!
//! ```text
//! correlation = agreements / shared_claims
//! ```
//!
//! A pair is flagged only when all three hold at once:
//! correlation >= 85%, shared claims >= 20, and the shared interactions span
//! at least 30 claim-days. Friends who agree on a handful of claims, or a
//! short burst of agreement, never trip it.
//!
//! The graph is rebuilt wholesale from a snapshot of the vote history on
//! every run; nothing is updated incrementally.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use truthchain_identity::Pseudonym;

use crate::numeric::at_least;
use crate::{ClaimId, DayClock, Participant, TrustModel, TrustUpdate, TrustUpdateSource, Vote};

/// Minimum agreement ratio for a flag.
pub const COLLUSION_CORRELATION_THRESHOLD: f64 = 0.85;

/// Minimum number of shared claims for a flag.
pub const COLLUSION_MIN_SHARED_CLAIMS: u32 = 20;

/// Minimum span of shared interactions, in claim-days. Also the recovery window.
pub const COLLUSION_MIN_WINDOW_DAYS: i64 = 30;

/// Penalty multiplier for flagged participants.
pub const COLLUSION_WEIGHT_PENALTY: f64 = 0.6;

/// Thresholds and penalty for collusion detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollusionConfig {
    /// Minimum agreement ratio.
    pub correlation_threshold: f64,
    /// Minimum shared claims.
    pub min_shared_claims: u32,
    /// Minimum interaction window in claim-days.
    pub min_window_days: i64,
    /// Multiplier applied to flagged participants.
    pub weight_penalty: f64,
}

impl Default for CollusionConfig {
    fn default() -> Self {
        Self {
            correlation_threshold: COLLUSION_CORRELATION_THRESHOLD,
            min_shared_claims: COLLUSION_MIN_SHARED_CLAIMS,
            min_window_days: COLLUSION_MIN_WINDOW_DAYS,
            weight_penalty: COLLUSION_WEIGHT_PENALTY,
        }
    }
}

/// Agreement statistic for an unordered pair of participants.
///
/// `participant_a` always sorts before `participant_b`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollusionEdge {
    /// First participant of the pair.
    pub participant_a: Pseudonym,
    /// Second participant of the pair.
    pub participant_b: Pseudonym,
    /// `agreements / shared_claims`, in `[0, 1]`.
    pub correlation: f64,
    /// Claims on which both voted the same way.
    pub agreements: u32,
    /// Claims both voted on.
    pub shared_claims: u32,
    /// Earliest vote timestamp across shared claims.
    pub first_interaction: DateTime<Utc>,
    /// Latest vote timestamp across shared claims.
    pub last_interaction: DateTime<Utc>,
    /// Whether the pair meets the collusion rule.
    pub flagged: bool,
}

impl CollusionEdge {
    /// Whether the edge touches `pseudonym`.
    #[must_use]
    pub fn involves(&self, pseudonym: &Pseudonym) -> bool {
        &self.participant_a == pseudonym || &self.participant_b == pseudonym
    }

    /// The other endpoint, if `pseudonym` is one of them.
    #[must_use]
    pub fn partner_of(&self, pseudonym: &Pseudonym) -> Option<&Pseudonym> {
        if &self.participant_a == pseudonym {
            Some(&self.participant_b)
        } else if &self.participant_b == pseudonym {
            Some(&self.participant_a)
        } else {
            None
        }
    }
}

/// Penalty assigned to one participant by a detection run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollusionPenalty {
    /// Multiplier on future trust updates.
    pub multiplier: f64,
    /// Partners on flagged edges.
    pub connected_with: Vec<Pseudonym>,
}

#[derive(Clone, Copy)]
struct PairStats {
    agreements: u32,
    shared: u32,
    first: DateTime<Utc>,
    last: DateTime<Utc>,
}

/// Builds the correlation graph and turns flagged edges into penalties.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollusionDetector {
    config: CollusionConfig,
    clock: DayClock,
    edges: Vec<CollusionEdge>,
}

impl CollusionDetector {
    /// Create a detector with the given thresholds.
    #[must_use]
    pub fn new(config: CollusionConfig, clock: DayClock) -> Self {
        Self {
            config,
            clock,
            edges: Vec::new(),
        }
    }

    /// Detection thresholds.
    #[must_use]
    pub fn config(&self) -> &CollusionConfig {
        &self.config
    }

    /// Edges from the last [`rebuild`](Self::rebuild).
    #[must_use]
    pub fn edges(&self) -> &[CollusionEdge] {
        &self.edges
    }

    /// Flagged edges from the last rebuild.
    pub fn flagged_edges(&self) -> impl Iterator<Item = &CollusionEdge> {
        self.edges.iter().filter(|e| e.flagged)
    }

    /// Replace the graph with one built from `votes`.
    pub fn rebuild(&mut self, votes: &[Vote]) -> &[CollusionEdge] {
        self.edges = self.build_correlation_graph(votes);
        &self.edges
    }

    /// Build one edge per pair of participants sharing at least one claim.
    ///
    /// Output is sorted by pair, independent of input order.
    #[must_use]
    pub fn build_correlation_graph(&self, votes: &[Vote]) -> Vec<CollusionEdge> {
        let mut by_claim: HashMap<ClaimId, Vec<&Vote>> = HashMap::new();
        for vote in votes {
            by_claim.entry(vote.claim_id).or_default().push(vote);
        }

        let mut pairs: BTreeMap<(Pseudonym, Pseudonym), PairStats> = BTreeMap::new();
        for claim_votes in by_claim.values() {
            for (i, a) in claim_votes.iter().enumerate() {
                for b in &claim_votes[i + 1..] {
                    if a.voter == b.voter {
                        continue;
                    }
                    let key = if a.voter < b.voter {
                        (a.voter.clone(), b.voter.clone())
                    } else {
                        (b.voter.clone(), a.voter.clone())
                    };
                    let first = a.timestamp.min(b.timestamp);
                    let last = a.timestamp.max(b.timestamp);
                    let agreed = u32::from(a.direction == b.direction);

                    pairs
                        .entry(key)
                        .and_modify(|s| {
                            s.shared += 1;
                            s.agreements += agreed;
                            s.first = s.first.min(first);
                            s.last = s.last.max(last);
                        })
                        .or_insert(PairStats {
                            agreements: agreed,
                            shared: 1,
                            first,
                            last,
                        });
                }
            }
        }

        let edges: Vec<CollusionEdge> = pairs
            .into_iter()
            .map(|((a, b), stats)| self.edge_from(a, b, stats))
            .collect();

        debug!(
            edges = edges.len(),
            flagged = edges.iter().filter(|e| e.flagged).count(),
            "Built correlation graph"
        );
        edges
    }

    fn edge_from(&self, a: Pseudonym, b: Pseudonym, stats: PairStats) -> CollusionEdge {
        let correlation = if stats.shared > 0 {
            f64::from(stats.agreements) / f64::from(stats.shared)
        } else {
            0.0
        };
        let flagged = at_least(correlation, self.config.correlation_threshold)
            && stats.shared >= self.config.min_shared_claims
            && self
                .clock
                .elapsed_at_least(stats.first, stats.last, self.config.min_window_days);

        if flagged {
            warn!(
                participant_a = %a,
                participant_b = %b,
                correlation,
                shared = stats.shared,
                "Collusion pattern flagged"
            );
        }

        CollusionEdge {
            participant_a: a,
            participant_b: b,
            correlation,
            agreements: stats.agreements,
            shared_claims: stats.shared,
            first_interaction: stats.first,
            last_interaction: stats.last,
            flagged,
        }
    }

    /// Whether a flagged edge still shows coordination at `now`.
    ///
    /// An edge goes quiet once its latest shared interaction is at least one
    /// detection window old.
    #[must_use]
    pub fn is_active(&self, edge: &CollusionEdge, now: DateTime<Utc>) -> bool {
        edge.flagged
            && !self
                .clock
                .elapsed_at_least(edge.last_interaction, now, self.config.min_window_days)
    }

    /// Penalize both endpoints of every active flagged edge.
    ///
    /// Quiet edges are skipped, so a recovered participant is not penalized
    /// again for history that already cost them. A participant on several
    /// flagged edges keeps the smallest multiplier; penalties never stack
    /// below it.
    #[must_use]
    pub fn detect_clusters(
        &self,
        edges: &[CollusionEdge],
        now: DateTime<Utc>,
    ) -> BTreeMap<Pseudonym, CollusionPenalty> {
        let mut penalties: BTreeMap<Pseudonym, CollusionPenalty> = BTreeMap::new();
        let penalty = self.config.weight_penalty;

        for edge in edges.iter().filter(|e| self.is_active(e, now)) {
            for (member, partner) in [
                (&edge.participant_a, &edge.participant_b),
                (&edge.participant_b, &edge.participant_a),
            ] {
                let entry = penalties
                    .entry(member.clone())
                    .or_insert_with(|| CollusionPenalty {
                        multiplier: penalty,
                        connected_with: Vec::new(),
                    });
                entry.multiplier = entry.multiplier.min(penalty);
                entry.connected_with.push(partner.clone());
            }
        }

        penalties
    }

    /// Apply penalties to participants.
    ///
    /// Newly flagged participants lose trust once (`trust * multiplier`);
    /// already-flagged ones only have their multiplier refreshed. Unknown
    /// pseudonyms are skipped.
    pub fn apply_penalties(
        &self,
        participants: &mut HashMap<Pseudonym, Participant>,
        penalties: &BTreeMap<Pseudonym, CollusionPenalty>,
        model: &TrustModel,
        now: DateTime<Utc>,
    ) -> Vec<TrustUpdate> {
        let mut updates = Vec::new();

        for (pseudonym, penalty) in penalties {
            let Some(participant) = participants.get_mut(pseudonym) else {
                continue;
            };

            let newly_flagged = !participant.is_flagged_for_collusion();
            participant.flag_for_collusion(penalty.multiplier);
            if !newly_flagged {
                continue;
            }

            let old_trust = participant.trust();
            let new_trust =
                model.set_trust(participant, old_trust * participant.collusion_penalty_multiplier());
            info!(
                pseudonym = %pseudonym,
                old_trust,
                new_trust,
                partners = penalty.connected_with.len(),
                "Collusion penalty applied"
            );
            updates.push(TrustUpdate {
                pseudonym: pseudonym.clone(),
                source: TrustUpdateSource::CollusionPenalty,
                old_trust,
                new_trust,
                reason: format!(
                    "Collusion penalty: correlated with {} participant(s) (x{:.2})",
                    penalty.connected_with.len(),
                    penalty.multiplier
                ),
                timestamp: now,
            });
        }

        updates
    }

    /// Whether a flagged participant's penalty may be lifted.
    ///
    /// True when none of their flagged edges is still active (see
    /// [`is_active`](Self::is_active)). Always false for participants who
    /// are not flagged.
    #[must_use]
    pub fn recovery_eligible(
        &self,
        participant: &Participant,
        edges: &[CollusionEdge],
        now: DateTime<Utc>,
    ) -> bool {
        participant.is_flagged_for_collusion()
            && !edges
                .iter()
                .any(|e| e.involves(&participant.pseudonym) && self.is_active(e, now))
    }
}
