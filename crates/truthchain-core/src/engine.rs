//! The engine state container.
//!
//! [`TruthEngine`] owns every participant, claim, vote and audit record.
//! Mutating operations take `&mut self`, so a host that shares the engine
//! behind a `Mutex` or `RwLock` gets per-claim and per-participant
//! serialization, an atomic registration check-and-insert, and collusion
//! runs that see a consistent vote snapshot. The engine performs no I/O and
//! spawns nothing; decay and collusion detection run only when called.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use truthchain_identity::{seeded_key_material, IdentityError, IdentityRegistry, Pseudonym};
use truthchain_reputation::decay::apply_inactivity_decay;
use truthchain_reputation::numeric::stable_sum;
use truthchain_reputation::{
    trust_percentile, ClaimId, CollusionDetector, CollusionEdge, CollusionPenalty, DayClock,
    Participant, TrustModel, TrustUpdate, TrustUpdateSource, Vote, VoteDirection,
};

use crate::claim::{Claim, ClaimStatus, Resolution};
use crate::config::EngineConfig;
use crate::consensus::{self, classify, is_stabilized, validate_vote, ConsensusResult};
use crate::error::{CoreError, Result};
use crate::metrics::SystemMetrics;

/// A recorded vote and its immediate effects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoteReceipt {
    /// The vote as stored.
    pub vote: Vote,
    /// Claim credibility after the vote.
    pub credibility_score: f64,
    /// Voter trust after any feedback nudge.
    pub voter_trust: f64,
    /// Feedback nudge applied, if any.
    pub trust_change: Option<TrustUpdate>,
}

/// Outcome of one collusion detection run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollusionReport {
    /// Pairs that shared at least one claim.
    pub total_edges: usize,
    /// Pairs meeting the collusion rule.
    pub flagged_edges: usize,
    /// Penalty per participant on a flagged edge.
    pub penalties: BTreeMap<Pseudonym, CollusionPenalty>,
    /// Trust reductions applied to newly flagged participants.
    pub trust_updates: Vec<TrustUpdate>,
}

impl CollusionReport {
    /// Participants penalized by this run.
    #[must_use]
    pub fn affected_participants(&self) -> usize {
        self.penalties.len()
    }
}

/// Trust-weighted consensus engine.
#[derive(Clone, Debug)]
pub struct TruthEngine {
    config: EngineConfig,
    clock: DayClock,
    registry: IdentityRegistry,
    participants: HashMap<Pseudonym, Participant>,
    claims: HashMap<ClaimId, Claim>,
    claim_order: Vec<ClaimId>,
    votes: HashMap<ClaimId, Vec<Vote>>,
    trust_history: Vec<TrustUpdate>,
    previews: HashMap<ClaimId, Vec<TrustUpdate>>,
    detector: CollusionDetector,
    attacks_blocked: u64,
}

impl Default for TruthEngine {
    fn default() -> Self {
        Self::with_valid_config(EngineConfig::default())
    }
}

impl TruthEngine {
    /// Create an engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Config` if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: EngineConfig) -> Self {
        let clock = config.clock();
        let detector = CollusionDetector::new(config.collusion.clone(), clock);
        Self {
            config,
            clock,
            registry: IdentityRegistry::new(),
            participants: HashMap::new(),
            claims: HashMap::new(),
            claim_order: Vec::new(),
            votes: HashMap::new(),
            trust_history: Vec::new(),
            previews: HashMap::new(),
            detector,
            attacks_blocked: 0,
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Trust model in use.
    #[must_use]
    pub fn model(&self) -> &TrustModel {
        &self.config.trust.model
    }

    /// Claim-day clock in use.
    #[must_use]
    pub fn clock(&self) -> &DayClock {
        &self.clock
    }

    // ===== Participants =====

    /// Register an identifier, creating a participant at initial trust.
    ///
    /// # Errors
    ///
    /// `CoreError::DuplicateIdentity` if the identifier was seen before.
    pub fn register(&mut self, identifier: &str) -> Result<Participant> {
        self.register_at(identifier, Utc::now())
    }

    /// [`register`](Self::register) at an explicit time.
    ///
    /// # Errors
    ///
    /// `CoreError::DuplicateIdentity` if the identifier was seen before.
    pub fn register_at(&mut self, identifier: &str, now: DateTime<Utc>) -> Result<Participant> {
        let registration = self.registry.register(identifier);
        self.finish_registration(registration, now)
    }

    /// Register with a pseudonym derived deterministically from `seed`.
    ///
    /// # Errors
    ///
    /// `CoreError::DuplicateIdentity` if the identifier was seen before, or
    /// `CoreError::Identity` if the seed's pseudonym is already taken.
    pub fn register_seeded_at(
        &mut self,
        identifier: &str,
        seed: &str,
        now: DateTime<Utc>,
    ) -> Result<Participant> {
        let registration = self
            .registry
            .register_with_seed(identifier, &seeded_key_material(seed));
        self.finish_registration(registration, now)
    }

    fn finish_registration(
        &mut self,
        registration: truthchain_identity::Result<truthchain_identity::Registration>,
        now: DateTime<Utc>,
    ) -> Result<Participant> {
        let registration = match registration {
            Ok(registration) => registration,
            Err(IdentityError::DuplicateIdentity) => {
                self.attacks_blocked += 1;
                debug!(attacks_blocked = self.attacks_blocked, "Sybil registration counted");
                return Err(CoreError::DuplicateIdentity);
            }
            Err(err) => return Err(err.into()),
        };

        let participant = Participant::new(
            registration.pseudonym,
            registration.identifier_hash,
            self.config.trust.model.trust_initial,
            now,
        );
        info!(pseudonym = %participant.pseudonym, "Participant registered");
        self.participants
            .insert(participant.pseudonym.clone(), participant.clone());
        Ok(participant)
    }

    /// Look up a participant.
    #[must_use]
    pub fn participant(&self, pseudonym: &Pseudonym) -> Option<&Participant> {
        self.participants.get(pseudonym)
    }

    /// All participants, in no particular order.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    /// Number of registered participants.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Whether an identifier has been registered.
    #[must_use]
    pub fn is_registered(&self, identifier: &str) -> bool {
        self.registry.is_registered(identifier)
    }

    /// Percentile rank of a participant's trust among everyone.
    ///
    /// # Errors
    ///
    /// `CoreError::ParticipantNotFound` for unknown pseudonyms.
    pub fn trust_percentile(&self, pseudonym: &Pseudonym) -> Result<u32> {
        let participant = self
            .participants
            .get(pseudonym)
            .ok_or_else(|| CoreError::ParticipantNotFound(pseudonym.clone()))?;
        let all: Vec<f64> = self.participants.values().map(Participant::trust).collect();
        Ok(trust_percentile(participant.trust(), &all))
    }

    // ===== Claims =====

    /// Submit a claim.
    ///
    /// # Errors
    ///
    /// - `CoreError::ParticipantNotFound` for an unknown author
    /// - `CoreError::InsufficientTrust` below the posting threshold
    pub fn submit_claim(
        &mut self,
        author: &Pseudonym,
        content: &str,
        category: &str,
        tags: Vec<String>,
    ) -> Result<Claim> {
        self.submit_claim_at(author, content, category, tags, Utc::now())
    }

    /// [`submit_claim`](Self::submit_claim) at an explicit time.
    ///
    /// # Errors
    ///
    /// - `CoreError::ParticipantNotFound` for an unknown author
    /// - `CoreError::InsufficientTrust` below the posting threshold
    pub fn submit_claim_at(
        &mut self,
        author: &Pseudonym,
        content: &str,
        category: &str,
        tags: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Claim> {
        let participant = self
            .participants
            .get_mut(author)
            .ok_or_else(|| CoreError::ParticipantNotFound(author.clone()))?;

        let required = self.config.consensus.posting_threshold;
        if participant.trust() < required {
            warn!(pseudonym = %author, trust = participant.trust(), "Claim rejected: insufficient trust");
            return Err(CoreError::InsufficientTrust {
                required,
                actual: participant.trust(),
            });
        }

        let claim = Claim::new(
            author.clone(),
            content,
            category,
            tags,
            now,
            self.clock.span(self.config.consensus.voting_window_days),
        );
        participant.touch(now);

        info!(claim = %claim.id, author = %author, category = %claim.category, "Claim submitted");
        self.claim_order.push(claim.id);
        self.votes.insert(claim.id, Vec::new());
        self.claims.insert(claim.id, claim.clone());
        Ok(claim)
    }

    /// Look up a claim.
    #[must_use]
    pub fn claim(&self, id: &ClaimId) -> Option<&Claim> {
        self.claims.get(id)
    }

    /// All claims in submission order.
    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.claim_order.iter().filter_map(|id| self.claims.get(id))
    }

    /// Votes on a claim, in casting order.
    #[must_use]
    pub fn votes_for(&self, id: &ClaimId) -> &[Vote] {
        self.votes.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Snapshot of every vote, grouped by claim in submission order.
    #[must_use]
    pub fn all_votes(&self) -> Vec<Vote> {
        self.claim_order
            .iter()
            .flat_map(|id| self.votes_for(id).iter().cloned())
            .collect()
    }

    /// Withdraw a pending claim. Its votes never affect trust, and any vote
    /// previews it produced are withdrawn.
    ///
    /// # Errors
    ///
    /// - `CoreError::ClaimNotFound` for an unknown claim
    /// - `CoreError::NotAuthor` if `author` did not submit it
    /// - `CoreError::ClaimClosed` if it is no longer pending
    pub fn delete_claim(&mut self, author: &Pseudonym, id: &ClaimId) -> Result<()> {
        let claim = self
            .claims
            .get_mut(id)
            .ok_or(CoreError::ClaimNotFound(*id))?;
        if &claim.author != author {
            return Err(CoreError::NotAuthor);
        }
        if claim.status != ClaimStatus::Pending {
            return Err(CoreError::ClaimClosed {
                status: claim.status,
            });
        }

        claim.status = ClaimStatus::Deleted;
        info!(claim = %id, votes = claim.total_votes, "Claim deleted before stabilization");
        self.revert_previews(id, Utc::now());
        Ok(())
    }

    /// Expire every pending claim past its deadline that cannot stabilize.
    pub fn expire_claims(&mut self) -> Vec<ClaimId> {
        self.expire_claims_at(Utc::now())
    }

    /// [`expire_claims`](Self::expire_claims) at an explicit time.
    pub fn expire_claims_at(&mut self, now: DateTime<Utc>) -> Vec<ClaimId> {
        let mut expired = Vec::new();
        for id in &self.claim_order {
            let Some(claim) = self.claims.get_mut(id) else {
                continue;
            };
            if !claim.is_pending() || !claim.deadline_passed(now) {
                continue;
            }
            let votes = self.votes.get(id).map(Vec::as_slice).unwrap_or(&[]);
            if is_stabilized(claim, votes, &self.config.consensus, &self.clock, now) {
                continue;
            }
            claim.status = ClaimStatus::Expired;
            info!(claim = %id, votes = claim.total_votes, "Claim expired");
            expired.push(*id);
        }
        for id in &expired {
            self.revert_previews(id, now);
        }
        expired
    }

    // ===== Voting =====

    /// Cast a vote.
    ///
    /// # Errors
    ///
    /// - `CoreError::ParticipantNotFound` / `CoreError::ClaimNotFound`
    /// - any vote rejection (`InsufficientTrust`, `DuplicateVote`,
    ///   `SelfVote`, `ClaimClosed`, `DeadlinePassed`), with no state change
    ///   beyond the blocked-attempt counter
    pub fn cast_vote(
        &mut self,
        voter: &Pseudonym,
        claim_id: &ClaimId,
        direction: VoteDirection,
    ) -> Result<VoteReceipt> {
        self.cast_vote_at(voter, claim_id, direction, Utc::now())
    }

    /// [`cast_vote`](Self::cast_vote) at an explicit time.
    ///
    /// # Errors
    ///
    /// See [`cast_vote`](Self::cast_vote).
    pub fn cast_vote_at(
        &mut self,
        voter: &Pseudonym,
        claim_id: &ClaimId,
        direction: VoteDirection,
        now: DateTime<Utc>,
    ) -> Result<VoteReceipt> {
        let model = &self.config.trust.model;
        let participant = self
            .participants
            .get_mut(voter)
            .ok_or_else(|| CoreError::ParticipantNotFound(voter.clone()))?;
        let claim = self
            .claims
            .get_mut(claim_id)
            .ok_or(CoreError::ClaimNotFound(*claim_id))?;
        let votes = self.votes.entry(*claim_id).or_default();

        if let Err(rejection) = validate_vote(participant, claim, votes, model, now) {
            self.attacks_blocked += 1;
            warn!(pseudonym = %voter, claim = %claim_id, %rejection, "Vote rejected");
            return Err(rejection.into());
        }

        let trust = participant.trust();
        let vote = Vote::with_weight(*claim_id, voter.clone(), direction, trust, model.weight(trust), now);
        votes.push(vote.clone());
        claim.recompute_aggregates(votes);

        participant.total_votes += 1;
        participant.touch(now);

        let trust_change = consensus::vote_feedback(
            participant,
            claim,
            direction,
            model,
            &self.config.consensus.vote_feedback,
            &self.clock,
            now,
        );
        if let Some(update) = &trust_change {
            model.set_trust(participant, update.new_trust);
            self.trust_history.push(update.clone());
            self.previews
                .entry(*claim_id)
                .or_default()
                .push(update.clone());
        }

        debug!(
            pseudonym = %voter,
            claim = %claim_id,
            weight = vote.weight,
            score = claim.credibility_score,
            "Vote recorded"
        );

        Ok(VoteReceipt {
            vote,
            credibility_score: claim.credibility_score,
            voter_trust: participant.trust(),
            trust_change,
        })
    }

    // ===== Resolution =====

    /// Resolve a claim now.
    ///
    /// # Errors
    ///
    /// `CoreError::ClaimNotFound` for an unknown claim.
    pub fn resolve(&mut self, claim_id: &ClaimId) -> Result<ConsensusResult> {
        self.resolve_at(claim_id, Utc::now())
    }

    /// Resolve a claim at `now`.
    ///
    /// A pending claim that passes the stabilization gate becomes
    /// `stabilized` and its trust updates are applied. A pending claim that
    /// fails the gate after its deadline becomes `expired`. Either way the
    /// claim's vote previews are withdrawn first, so resolution updates
    /// start from pre-vote trust. Terminal claims report their stored
    /// outcome with no trust updates.
    ///
    /// # Errors
    ///
    /// `CoreError::ClaimNotFound` for an unknown claim.
    pub fn resolve_at(&mut self, claim_id: &ClaimId, now: DateTime<Utc>) -> Result<ConsensusResult> {
        let closing = {
            let claim = self
                .claims
                .get(claim_id)
                .ok_or(CoreError::ClaimNotFound(*claim_id))?;
            claim.is_pending()
                && (claim.deadline_passed(now)
                    || is_stabilized(
                        claim,
                        self.votes_for(claim_id),
                        &self.config.consensus,
                        &self.clock,
                        now,
                    ))
        };
        if closing {
            self.revert_previews(claim_id, now);
        }

        let claim = self
            .claims
            .get_mut(claim_id)
            .ok_or(CoreError::ClaimNotFound(*claim_id))?;
        let votes = self.votes.get(claim_id).map(Vec::as_slice).unwrap_or(&[]);

        if claim.status.is_terminal() {
            return Ok(ConsensusResult {
                claim_id: *claim_id,
                credibility_score: claim.credibility_score,
                resolution: claim
                    .resolution
                    .unwrap_or_else(|| classify(claim.credibility_score, &self.config.consensus)),
                total_votes: claim.total_votes,
                total_trust_weight: claim.total_trust_weight,
                stabilized: claim.status == ClaimStatus::Stabilized,
                trust_updates: Vec::new(),
            });
        }

        let model = &self.config.trust.model;
        let result = consensus::resolve(
            claim,
            votes,
            &self.participants,
            model,
            &self.config.consensus,
            &self.clock,
            now,
        );

        if result.stabilized {
            claim.status = ClaimStatus::Stabilized;
            claim.resolution = Some(result.resolution);
            claim.credibility_score = result.credibility_score;

            let directions: HashMap<&Pseudonym, VoteDirection> =
                votes.iter().map(|v| (&v.voter, v.direction)).collect();
            for update in &result.trust_updates {
                let Some(participant) = self.participants.get_mut(&update.pseudonym) else {
                    continue;
                };
                model.set_trust(participant, update.new_trust);
                match directions.get(&update.pseudonym) {
                    Some(&direction) if result.resolution.agrees_with(direction) => {
                        participant.correct_votes += 1;
                    }
                    Some(_) => participant.incorrect_votes += 1,
                    None => {}
                }
                self.trust_history.push(update.clone());
            }

            info!(
                claim = %claim_id,
                resolution = %result.resolution,
                score = result.credibility_score,
                updates = result.trust_updates.len(),
                "Claim stabilized"
            );
        } else if claim.deadline_passed(now) {
            claim.status = ClaimStatus::Expired;
            info!(claim = %claim_id, votes = claim.total_votes, "Claim expired unresolved");
        }

        Ok(result)
    }

    /// Withdraw the vote previews recorded for a claim that just closed.
    ///
    /// A voter whose trust has not moved since the preview gets their exact
    /// pre-vote trust back; otherwise the preview delta is subtracted.
    fn revert_previews(&mut self, claim_id: &ClaimId, now: DateTime<Utc>) {
        let Some(previews) = self.previews.remove(claim_id) else {
            return;
        };
        let model = &self.config.trust.model;

        for preview in previews.iter().rev() {
            let Some(participant) = self.participants.get_mut(&preview.pseudonym) else {
                continue;
            };
            let old_trust = participant.trust();
            let target = if old_trust == preview.new_trust {
                preview.old_trust
            } else {
                old_trust - preview.delta()
            };
            let new_trust = model.set_trust(participant, target);
            if new_trust == old_trust {
                continue;
            }
            self.trust_history.push(TrustUpdate {
                pseudonym: preview.pseudonym.clone(),
                source: TrustUpdateSource::FeedbackReverted(*claim_id),
                old_trust,
                new_trust,
                reason: format!("{:+.4} (vote preview withdrawn)", new_trust - old_trust),
                timestamp: now,
            });
        }
        debug!(claim = %claim_id, previews = previews.len(), "Vote previews withdrawn");
    }

    // ===== Collusion =====

    /// Rebuild the correlation graph and penalize flagged participants.
    pub fn run_collusion_detection(&mut self) -> CollusionReport {
        self.run_collusion_detection_at(Utc::now())
    }

    /// [`run_collusion_detection`](Self::run_collusion_detection) at an
    /// explicit time.
    pub fn run_collusion_detection_at(&mut self, now: DateTime<Utc>) -> CollusionReport {
        let snapshot = self.all_votes();
        self.detector.rebuild(&snapshot);

        let penalties = self.detector.detect_clusters(self.detector.edges(), now);
        let trust_updates = self.detector.apply_penalties(
            &mut self.participants,
            &penalties,
            &self.config.trust.model,
            now,
        );
        self.trust_history.extend(trust_updates.iter().cloned());

        let report = CollusionReport {
            total_edges: self.detector.edges().len(),
            flagged_edges: self.detector.flagged_edges().count(),
            penalties,
            trust_updates,
        };
        info!(
            edges = report.total_edges,
            flagged = report.flagged_edges,
            affected = report.affected_participants(),
            "Collusion detection complete"
        );
        report
    }

    /// Edges from the last detection run.
    #[must_use]
    pub fn collusion_edges(&self) -> &[CollusionEdge] {
        self.detector.edges()
    }

    /// Lift the penalty from every flagged participant eligible for recovery.
    pub fn run_collusion_recovery(&mut self) -> Vec<Pseudonym> {
        self.run_collusion_recovery_at(Utc::now())
    }

    /// [`run_collusion_recovery`](Self::run_collusion_recovery) at an
    /// explicit time. Returns the recovered pseudonyms, sorted.
    pub fn run_collusion_recovery_at(&mut self, now: DateTime<Utc>) -> Vec<Pseudonym> {
        let mut recovered: Vec<Pseudonym> = self
            .participants
            .values()
            .filter(|p| self.detector.recovery_eligible(p, self.detector.edges(), now))
            .map(|p| p.pseudonym.clone())
            .collect();
        recovered.sort();

        for pseudonym in &recovered {
            if let Some(participant) = self.participants.get_mut(pseudonym) {
                participant.clear_collusion_flag();
                info!(pseudonym = %pseudonym, "Collusion penalty lifted");
            }
        }
        recovered
    }

    // ===== Decay =====

    /// Apply inactivity decay to one participant now.
    ///
    /// # Errors
    ///
    /// `CoreError::ParticipantNotFound` for unknown pseudonyms.
    pub fn decay_inactive(&mut self, pseudonym: &Pseudonym) -> Result<Option<TrustUpdate>> {
        self.decay_inactive_at(pseudonym, Utc::now())
    }

    /// Apply inactivity decay to one participant at `now`.
    ///
    /// # Errors
    ///
    /// `CoreError::ParticipantNotFound` for unknown pseudonyms.
    pub fn decay_inactive_at(
        &mut self,
        pseudonym: &Pseudonym,
        now: DateTime<Utc>,
    ) -> Result<Option<TrustUpdate>> {
        let participant = self
            .participants
            .get_mut(pseudonym)
            .ok_or_else(|| CoreError::ParticipantNotFound(pseudonym.clone()))?;

        let update = apply_inactivity_decay(
            participant,
            &self.config.trust.model,
            &self.config.trust.inactivity,
            &self.clock,
            now,
        );
        if let Some(update) = &update {
            debug!(pseudonym = %pseudonym, old = update.old_trust, new = update.new_trust, "Inactivity decay");
            self.trust_history.push(update.clone());
        }
        Ok(update)
    }

    /// Apply inactivity decay to every participant at `now`.
    pub fn decay_all_inactive_at(&mut self, now: DateTime<Utc>) -> Vec<TrustUpdate> {
        let mut pseudonyms: Vec<Pseudonym> = self.participants.keys().cloned().collect();
        pseudonyms.sort();

        pseudonyms
            .iter()
            .filter_map(|p| self.decay_inactive_at(p, now).ok().flatten())
            .collect()
    }

    // ===== Reporting =====

    /// Every applied trust mutation, oldest first.
    #[must_use]
    pub fn trust_history(&self) -> &[TrustUpdate] {
        &self.trust_history
    }

    /// Trust mutations for one participant, oldest first.
    pub fn trust_history_for<'a>(
        &'a self,
        pseudonym: &'a Pseudonym,
    ) -> impl Iterator<Item = &'a TrustUpdate> + 'a {
        self.trust_history
            .iter()
            .filter(move |u| &u.pseudonym == pseudonym)
    }

    /// Rejected registrations and votes so far.
    #[must_use]
    pub fn attacks_blocked(&self) -> u64 {
        self.attacks_blocked
    }

    /// System-wide counters.
    #[must_use]
    pub fn metrics(&self) -> SystemMetrics {
        let count = |r: Resolution| {
            self.claims
                .values()
                .filter(|c| c.resolution == Some(r))
                .count()
        };
        let total_trust = stable_sum(self.participants.values().map(Participant::trust));
        let total_participants = self.participants.len();

        SystemMetrics {
            total_participants,
            total_claims: self.claims.len(),
            total_votes: self.votes.values().map(Vec::len).sum(),
            average_trust: if total_participants > 0 {
                total_trust / total_participants as f64
            } else {
                0.0
            },
            collusion_flags_active: self
                .participants
                .values()
                .filter(|p| p.is_flagged_for_collusion())
                .count(),
            claims_resolved_true: count(Resolution::True),
            claims_resolved_false: count(Resolution::False),
            claims_uncertain: count(Resolution::Uncertain),
            attacks_blocked: self.attacks_blocked,
        }
    }

    /// Overwrite a participant's trust, clamped to the model bounds, without
    /// an audit record. Used for seeding and imports.
    ///
    /// # Errors
    ///
    /// `CoreError::ParticipantNotFound` for unknown pseudonyms.
    pub fn seed_trust(&mut self, pseudonym: &Pseudonym, trust: f64) -> Result<f64> {
        let participant = self
            .participants
            .get_mut(pseudonym)
            .ok_or_else(|| CoreError::ParticipantNotFound(pseudonym.clone()))?;
        Ok(self.config.trust.model.set_trust(participant, trust))
    }

    pub(crate) fn participant_mut(&mut self, pseudonym: &Pseudonym) -> Option<&mut Participant> {
        self.participants.get_mut(pseudonym)
    }

    pub(crate) fn insert_seeded_claim(&mut self, mut claim: Claim, votes: Vec<Vote>) {
        claim.recompute_aggregates(&votes);
        self.claim_order.push(claim.id);
        self.votes.insert(claim.id, votes);
        self.claims.insert(claim.id, claim);
    }
}
