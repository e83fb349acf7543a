//! Trust-weighted consensus.
//!
//! ```text
//! CS = sum(weight_i * direction_i) / sum(weight_i)
//! ```
//!
//! Because each weight is `sqrt(trust)`, a handful of high-trust voters can
//! hold their ground against a much larger crowd of newcomers without any
//! single voter dictating the outcome.
//!
//! A claim only feeds back into trust once it clears the stabilization gate:
//! enough votes, enough total weight, and enough time since submission. A
//! throwaway claim that is agreed on quickly and then withdrawn never gets
//! there, so it moves nobody's trust.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use truthchain_identity::Pseudonym;
use truthchain_reputation::numeric::{at_least, at_most, snap_to_zero, stable_sum};
use truthchain_reputation::{
    ClaimId, DayClock, Participant, TrustModel, TrustUpdate, TrustUpdateSource, Vote,
    VoteDirection,
};

use crate::claim::{Claim, ClaimStatus, Resolution};
use crate::config::{ConsensusConfig, VoteFeedbackConfig};
use crate::error::VoteRejection;

/// Outcome of resolving a claim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// The claim resolved.
    pub claim_id: ClaimId,
    /// Final credibility score.
    pub credibility_score: f64,
    /// Classification of the score.
    pub resolution: Resolution,
    /// Votes counted.
    pub total_votes: usize,
    /// Sum of vote weights.
    pub total_trust_weight: f64,
    /// Whether the stabilization gate passed.
    pub stabilized: bool,
    /// Trust updates owed to voters. Empty unless stabilized and decisive.
    pub trust_updates: Vec<TrustUpdate>,
}

/// Sum of vote weights.
#[must_use]
pub fn total_weight(votes: &[Vote]) -> f64 {
    stable_sum(votes.iter().map(|v| v.weight))
}

/// Weighted credibility score in `[-1, 1]`; zero with no votes or no weight.
///
/// Scores within [`SCORE_EPSILON`](truthchain_reputation::numeric::SCORE_EPSILON)
/// of zero are reported as exactly zero.
#[must_use]
pub fn credibility_score(votes: &[Vote]) -> f64 {
    if votes.is_empty() {
        return 0.0;
    }
    let weight = total_weight(votes);
    if !(weight > 0.0) {
        return 0.0;
    }
    let signed = stable_sum(votes.iter().map(Vote::signed_weight));
    snap_to_zero((signed / weight).clamp(-1.0, 1.0))
}

/// Whether all three stabilization gates hold at `now`.
#[must_use]
pub fn is_stabilized(
    claim: &Claim,
    votes: &[Vote],
    config: &ConsensusConfig,
    clock: &DayClock,
    now: DateTime<Utc>,
) -> bool {
    let enough_votes = votes.len() >= config.min_votes;
    let enough_weight = at_least(total_weight(votes), config.min_trust_weight);
    let window_complete =
        clock.elapsed_at_least(claim.created_at, now, config.stabilization_window_days);

    enough_votes && enough_weight && window_complete
}

/// Classify a credibility score.
#[must_use]
pub fn classify(score: f64, config: &ConsensusConfig) -> Resolution {
    if at_least(score, config.true_threshold) {
        Resolution::True
    } else if at_most(score, config.false_threshold) {
        Resolution::False
    } else {
        Resolution::Uncertain
    }
}

/// Check whether `participant` may vote on `claim` at `now`.
///
/// # Errors
///
/// The first failing check, in order: trust threshold, duplicate vote,
/// self vote, claim status, deadline.
pub fn validate_vote(
    participant: &Participant,
    claim: &Claim,
    existing_votes: &[Vote],
    model: &TrustModel,
    now: DateTime<Utc>,
) -> Result<(), VoteRejection> {
    if !model.can_participate(participant.trust()) {
        return Err(VoteRejection::InsufficientTrust {
            required: model.vote_threshold,
            actual: participant.trust(),
        });
    }
    if existing_votes
        .iter()
        .any(|v| v.voter == participant.pseudonym && v.claim_id == claim.id)
    {
        return Err(VoteRejection::DuplicateVote);
    }
    if claim.author == participant.pseudonym {
        return Err(VoteRejection::SelfVote);
    }
    if claim.status != ClaimStatus::Pending {
        return Err(VoteRejection::ClaimClosed {
            status: claim.status,
        });
    }
    if claim.deadline_passed(now) {
        return Err(VoteRejection::DeadlinePassed);
    }
    Ok(())
}

/// Resolve a claim against its votes.
///
/// Trust updates are computed (not applied) only when the claim is
/// stabilized and the resolution is decisive. Age for the time factor is
/// measured from submission to each vote, so early votes move trust more.
/// Votes from unknown participants are skipped.
#[must_use]
pub fn resolve(
    claim: &Claim,
    votes: &[Vote],
    participants: &HashMap<Pseudonym, Participant>,
    model: &TrustModel,
    config: &ConsensusConfig,
    clock: &DayClock,
    now: DateTime<Utc>,
) -> ConsensusResult {
    let stabilized = is_stabilized(claim, votes, config, clock, now);
    let credibility_score = credibility_score(votes);
    let resolution = classify(credibility_score, config);

    let mut trust_updates = Vec::new();
    if stabilized && resolution != Resolution::Uncertain {
        for vote in votes {
            let Some(participant) = participants.get(&vote.voter) else {
                continue;
            };
            let consensus_correct = resolution.agrees_with(vote.direction);
            let days = clock.days_between(claim.created_at, vote.timestamp);
            let change = model.update_for(participant, consensus_correct, days);

            trust_updates.push(TrustUpdate {
                pseudonym: vote.voter.clone(),
                source: TrustUpdateSource::Resolution(claim.id),
                old_trust: change.old_trust,
                new_trust: change.new_trust,
                reason: format!(
                    "{} vote on \"{}\" ({:+.4})",
                    if consensus_correct { "Correct" } else { "Incorrect" },
                    excerpt(&claim.content),
                    change.new_trust - change.old_trust
                ),
                timestamp: now,
            });
        }
    }

    debug!(
        claim = %claim.id,
        score = credibility_score,
        %resolution,
        stabilized,
        updates = trust_updates.len(),
        "Resolved claim"
    );

    ConsensusResult {
        claim_id: claim.id,
        credibility_score,
        resolution,
        total_votes: votes.len(),
        total_trust_weight: total_weight(votes),
        stabilized,
        trust_updates,
    }
}

fn excerpt(content: &str) -> String {
    const LEN: usize = 40;
    if content.chars().count() <= LEN {
        content.to_string()
    } else {
        let head: String = content.chars().take(LEN).collect();
        format!("{head}...")
    }
}

/// Preview trust nudge for a vote just added to `claim`.
///
/// `claim` must already include the new vote in its aggregates. Once the
/// claim has `min_votes` votes, agreeing with the running score earns
/// `gain * tf * min(w, cap)` and disagreeing costs `loss * tf * min(w, cap)`;
/// before that every vote earns the flat participation reward. Returns
/// `None` when disabled or when trust would not move.
#[must_use]
pub fn vote_feedback(
    participant: &Participant,
    claim: &Claim,
    direction: VoteDirection,
    model: &TrustModel,
    feedback: &VoteFeedbackConfig,
    clock: &DayClock,
    now: DateTime<Utc>,
) -> Option<TrustUpdate> {
    if !feedback.enabled {
        return None;
    }

    let old_trust = participant.trust();
    let (new_trust, reason) = if claim.total_votes >= feedback.min_votes {
        let aligned = (claim.credibility_score > 0.0 && direction == VoteDirection::True)
            || (claim.credibility_score < 0.0 && direction == VoteDirection::False);
        let time_factor = model.time_factor(clock.days_between(claim.created_at, now));
        let scale = time_factor * model.weight(old_trust).min(feedback.weight_cap);

        if aligned {
            let gain = feedback.gain * scale;
            (
                model.clamp(old_trust + gain),
                format!("+{gain:.4} (aligned with consensus, timeFactor={time_factor:.3})"),
            )
        } else {
            let loss = feedback.loss * scale;
            (
                model.clamp(old_trust - loss),
                format!("-{loss:.4} (against current consensus, timeFactor={time_factor:.3})"),
            )
        }
    } else {
        let reward = feedback.participation_reward;
        (
            model.clamp(old_trust + reward),
            format!("+{reward:.3} (early participation reward)"),
        )
    };

    if new_trust == old_trust {
        return None;
    }

    Some(TrustUpdate {
        pseudonym: participant.pseudonym.clone(),
        source: TrustUpdateSource::VoteFeedback(claim.id),
        old_trust,
        new_trust,
        reason,
        timestamp: now,
    })
}

/// Aggregate of one voting bloc.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlocSummary {
    /// Credibility score of the bloc alone.
    pub score: f64,
    /// Total weight.
    pub total_weight: f64,
    /// Number of votes.
    pub votes: usize,
}

/// Mob vs experts comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopularityReport {
    /// 50 newcomers at trust 0.2, all voting false.
    pub mob_only: BlocSummary,
    /// 10 experts at trust 5.0, all voting true.
    pub expert_only: BlocSummary,
    /// Both blocs together.
    pub combined: BlocSummary,
    /// Whether the mob alone drove the combined score to "false".
    pub mob_prevailed: bool,
}

/// Size of the newcomer bloc.
pub const MOB_SIZE: usize = 50;

/// Trust of each newcomer.
pub const MOB_TRUST: f64 = 0.2;

/// Size of the expert bloc.
pub const EXPERT_SIZE: usize = 10;

/// Trust of each expert.
pub const EXPERT_TRUST: f64 = 5.0;

/// Score the mob-vs-experts scenario with the default consensus thresholds.
///
/// `10 * sqrt(5.0)` and `50 * sqrt(0.2)` are equal, so the combined score
/// is exactly zero and classifies as uncertain: popularity alone does not
/// win. The combined score is snapped to `0.0` rather than reported as
/// positive; an eleventh expert is needed for the experts to carry the claim.
#[must_use]
pub fn popularity_vs_truth() -> PopularityReport {
    let claim_id = ClaimId::from_bytes([0; ClaimId::SIZE]);
    let now = Utc::now();
    let bloc = |label: &str, count: usize, trust: f64, direction: VoteDirection| -> Vec<Vote> {
        (0..count)
            .map(|i| {
                let voter = truthchain_identity::derive_seeded_pseudonym(&format!("{label}_{i}"));
                Vote::new(claim_id, voter, direction, trust, now)
            })
            .collect()
    };

    let mob = bloc("mob", MOB_SIZE, MOB_TRUST, VoteDirection::False);
    let experts = bloc("expert", EXPERT_SIZE, EXPERT_TRUST, VoteDirection::True);
    let all: Vec<Vote> = mob.iter().chain(experts.iter()).cloned().collect();

    let summarize = |votes: &[Vote]| BlocSummary {
        score: credibility_score(votes),
        total_weight: total_weight(votes),
        votes: votes.len(),
    };
    let combined = summarize(&all);
    let mob_prevailed = classify(combined.score, &ConsensusConfig::default()) == Resolution::False;

    PopularityReport {
        mob_only: summarize(&mob),
        expert_only: summarize(&experts),
        combined,
        mob_prevailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use truthchain_identity::{derive_seeded_pseudonym, IdentifierHash};

    fn participant(name: &str, trust: f64) -> Participant {
        Participant::new(
            derive_seeded_pseudonym(name),
            IdentifierHash::from_identifier(&format!("{name}@campus.edu")).unwrap(),
            trust,
            Utc::now(),
        )
    }

    fn claim_created(ago_days: i64) -> Claim {
        Claim::new(
            derive_seeded_pseudonym("author"),
            "Campus WiFi upgrade this weekend",
            "Technology",
            Vec::new(),
            Utc::now() - Duration::days(ago_days),
            Duration::days(30),
        )
    }

    fn votes_on(claim: &Claim, n: usize, trust: f64, direction: VoteDirection) -> Vec<Vote> {
        (0..n)
            .map(|i| {
                Vote::new(
                    claim.id,
                    derive_seeded_pseudonym(&format!("voter{i}")),
                    direction,
                    trust,
                    claim.created_at + Duration::hours(1),
                )
            })
            .collect()
    }

    #[test]
    fn test_credibility_empty_is_zero() {
        assert_eq!(credibility_score(&[]), 0.0);
    }

    #[test]
    fn test_credibility_unanimous() {
        let claim = claim_created(1);
        assert_eq!(credibility_score(&votes_on(&claim, 5, 1.0, VoteDirection::True)), 1.0);
        assert_eq!(credibility_score(&votes_on(&claim, 5, 1.0, VoteDirection::False)), -1.0);
    }

    #[test]
    fn test_credibility_weighted() {
        let claim = claim_created(1);
        let now = Utc::now();
        let votes = vec![
            Vote::new(claim.id, derive_seeded_pseudonym("a"), VoteDirection::True, 9.0, now),
            Vote::new(claim.id, derive_seeded_pseudonym("b"), VoteDirection::False, 1.0, now),
        ];
        // (3 - 1) / (3 + 1)
        assert!((credibility_score(&votes) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_nine_votes_not_stabilized() {
        let config = ConsensusConfig::default();
        let clock = DayClock::standard();
        let claim = claim_created(7);
        let now = Utc::now();

        // Nine votes at weight 1.0 clear the weight gate but not the count.
        let mut votes = votes_on(&claim, 9, 1.0, VoteDirection::True);
        assert!(total_weight(&votes) >= 2.0);
        assert!(!is_stabilized(&claim, &votes, &config, &clock, now));

        votes.push(Vote::new(
            claim.id,
            derive_seeded_pseudonym("tenth"),
            VoteDirection::True,
            1.0,
            now,
        ));
        assert!(is_stabilized(&claim, &votes, &config, &clock, now));
    }

    #[test]
    fn test_weight_gate() {
        let config = ConsensusConfig::default();
        let clock = DayClock::standard();
        let claim = claim_created(10);
        // 10 * sqrt(0.1) ~= 3.16
        let votes = votes_on(&claim, 10, 0.1, VoteDirection::True);
        assert!(is_stabilized(&claim, &votes, &config, &clock, Utc::now()));

        let strict = ConsensusConfig {
            min_trust_weight: 5.0,
            ..ConsensusConfig::default()
        };
        assert!(!is_stabilized(&claim, &votes, &strict, &clock, Utc::now()));
    }

    #[test]
    fn test_window_gate_exact() {
        let config = ConsensusConfig::default();
        let clock = DayClock::standard();
        let claim = claim_created(0);
        let votes = votes_on(&claim, 12, 1.0, VoteDirection::True);

        let just_short = claim.created_at + Duration::days(7) - Duration::milliseconds(1);
        assert!(!is_stabilized(&claim, &votes, &config, &clock, just_short));
        let exact = claim.created_at + Duration::days(7);
        assert!(is_stabilized(&claim, &votes, &config, &clock, exact));
    }

    #[test]
    fn test_classify_thresholds() {
        let config = ConsensusConfig::default();
        assert_eq!(classify(0.5, &config), Resolution::True);
        assert_eq!(classify(0.5 - 1e-12, &config), Resolution::True);
        assert_eq!(classify(0.49, &config), Resolution::Uncertain);
        assert_eq!(classify(-0.5, &config), Resolution::False);
        assert_eq!(classify(0.0, &config), Resolution::Uncertain);
    }

    #[test]
    fn test_validate_vote_order() {
        let model = TrustModel::default();
        let now = Utc::now();
        let claim = claim_created(1);

        // Low trust reported before anything else.
        let mut low = participant("low", 0.1);
        low.pseudonym = claim.author.clone();
        assert!(matches!(
            validate_vote(&low, &claim, &[], &model, now),
            Err(VoteRejection::InsufficientTrust { .. })
        ));

        let voter = participant("voter", 1.0);
        let existing = vec![Vote::new(claim.id, voter.pseudonym.clone(), VoteDirection::True, 1.0, now)];
        assert_eq!(
            validate_vote(&voter, &claim, &existing, &model, now),
            Err(VoteRejection::DuplicateVote)
        );

        let mut author = participant("author", 1.0);
        author.pseudonym = claim.author.clone();
        assert_eq!(
            validate_vote(&author, &claim, &[], &model, now),
            Err(VoteRejection::SelfVote)
        );

        let mut closed = claim.clone();
        closed.status = ClaimStatus::Deleted;
        assert_eq!(
            validate_vote(&voter, &closed, &[], &model, now),
            Err(VoteRejection::ClaimClosed {
                status: ClaimStatus::Deleted
            })
        );

        assert_eq!(
            validate_vote(&voter, &claim, &[], &model, claim.deadline + Duration::seconds(1)),
            Err(VoteRejection::DeadlinePassed)
        );
        assert!(validate_vote(&voter, &claim, &[], &model, now).is_ok());
    }

    #[test]
    fn test_resolve_unstabilized_has_no_updates() {
        let claim = claim_created(2);
        let votes = votes_on(&claim, 12, 1.0, VoteDirection::True);
        let participants: HashMap<_, _> = (0..12)
            .map(|i| {
                let p = participant(&format!("voter{i}"), 1.0);
                (p.pseudonym.clone(), p)
            })
            .collect();

        let result = resolve(
            &claim,
            &votes,
            &participants,
            &TrustModel::default(),
            &ConsensusConfig::default(),
            &DayClock::standard(),
            Utc::now(),
        );
        assert!(!result.stabilized);
        assert_eq!(result.resolution, Resolution::True);
        assert!(result.trust_updates.is_empty());
    }

    #[test]
    fn test_resolve_stabilized_rewards_majority() {
        let claim = claim_created(8);
        let mut votes = votes_on(&claim, 10, 1.0, VoteDirection::True);
        votes.push(Vote::new(
            claim.id,
            derive_seeded_pseudonym("dissent"),
            VoteDirection::False,
            1.0,
            claim.created_at,
        ));
        let mut participants: HashMap<_, _> = (0..10)
            .map(|i| {
                let p = Participant::new(
                    derive_seeded_pseudonym(&format!("voter{i}")),
                    IdentifierHash::from_identifier(&format!("voter{i}@campus.edu")).unwrap(),
                    1.0,
                    Utc::now(),
                );
                (p.pseudonym.clone(), p)
            })
            .collect();
        let dissent = participant("dissent", 1.0);
        participants.insert(dissent.pseudonym.clone(), dissent);

        let result = resolve(
            &claim,
            &votes,
            &participants,
            &TrustModel::default(),
            &ConsensusConfig::default(),
            &DayClock::standard(),
            Utc::now(),
        );
        assert!(result.stabilized);
        assert_eq!(result.resolution, Resolution::True);
        assert_eq!(result.trust_updates.len(), 11);

        let dissent_update = result
            .trust_updates
            .iter()
            .find(|u| u.pseudonym == derive_seeded_pseudonym("dissent"))
            .unwrap();
        assert!(dissent_update.delta() < 0.0);
        assert!(dissent_update.reason.starts_with("Incorrect"));
        assert!(result
            .trust_updates
            .iter()
            .filter(|u| u.pseudonym != dissent_update.pseudonym)
            .all(|u| u.delta() > 0.0));
    }

    #[test]
    fn test_resolve_uncertain_has_no_updates() {
        let claim = claim_created(8);
        let mut votes = votes_on(&claim, 5, 1.0, VoteDirection::True);
        votes.extend((0..5).map(|i| {
            Vote::new(
                claim.id,
                derive_seeded_pseudonym(&format!("no{i}")),
                VoteDirection::False,
                1.0,
                claim.created_at,
            )
        }));
        let result = resolve(
            &claim,
            &votes,
            &HashMap::new(),
            &TrustModel::default(),
            &ConsensusConfig::default(),
            &DayClock::standard(),
            Utc::now(),
        );
        assert!(result.stabilized);
        assert_eq!(result.resolution, Resolution::Uncertain);
        assert!(result.trust_updates.is_empty());
    }

    #[test]
    fn test_feedback_participation_reward() {
        let mut claim = claim_created(0);
        let voter = participant("early", 1.0);
        let votes = votes_on(&claim, 1, 1.0, VoteDirection::True);
        claim.recompute_aggregates(&votes);

        let update = vote_feedback(
            &voter,
            &claim,
            VoteDirection::True,
            &TrustModel::default(),
            &VoteFeedbackConfig::default(),
            &DayClock::standard(),
            claim.created_at,
        )
        .unwrap();
        assert!((update.delta() - 0.005).abs() < 1e-12);
        assert_eq!(update.source, TrustUpdateSource::VoteFeedback(claim.id));
    }

    #[test]
    fn test_feedback_aligned_and_against() {
        let mut claim = claim_created(0);
        let votes = votes_on(&claim, 3, 1.0, VoteDirection::True);
        claim.recompute_aggregates(&votes);
        let voter = participant("v", 1.0);
        let model = TrustModel::default();
        let feedback = VoteFeedbackConfig::default();
        let clock = DayClock::standard();

        let gain = vote_feedback(&voter, &claim, VoteDirection::True, &model, &feedback, &clock, claim.created_at)
            .unwrap();
        assert!((gain.delta() - 0.03).abs() < 1e-12);

        let loss = vote_feedback(&voter, &claim, VoteDirection::False, &model, &feedback, &clock, claim.created_at)
            .unwrap();
        assert!((loss.delta() + 0.045).abs() < 1e-12);
    }

    #[test]
    fn test_feedback_weight_capped() {
        let mut claim = claim_created(0);
        claim.recompute_aggregates(&votes_on(&claim, 4, 1.0, VoteDirection::True));
        let expert = participant("expert", 9.0);

        let update = vote_feedback(
            &expert,
            &claim,
            VoteDirection::True,
            &TrustModel::default(),
            &VoteFeedbackConfig::default(),
            &DayClock::standard(),
            claim.created_at,
        )
        .unwrap();
        assert!((update.delta() - 0.03 * 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_feedback_disabled() {
        let claim = claim_created(0);
        let config = VoteFeedbackConfig {
            enabled: false,
            ..VoteFeedbackConfig::default()
        };
        assert!(vote_feedback(
            &participant("v", 1.0),
            &claim,
            VoteDirection::True,
            &TrustModel::default(),
            &config,
            &DayClock::standard(),
            Utc::now(),
        )
        .is_none());
    }

    #[test]
    fn test_popularity_does_not_win() {
        let report = popularity_vs_truth();
        assert_eq!(report.mob_only.score, -1.0);
        assert_eq!(report.expert_only.score, 1.0);
        assert_eq!(report.combined.votes, 60);
        assert!(report.combined.score > -0.5);
        assert!(report.combined.score.abs() < 1e-9);
        assert!(!report.mob_prevailed);
    }
}
