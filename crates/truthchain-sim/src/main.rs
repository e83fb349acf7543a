//! TruthChain simulation driver
//!
//! Runs the closed-form analyses (incentive payoffs, attack economics,
//! popularity vs truth) and a seeded end-to-end demo against the
//! consensus engine, printing plain text or JSON.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use truthchain_core::{
    payoffs, popularity_vs_truth, simulate_attack, CollusionReport, ConsensusResult,
    EngineConfig, SystemMetrics, TruthEngine, VoteDirection,
};

/// TruthChain simulator
///
/// Explores how trust-weighted consensus resists Sybil mobs and collusion.
#[derive(Parser, Debug)]
#[command(name = "truthchain-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TRUTHCHAIN_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Log format (plain, json)
    #[arg(long, env = "TRUTHCHAIN_LOG_FORMAT", default_value = "plain", global = true)]
    log_format: String,

    /// Report output format
    #[arg(long, value_enum, env = "TRUTHCHAIN_OUTPUT", default_value_t = Output::Text, global = true)]
    format: Output,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expected trust for honest and dishonest strategies
    Payoffs {
        /// Number of voting rounds
        #[arg(short, long, default_value = "100")]
        rounds: u32,
    },

    /// Whether a bloc of attacker identities can flip an honest consensus
    Attack {
        /// Attacker identities
        #[arg(long, default_value = "50")]
        attackers: u32,

        /// Trust of each attacker identity
        #[arg(long, default_value = "0.2")]
        attacker_trust: f64,

        /// Honest participants
        #[arg(long, default_value = "10")]
        honest: u32,

        /// Trust of each honest participant
        #[arg(long, default_value = "5.0")]
        honest_trust: f64,
    },

    /// 50 newcomers voting false against 10 experts voting true
    Popularity,

    /// Seed the demo dataset, vote, resolve and detect collusion
    Demo {
        /// Minimum votes for stabilization
        #[arg(long, env = "TRUTHCHAIN_MIN_VOTES", default_value = "10")]
        min_votes: usize,

        /// Use 24-hour claim-days instead of one-minute demo days
        #[arg(long, default_value = "false")]
        real_days: bool,
    },
}

fn setup_logging(log_level: &str, log_format: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    match log_format.to_lowercase().as_str() {
        "json" => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set subscriber")?;
        }
        _ => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set subscriber")?;
        }
    }

    Ok(())
}

fn emit<T: Serialize>(output: Output, report: &T, text: impl FnOnce(&T)) -> Result<()> {
    match output {
        Output::Json => {
            let json = serde_json::to_string_pretty(report).context("Failed to encode report")?;
            println!("{json}");
        }
        Output::Text => text(report),
    }
    Ok(())
}

/// Outcome of the seeded demo run.
#[derive(Debug, Serialize)]
struct DemoReport {
    claims: Vec<ClaimOutcome>,
    collusion: CollusionReport,
    metrics: SystemMetrics,
}

#[derive(Debug, Serialize)]
struct ClaimOutcome {
    content: String,
    category: String,
    status: String,
    result: ConsensusResult,
}

fn run_demo(min_votes: usize, real_days: bool) -> Result<DemoReport> {
    let base = if real_days {
        EngineConfig::builder()
    } else {
        EngineConfig::builder().with_demo_days()
    };
    let config = base
        .with_stabilization(min_votes, 2.0, 7)
        .build_validated()
        .context("Invalid demo configuration")?;

    let now = Utc::now();
    let mut engine = TruthEngine::new(config).context("Failed to create engine")?;
    let seed = engine.seed_demo(now).context("Failed to seed demo data")?;
    info!(
        participants = seed.participants.len(),
        claims = seed.claims.len(),
        "Demo seeded"
    );

    // The first four participants hold back from seeding; they follow the
    // running score.
    for claim_id in &seed.claims {
        for voter in &seed.participants[..4] {
            let leaning = engine
                .claim(claim_id)
                .map(|c| c.credibility_score)
                .unwrap_or_default();
            let direction = if leaning < 0.0 {
                VoteDirection::False
            } else {
                VoteDirection::True
            };
            if let Err(err) = engine.cast_vote_at(voter, claim_id, direction, now) {
                info!(error = %err, "Demo vote skipped");
            }
        }
    }

    let mut claims = Vec::with_capacity(seed.claims.len());
    for claim_id in &seed.claims {
        let result = engine
            .resolve_at(claim_id, now)
            .context("Failed to resolve demo claim")?;
        let claim = engine
            .claim(claim_id)
            .context("Demo claim disappeared")?;
        claims.push(ClaimOutcome {
            content: claim.content.clone(),
            category: claim.category.clone(),
            status: claim.status.to_string(),
            result,
        });
    }

    let collusion = engine.run_collusion_detection_at(now);
    Ok(DemoReport {
        claims,
        collusion,
        metrics: engine.metrics(),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level, &args.log_format)?;
    info!(version = env!("CARGO_PKG_VERSION"), command = ?args.command, "Starting truthchain-sim");

    match args.command {
        Command::Payoffs { rounds } => emit(args.format, &payoffs(rounds), |r| {
            println!("Incentive analysis over {} rounds", r.rounds);
            println!(
                "  honest:    {:+.4} per round, {:+.2} total",
                r.honest.per_round, r.honest.total
            );
            println!(
                "  dishonest: {:+.4} per round, {:+.2} total",
                r.dishonest.per_round, r.dishonest.total
            );
            println!("  honesty advantage: {:.1}x", r.ratio);
            println!("  dominant strategy: {:?}", r.dominant);
        }),

        Command::Attack {
            attackers,
            attacker_trust,
            honest,
            honest_trust,
        } => emit(
            args.format,
            &simulate_attack(attackers, attacker_trust, honest, honest_trust),
            |r| {
                println!("Attacker weight: {:.3}", r.attacker_weight);
                println!("Honest weight:   {:.3}", r.honest_weight);
                println!("Credibility:     {:+.4}", r.credibility_score);
                println!(
                    "Cost ${:.0}, detection {:.0}%, expected trust loss {:.3}",
                    r.economics.total_attack_cost,
                    r.economics.detection_probability * 100.0,
                    r.economics.expected_trust_loss
                );
                println!("{}", r.conclusion());
            },
        ),

        Command::Popularity => emit(args.format, &popularity_vs_truth(), |r| {
            println!(
                "Mob only:    {:+.4} ({} votes, weight {:.3})",
                r.mob_only.score, r.mob_only.votes, r.mob_only.total_weight
            );
            println!(
                "Expert only: {:+.4} ({} votes, weight {:.3})",
                r.expert_only.score, r.expert_only.votes, r.expert_only.total_weight
            );
            println!(
                "Combined:    {:+.4} ({} votes, weight {:.3})",
                r.combined.score, r.combined.votes, r.combined.total_weight
            );
            if r.mob_prevailed {
                println!("The mob carried the claim.");
            } else {
                println!("Popularity alone did not decide the outcome.");
            }
        }),

        Command::Demo {
            min_votes,
            real_days,
        } => {
            let report = run_demo(min_votes, real_days)?;
            emit(args.format, &report, |r| {
                for claim in &r.claims {
                    println!(
                        "[{}] {} ({}): score {:+.3}, {} votes, {}",
                        claim.status,
                        claim.content,
                        claim.category,
                        claim.result.credibility_score,
                        claim.result.total_votes,
                        claim.result.resolution
                    );
                }
                println!(
                    "Collusion: {} edges, {} flagged, {} penalized",
                    r.collusion.total_edges,
                    r.collusion.flagged_edges,
                    r.collusion.affected_participants()
                );
                let m = &r.metrics;
                println!(
                    "Participants {}, claims {}, votes {}, average trust {:.3}",
                    m.total_participants, m.total_claims, m.total_votes, m.average_trust
                );
                println!(
                    "Resolved true {}, false {}, uncertain {}; flags active {}; attacks blocked {}",
                    m.claims_resolved_true,
                    m.claims_resolved_false,
                    m.claims_uncertain,
                    m.collusion_flags_active,
                    m.attacks_blocked
                );
            })
        }
    }
}
