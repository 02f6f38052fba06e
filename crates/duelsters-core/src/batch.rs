//! Batch match runner for balance testing.
//!
//! Runs many computer-vs-computer matches in parallel using rayon, one per
//! seed, and folds the results into win rates and round-length statistics.
//! Every match is fully determined by its seed, so a batch is reproducible
//! regardless of how rayon schedules it.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::combatant::{ClassArchetype, Combatant, ControllerKind, Side};
use crate::config::DuelRules;
use crate::controller::ComputerPolicy;
use crate::dice;
use crate::error::Result;
use crate::hash::hash_match;
use crate::simulation::{Match, MatchResult};
use crate::stats::ScalarStats;

/// Configuration for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of matches to run
    pub matches: u32,
    /// Seed of the first match; match `i` uses `seed_start + i`
    pub seed_start: u64,
    /// Rounds after which a match is abandoned as unfinished
    pub max_rounds: u32,
    /// Archetype for Player One, random per match when `None`
    pub one: Option<ClassArchetype>,
    /// Archetype for Player Two, random per match when `None`
    pub two: Option<ClassArchetype>,
    /// Rules every match is played with
    pub rules: DuelRules,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            matches: 100,
            seed_start: 0,
            max_rounds: 500,
            one: None,
            two: None,
            rules: DuelRules::default(),
        }
    }
}

impl BatchConfig {
    /// Creates a config for `matches` matches with default settings.
    #[must_use]
    pub fn new(matches: u32) -> Self {
        Self {
            matches,
            ..Self::default()
        }
    }

    /// Sets the first seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Fixes the archetypes; `None` keeps that side random.
    #[must_use]
    pub fn with_archetypes(mut self, one: Option<ClassArchetype>, two: Option<ClassArchetype>) -> Self {
        self.one = one;
        self.two = two;
        self
    }

    /// Sets the round limit.
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Sets the rules.
    #[must_use]
    pub fn with_rules(mut self, rules: DuelRules) -> Self {
        self.rules = rules;
        self
    }
}

/// Result of one match in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Seed the match was played with
    pub seed: u64,
    /// Archetypes of Player One and Player Two
    pub archetypes: [ClassArchetype; 2],
    /// `None` when the round limit was hit
    pub result: Option<MatchResult>,
    /// Rounds resolved
    pub rounds: u32,
    /// Final health of Player One and Player Two
    pub health: [i32; 2],
    /// Final state hash
    pub state_hash: u64,
}

/// Aggregate results of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Matches played
    pub matches: u32,
    /// Matches won by Player One
    pub wins_one: u32,
    /// Matches won by Player Two
    pub wins_two: u32,
    /// Matches where both fell in the same round
    pub draws: u32,
    /// Matches abandoned at the round limit
    pub unfinished: u32,
    /// Round count of finished matches
    pub rounds: ScalarStats,
}

impl BatchSummary {
    /// Summarises a set of match records.
    #[must_use]
    pub fn from_records(records: &[MatchRecord]) -> Self {
        let mut summary = Self {
            matches: 0,
            wins_one: 0,
            wins_two: 0,
            draws: 0,
            unfinished: 0,
            rounds: ScalarStats::default(),
        };
        for record in records {
            summary.matches += 1;
            match record.result {
                Some(MatchResult::Winner(Side::One)) => summary.wins_one += 1,
                Some(MatchResult::Winner(Side::Two)) => summary.wins_two += 1,
                Some(MatchResult::Draw) => summary.draws += 1,
                None => summary.unfinished += 1,
            }
            if record.result.is_some() {
                summary.rounds.push(f64::from(record.rounds));
            }
        }
        summary
    }

    /// Fraction of matches won by `side`, 0 for an empty batch.
    #[must_use]
    pub fn win_rate(&self, side: Side) -> f64 {
        if self.matches == 0 {
            return 0.0;
        }
        let wins = match side {
            Side::One => self.wins_one,
            Side::Two => self.wins_two,
        };
        f64::from(wins) / f64::from(self.matches)
    }
}

/// Everything produced by [`run_batch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used
    pub config: BatchConfig,
    /// Per-match records in seed order
    pub records: Vec<MatchRecord>,
    /// Aggregates over `records`
    pub summary: BatchSummary,
    /// Wall-clock duration
    pub duration_seconds: f64,
}

/// Plays one computer-vs-computer match from `seed`.
///
/// Random archetypes are drawn from the match's own dice before the first
/// round, so they are part of what the seed determines.
///
/// # Errors
///
/// Returns an error if a combatant cannot be created or a round fails.
pub fn run_single_match(config: &BatchConfig, seed: u64) -> Result<MatchRecord> {
    let mut rng = dice::seeded(seed);
    let one_class = config.one.unwrap_or_else(|| ClassArchetype::random(&mut rng));
    let two_class = config.two.unwrap_or_else(|| ClassArchetype::random(&mut rng));

    let one = Combatant::new("Player One", one_class, ControllerKind::Computer, &config.rules)?;
    let two = Combatant::new("Player Two", two_class, ControllerKind::Computer, &config.rules)?;
    let mut duel = Match::with_dice(one, two, config.rules, rng)?;

    let summary = duel.play_to_completion(
        &mut ComputerPolicy::new(),
        &mut ComputerPolicy::new(),
        config.max_rounds,
    )?;
    if summary.result.is_none() {
        warn!(seed, rounds = summary.rounds, "match hit the round limit without a winner");
    }

    Ok(MatchRecord {
        seed,
        archetypes: [one_class, two_class],
        result: summary.result,
        rounds: summary.rounds,
        health: summary.health,
        state_hash: hash_match(&duel),
    })
}

/// Runs a batch of matches in parallel.
///
/// # Errors
///
/// Returns [`DuelError::InvalidRules`](crate::error::DuelError::InvalidRules)
/// if the rules fail validation, or the first error of any match.
pub fn run_batch(config: BatchConfig) -> Result<BatchResults> {
    config.rules.validate()?;
    let start = Instant::now();

    info!(
        matches = config.matches,
        seed_start = config.seed_start,
        "starting batch run"
    );

    let results: Vec<Result<MatchRecord>> = (0..config.matches)
        .into_par_iter()
        .map(|i| {
            let seed = config.seed_start.wrapping_add(u64::from(i));
            let record = run_single_match(&config, seed)?;
            debug!(seed, result = ?record.result, rounds = record.rounds, "match finished");
            Ok(record)
        })
        .collect();
    let records = results.into_iter().collect::<Result<Vec<_>>>()?;

    let summary = BatchSummary::from_records(&records);
    let duration_seconds = start.elapsed().as_secs_f64();

    info!(
        matches = summary.matches,
        wins_one = summary.wins_one,
        wins_two = summary.wins_two,
        draws = summary.draws,
        unfinished = summary.unfinished,
        duration_seconds,
        "batch complete"
    );

    Ok(BatchResults {
        config,
        records,
        summary,
        duration_seconds,
    })
}

/// Replays `seed` `runs` times and checks every run ends in the same state.
///
/// # Errors
///
/// Same as [`run_single_match`].
pub fn verify_determinism(config: &BatchConfig, seed: u64, runs: u32) -> Result<bool> {
    let first = run_single_match(config, seed)?;
    for _ in 1..runs {
        if run_single_match(config, seed)? != first {
            return Ok(false);
        }
    }
    Ok(true)
}
