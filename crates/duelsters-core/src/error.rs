//! Error types for the duel engine.
//!
//! Only caller mistakes surface here. Combat "failures" such as a missed
//! counter or an empty medical bag are ordinary round results, not errors.

use thiserror::Error;

use crate::combatant::{ClassArchetype, Side};
use crate::simulation::RoundPhase;

/// Result type alias using [`DuelError`].
pub type Result<T> = std::result::Result<T, DuelError>;

/// Top-level error type for the duel engine.
#[derive(Debug, Error)]
pub enum DuelError {
    /// A combatant was created with an empty (or whitespace-only) name.
    #[error("combatant name must not be empty")]
    EmptyName,

    /// A combatant whose archetype cannot heal tried to commit `Heal`.
    #[error("{name} is a {archetype} and cannot heal")]
    HealNotAllowed {
        /// Name of the offending combatant.
        name: String,
        /// Archetype of the offending combatant.
        archetype: ClassArchetype,
    },

    /// An action was committed for the wrong side or in the wrong phase.
    #[error("out of turn: round is in phase {expected:?}, got an action for {actual:?}")]
    OutOfTurn {
        /// Phase the round was in.
        expected: RoundPhase,
        /// Side that tried to act.
        actual: Side,
    },

    /// Resolution was requested before both sides committed an action.
    #[error("cannot resolve round: actions are still pending")]
    ActionsPending,

    /// The match already has a result; no further rounds can be played.
    #[error("the match is over")]
    MatchOver,

    /// Custom stats fell outside the supported range.
    #[error("invalid stats: {0}")]
    InvalidStats(String),

    /// Rules failed validation.
    #[error("invalid rules: {0}")]
    InvalidRules(String),

    /// Rules file could not be parsed.
    #[error("failed to parse rules: {0}")]
    RulesParse(#[from] serde_json::Error),

    /// Rules file could not be read.
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),
}
