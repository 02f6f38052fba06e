//! Test helper functions for setting up combatants and matches.
//!
//! This module provides factory functions and setup utilities that make
//! writing tests more ergonomic and consistent.

use crate::action::Action;
use crate::combatant::{ClassArchetype, Combatant, ControllerKind, Side, Stats};
use crate::config::DuelRules;
use crate::dice::{Dice, ScriptedDice};
use crate::simulation::{Match, RoundReport};

// =============================================================================
// Combatant Factories
// =============================================================================

/// Creates a human-controlled combatant with the archetype's preset stats.
pub fn combatant(name: &str, archetype: ClassArchetype) -> Combatant {
    Combatant::new(name, archetype, ControllerKind::Human, &DuelRules::default())
        .expect("test combatant names are never blank")
}

/// Creates a combatant with explicit stats. Healing follows `archetype`.
pub fn custom(name: &str, archetype: ClassArchetype, stats: Stats) -> Combatant {
    Combatant::with_stats(name, archetype, ControllerKind::Human, stats, &DuelRules::default())
        .expect("test combatant names are never blank")
}

/// Shorthand for [`Stats`].
pub fn stats(max_health: i32, attack: i32, defense: i32, speed: i32) -> Stats {
    Stats {
        max_health,
        attack,
        defense,
        speed,
    }
}

// =============================================================================
// Match Setup
// =============================================================================

/// Builds a match with scripted dice.
pub fn scripted_match(
    one: Combatant,
    two: Combatant,
    rolls: impl IntoIterator<Item = i32>,
) -> Match<ScriptedDice> {
    Match::with_dice(one, two, DuelRules::default(), ScriptedDice::new(rolls))
        .expect("default rules are valid")
}

/// Builds a seeded Balanced-vs-Support match.
pub fn seeded_match(seed: u64) -> Match {
    Match::seeded(
        seed,
        combatant("Ada", ClassArchetype::Balanced),
        combatant("Bo", ClassArchetype::Support),
        DuelRules::default(),
    )
    .expect("default rules are valid")
}

/// Commits both actions and resolves the round.
pub fn play<D: Dice>(duel: &mut Match<D>, one: Action, two: Action) -> RoundReport {
    duel.commit(Side::One, one).expect("player one commits");
    duel.commit(Side::Two, two).expect("player two commits");
    duel.resolve_round().expect("round resolves")
}
