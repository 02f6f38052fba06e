//! State hashing for determinism verification.
//!
//! Two matches built from the same seed, combatants and committed actions
//! must produce identical state hashes after every round. Replays and the
//! determinism suite compare these hashes instead of whole structs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::combatant::{Combatant, Side};
use crate::dice::Dice;
use crate::simulation::Match;

/// Compute a deterministic hash of match state.
///
/// This hash includes:
/// - Round counter and phase
/// - Both combatants: stats, health, chosen action, status flags, heals
///
/// The dice are not hashed; their effect shows up in the combatants.
#[must_use]
pub fn hash_match<D: Dice>(duel: &Match<D>) -> u64 {
    let mut hasher = DefaultHasher::new();

    duel.round().hash(&mut hasher);
    duel.phase().hash(&mut hasher);

    for side in [Side::One, Side::Two] {
        hash_combatant(duel.combatant(side), &mut hasher);
    }

    hasher.finish()
}

/// Compute a deterministic hash of a single combatant.
#[must_use]
pub fn hash_combatant_state(combatant: &Combatant) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_combatant(combatant, &mut hasher);
    hasher.finish()
}

fn hash_combatant<H: Hasher>(combatant: &Combatant, hasher: &mut H) {
    combatant.name().hash(hasher);
    combatant.archetype().hash(hasher);
    combatant.stats().hash(hasher);
    combatant.health().hash(hasher);
    combatant.chosen_action().hash(hasher);
    combatant.status().bits().hash(hasher);
    combatant.heals_remaining().hash(hasher);
}
