//! Resolution of a round's two actions into an [`Outcome`] and its effects.
//!
//! Resolution happens in two phases:
//! 1. [`resolve`] classifies the action pair. It is pure and total.
//! 2. [`OutcomeProcessor`] applies the classified outcome to both combatants,
//!    rolling dice and recording [`CombatEvent`]s.
//!
//! # Invariants
//!
//! - `resolve` never reads or writes combatant state; the caller passes
//!   each side's ability to heal.
//! - Direction only matters relative to the opponent's direction. Heal has no
//!   direction and is never compared.
//! - Swapping the two sides mirrors the outcome:
//!   `resolve(b, a, hb, ha) == resolve(a, b, ha, hb).mirrored()`.

mod combat;
mod event;

pub use combat::OutcomeProcessor;
pub use event::{AttackReport, CombatEvent, EventLog};

use crate::action::{Action, ActionKind, Facing};
use crate::outcome::Outcome;

/// Classifies the actions chosen by Player One and Player Two.
///
/// `can_heal_one` / `can_heal_two` say whether each side still has heals
/// left; they only matter when that side chose [`Action::Heal`].
///
/// # Example
///
/// ```
/// use duelsters_core::action::Action;
/// use duelsters_core::outcome::Outcome;
/// use duelsters_core::resolver::resolve;
///
/// assert_eq!(resolve(Action::AttackLeft, Action::AttackLeft, false, false), Outcome::SwordClash);
/// assert_eq!(resolve(Action::AttackLeft, Action::GuardLeft, false, false), Outcome::P1Blocked);
/// assert_eq!(resolve(Action::Heal, Action::AttackRight, false, false), Outcome::P1HealFailedUnderAttack);
/// ```
#[must_use]
pub fn resolve(one: Action, two: Action, can_heal_one: bool, can_heal_two: bool) -> Outcome {
    use ActionKind::{Attack, Evade, Guard, Heal};

    // Only consulted by directional pairs, where it is always `Some`.
    let same = one.facing(two) == Some(Facing::Same);

    let outcome = match (one.kind(), two.kind()) {
        (Attack, Attack) if same => Outcome::SwordClash,
        (Attack, Attack) => Outcome::BothHit,

        (Attack, Guard) if same => Outcome::P1Blocked,
        (Attack, Guard) => Outcome::P2GuardBroken,
        (Guard, Attack) if same => Outcome::P2Blocked,
        (Guard, Attack) => Outcome::P1GuardBroken,

        (Guard, Guard) => Outcome::BothBlock,

        (Attack, Evade) if same => Outcome::P2Evade,
        (Attack, Evade) => Outcome::P2EvadedInto,
        (Evade, Attack) if same => Outcome::P1Evade,
        (Evade, Attack) => Outcome::P1EvadedInto,

        (Guard, Evade) if same => Outcome::P2EvadeGuard,
        (Guard, Evade) => Outcome::P1GuardEvadeMiss,
        (Evade, Guard) if same => Outcome::P1EvadeGuard,
        (Evade, Guard) => Outcome::P2GuardEvadeMiss,

        (Evade, Evade) => Outcome::DoubleDodge,

        (Heal, Guard | Evade) if can_heal_one => Outcome::P1Heal,
        (Heal, Guard | Evade) => Outcome::P1HealFailed,
        (Guard | Evade, Heal) if can_heal_two => Outcome::P2Heal,
        (Guard | Evade, Heal) => Outcome::P2HealFailed,

        (Heal, Attack) if can_heal_one => Outcome::P1HealUnderAttack,
        (Heal, Attack) => Outcome::P1HealFailedUnderAttack,
        (Attack, Heal) if can_heal_two => Outcome::P2HealUnderAttack,
        (Attack, Heal) => Outcome::P2HealFailedUnderAttack,

        (Heal, Heal) => match (can_heal_one, can_heal_two) {
            (true, true) => Outcome::DoubleHeal,
            (true, false) => Outcome::P2HealFailedP1Heal,
            (false, true) => Outcome::P1HealFailedP2Heal,
            (false, false) => Outcome::DoubleHealFailed,
        },
    };

    tracing::debug!(?one, ?two, ?outcome, "resolved action pair");
    outcome
}
