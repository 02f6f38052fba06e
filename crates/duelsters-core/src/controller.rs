//! Action sources: who decides what a combatant does each round.
//!
//! The orchestrator asks an [`ActionSource`] for one [`ActionChoice`] per side
//! per round. A source may answer [`ActionChoice::Back`] to ask for the same
//! prompt again; the orchestrator then re-asks without touching state.
//!
//! # Computer Policy
//!
//! [`ComputerPolicy`] picks uniformly among the six directional actions. A
//! combatant that can heal, has heals left and is hurt adds `Heal` with weight
//! 1 (out of 7), or weight 2 (out of 8) below half health.

use std::collections::VecDeque;

use crate::action::Action;
use crate::combatant::Combatant;
use crate::dice::Dice;
use crate::error::Result;

/// Combined weight of the six directional actions, one each.
const DIRECTIONAL_WEIGHT: i32 = 6;

/// Answer from an action source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ActionChoice {
    /// Commit this action for the round.
    Commit(Action),
    /// Withdraw and ask again.
    Back,
}

/// Supplies actions for one side of a match.
pub trait ActionSource {
    /// Picks an action for `me` facing `opponent`.
    ///
    /// Player two is asked after player one has committed, so `opponent` may
    /// already carry a chosen action. Sources that model simultaneous play
    /// must not read it.
    ///
    /// # Errors
    ///
    /// Returns an error when the source itself fails, e.g. input closed.
    fn choose(
        &mut self,
        me: &Combatant,
        opponent: &Combatant,
        dice: &mut dyn Dice,
    ) -> Result<ActionChoice>;
}

/// Weighted random policy used by computer-controlled combatants.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputerPolicy;

impl ComputerPolicy {
    /// Creates the policy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Weight given to `Heal` for this combatant, 0 when it may not heal.
    #[must_use]
    pub fn heal_weight(me: &Combatant) -> i32 {
        let hurt = me.health() < me.max_health();
        if !me.archetype().can_heal() || !me.can_heal() || !hurt {
            0
        } else if me.health() * 2 < me.max_health() {
            2
        } else {
            1
        }
    }

    /// Draws one action for `me`.
    pub fn pick(me: &Combatant, dice: &mut dyn Dice) -> Action {
        let roll = dice.roll(0, DIRECTIONAL_WEIGHT + Self::heal_weight(me));
        usize::try_from(roll)
            .ok()
            .and_then(|index| Action::DIRECTIONAL.get(index).copied())
            .unwrap_or(Action::Heal)
    }
}

impl ActionSource for ComputerPolicy {
    fn choose(
        &mut self,
        me: &Combatant,
        _opponent: &Combatant,
        dice: &mut dyn Dice,
    ) -> Result<ActionChoice> {
        let action = Self::pick(me, dice);
        tracing::debug!(combatant = me.name(), %action, "computer chose");
        Ok(ActionChoice::Commit(action))
    }
}

/// Replays a fixed list of choices.
///
/// Once the script runs out every answer is the fallback action
/// (`GuardLeft` unless set with [`ScriptedSource::with_fallback`]).
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: VecDeque<ActionChoice>,
    fallback: Action,
}

impl ScriptedSource {
    /// Creates a source that answers `choices` in order.
    #[must_use]
    pub fn new(choices: impl IntoIterator<Item = ActionChoice>) -> Self {
        Self {
            script: choices.into_iter().collect(),
            fallback: Action::GuardLeft,
        }
    }

    /// Creates a source that commits `actions` in order.
    #[must_use]
    pub fn actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::new(actions.into_iter().map(ActionChoice::Commit))
    }

    /// Sets the action committed once the script is exhausted.
    #[must_use]
    pub fn with_fallback(mut self, action: Action) -> Self {
        self.fallback = action;
        self
    }

    /// Choices not yet answered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ActionSource for ScriptedSource {
    fn choose(
        &mut self,
        _me: &Combatant,
        _opponent: &Combatant,
        _dice: &mut dyn Dice,
    ) -> Result<ActionChoice> {
        Ok(self
            .script
            .pop_front()
            .unwrap_or(ActionChoice::Commit(self.fallback)))
    }
}
