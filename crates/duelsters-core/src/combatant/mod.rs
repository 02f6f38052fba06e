//! Combatants and their per-round arithmetic.
//!
//! This module provides the core state types for a duel:
//! - [`Side`]: Which of the two duelists a value refers to
//! - [`Combatant`]: Stats, health, chosen action and status flags
//! - [`HealResult`]: What happened when a combatant tried to heal
//!
//! # Invariants
//!
//! - `health` is always within `[0, max_health]`; every write clamps.
//! - `heals_remaining` is always within `[0, heal_cap]`.
//! - `COUNTERING` is only set while a counter-attack is being applied.
//!
//! # Example
//!
//! ```
//! use duelsters_core::combatant::{ClassArchetype, Combatant, ControllerKind};
//! use duelsters_core::config::DuelRules;
//!
//! let rules = DuelRules::default();
//! let mut medic = Combatant::new("Patch", ClassArchetype::Support, ControllerKind::Human, &rules)?;
//!
//! medic.set_health(-40);
//! assert_eq!(medic.health(), 0);
//! medic.set_health(1_000);
//! assert_eq!(medic.health(), medic.max_health());
//! # Ok::<(), duelsters_core::error::DuelError>(())
//! ```

pub mod components;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use components::{ClassArchetype, ControllerKind, StatusFlags, Stats};

use crate::action::{Action, ActionKind};
use crate::config::DuelRules;
use crate::dice::Dice;
use crate::error::{DuelError, Result};

/// One of the two duelists.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Player One. Always acts first.
    One,
    /// Player Two.
    Two,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "Player One"),
            Self::Two => write!(f, "Player Two"),
        }
    }
}

/// Result of a heal attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealResult {
    /// Health was restored by `amount` (possibly 0 when already full).
    Restored {
        /// Health actually gained after capping at max health.
        amount: i32,
    },
    /// No heals were left. Nothing changed.
    Exhausted,
}

/// A duelist.
///
/// Name and archetype are fixed at creation. Everything else is mutated
/// round by round by the [`OutcomeProcessor`](crate::resolver::OutcomeProcessor).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combatant {
    name: String,
    archetype: ClassArchetype,
    controller: ControllerKind,
    stats: Stats,
    health: i32,
    chosen_action: Option<Action>,
    status: StatusFlags,
    heal_cap: u8,
    heals_remaining: u8,
    last_base_damage: i32,
}

impl Combatant {
    /// Creates a combatant with the archetype's preset stats.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::EmptyName`] if `name` is blank.
    pub fn new(
        name: impl Into<String>,
        archetype: ClassArchetype,
        controller: ControllerKind,
        rules: &DuelRules,
    ) -> Result<Self> {
        Self::with_stats(name, archetype, controller, archetype.stats(), rules)
    }

    /// Creates a combatant with explicit stats instead of the class preset.
    ///
    /// Healing permission still follows the archetype.
    ///
    /// # Errors
    ///
    /// - [`DuelError::EmptyName`] if `name` is blank
    /// - [`DuelError::InvalidStats`] if a stat is outside [`Stats::validate`]'s range
    pub fn with_stats(
        name: impl Into<String>,
        archetype: ClassArchetype,
        controller: ControllerKind,
        stats: Stats,
        rules: &DuelRules,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DuelError::EmptyName);
        }
        stats.validate()?;
        let heal_cap = if archetype.can_heal() { rules.heal_cap } else { 0 };
        Ok(Self {
            name,
            archetype,
            controller,
            stats,
            health: stats.max_health,
            chosen_action: None,
            status: StatusFlags::empty(),
            heal_cap,
            heals_remaining: heal_cap,
            last_base_damage: 0,
        })
    }

    // -------------------------------------------------------------------------
    // Read-only state
    // -------------------------------------------------------------------------

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class archetype.
    #[must_use]
    pub const fn archetype(&self) -> ClassArchetype {
        self.archetype
    }

    /// Who picks this combatant's actions.
    #[must_use]
    pub const fn controller(&self) -> ControllerKind {
        self.controller
    }

    /// Base stats.
    #[must_use]
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.stats.max_health
    }

    /// Attack stat.
    #[must_use]
    pub const fn attack(&self) -> i32 {
        self.stats.attack
    }

    /// Defense stat.
    #[must_use]
    pub const fn defense(&self) -> i32 {
        self.stats.defense
    }

    /// Speed stat.
    #[must_use]
    pub const fn speed(&self) -> i32 {
        self.stats.speed
    }

    /// Action committed for the current round, if any.
    #[must_use]
    pub const fn chosen_action(&self) -> Option<Action> {
        self.chosen_action
    }

    /// Current status flags.
    #[must_use]
    pub const fn status(&self) -> StatusFlags {
        self.status
    }

    /// Heals left this match.
    #[must_use]
    pub const fn heals_remaining(&self) -> u8 {
        self.heals_remaining
    }

    /// Heals granted per match (0 for archetypes that cannot heal).
    #[must_use]
    pub const fn heal_cap(&self) -> u8 {
        self.heal_cap
    }

    /// Base damage from the most recent [`Self::calculate_base_damage`].
    #[must_use]
    pub const fn last_base_damage(&self) -> i32 {
        self.last_base_damage
    }

    /// True while staggered.
    #[must_use]
    pub const fn is_staggered(&self) -> bool {
        self.status.contains(StatusFlags::STAGGERED)
    }

    /// True while a counter-attack is being applied.
    #[must_use]
    pub const fn is_countering(&self) -> bool {
        self.status.contains(StatusFlags::COUNTERING)
    }

    /// True after a successful heal, until the interrupt check consumes it.
    #[must_use]
    pub const fn is_healing(&self) -> bool {
        self.status.contains(StatusFlags::HEALING)
    }

    /// True when this round's action is a guard.
    #[must_use]
    pub fn is_guarding(&self) -> bool {
        self.chosen_action.is_some_and(Action::is_guard)
    }

    /// True when this round's action is an evade.
    #[must_use]
    pub fn is_evading(&self) -> bool {
        self.chosen_action.is_some_and(Action::is_evade)
    }

    /// True at zero health.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// True when a heal attempt would restore health.
    #[must_use]
    pub const fn can_heal(&self) -> bool {
        self.heals_remaining > 0
    }

    /// Actions this combatant may pick, in menu order.
    #[must_use]
    pub fn available_actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| action.kind() != ActionKind::Heal || self.archetype.can_heal())
            .collect()
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Sets health, clamped into `[0, max_health]`.
    pub fn set_health(&mut self, value: i32) {
        self.health = value.clamp(0, self.stats.max_health);
    }

    /// Subtracts `amount` from health and returns the health actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.set_health(before.saturating_sub(amount.max(0)));
        before - self.health
    }

    /// Sets remaining heals, clamped into `[0, heal_cap]`.
    pub fn set_heals_remaining(&mut self, value: u8) {
        self.heals_remaining = value.min(self.heal_cap);
    }

    /// Replaces the per-match heal allowance, keeping the number already spent.
    ///
    /// Archetypes that cannot heal keep a cap of 0.
    pub fn set_heal_cap(&mut self, cap: u8) {
        let spent = self.heal_cap - self.heals_remaining;
        self.heal_cap = if self.archetype.can_heal() { cap } else { 0 };
        self.heals_remaining = self.heal_cap.saturating_sub(spent);
    }

    /// Commits an action for the current round.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::HealNotAllowed`] if `action` is `Heal` and the
    /// archetype cannot heal.
    pub fn choose_action(&mut self, action: Action) -> Result<()> {
        if action == Action::Heal && !self.archetype.can_heal() {
            return Err(DuelError::HealNotAllowed {
                name: self.name.clone(),
                archetype: self.archetype,
            });
        }
        self.chosen_action = Some(action);
        Ok(())
    }

    /// Withdraws the committed action.
    pub fn clear_action(&mut self) {
        self.chosen_action = None;
    }

    /// Marks this combatant staggered.
    pub fn stagger(&mut self) {
        self.status.insert(StatusFlags::STAGGERED);
    }

    /// Removes stagger.
    pub fn clear_stagger(&mut self) {
        self.status.remove(StatusFlags::STAGGERED);
    }

    /// Ends a counter-attack.
    pub fn clear_countering(&mut self) {
        self.status.remove(StatusFlags::COUNTERING);
    }

    /// Consumes the healing flag.
    pub fn clear_healing(&mut self) {
        self.status.remove(StatusFlags::HEALING);
    }

    /// Clears the chosen action and the single-round flags. Stagger persists.
    pub fn reset_round(&mut self) {
        self.chosen_action = None;
        self.status.remove(StatusFlags::COUNTERING | StatusFlags::HEALING);
    }

    /// Restores full health and heals and clears all transient state.
    pub fn reset_for_rematch(&mut self) {
        self.health = self.stats.max_health;
        self.heals_remaining = self.heal_cap;
        self.chosen_action = None;
        self.status = StatusFlags::empty();
        self.last_base_damage = 0;
    }

    // -------------------------------------------------------------------------
    // Combat arithmetic
    // -------------------------------------------------------------------------

    /// `attack - defender.defense / 2`, floored at zero.
    ///
    /// The result is remembered as [`Self::last_base_damage`].
    pub fn calculate_base_damage(&mut self, defender: &Combatant) -> i32 {
        self.last_base_damage = (self.stats.attack - defender.stats.defense / 2).max(0);
        self.last_base_damage
    }

    /// Rolls for a critical hit against `defender`.
    ///
    /// The roll is `d(crit_die) + speed / 2`, plus the counter bonus while
    /// countering an unguarded defender. A staggered or evading defender is
    /// always critically hit. A counter into a raised guard never crits.
    pub fn is_critical(&self, defender: &Combatant, dice: &mut dyn Dice, rules: &DuelRules) -> bool {
        let mut roll = dice.roll(0, rules.crit_die) + self.stats.speed / 2;
        if self.is_countering() {
            if defender.is_guarding() {
                return false;
            }
            roll += rules.counter_crit_bonus;
        }
        roll >= rules.crit_threshold || defender.is_staggered() || defender.is_evading()
    }

    /// Critical bonus damage: `d[crit_bonus_min, crit_bonus_max) + attack / 2`.
    ///
    /// Ignores the defender's defense.
    pub fn calculate_critical_damage(&self, dice: &mut dyn Dice, rules: &DuelRules) -> i32 {
        dice.roll(rules.crit_bonus_min, rules.crit_bonus_max) + self.stats.attack / 2
    }

    /// Rolls `d(counter_die) + speed` against the counter threshold.
    ///
    /// Sets or clears `COUNTERING` to match the result.
    pub fn roll_counter(&mut self, dice: &mut dyn Dice, rules: &DuelRules) -> bool {
        let roll = dice.roll(0, rules.counter_die) + self.stats.speed;
        let success = roll >= rules.counter_threshold;
        self.status.set(StatusFlags::COUNTERING, success);
        success
    }

    /// Attempts to heal.
    ///
    /// With heals left: restores `d[heal_min, heal_max)` health capped at
    /// max health, spends one heal and sets `HEALING`. Without: changes
    /// nothing except clearing `HEALING`.
    pub fn heal(&mut self, dice: &mut dyn Dice, rules: &DuelRules) -> HealResult {
        if !self.can_heal() {
            self.status.remove(StatusFlags::HEALING);
            return HealResult::Exhausted;
        }
        let rolled = dice.roll(rules.heal_min, rules.heal_max);
        let amount = rolled.min(self.stats.max_health - self.health).max(0);
        self.set_health(self.health + amount);
        self.heals_remaining -= 1;
        self.status.insert(StatusFlags::HEALING);
        HealResult::Restored { amount }
    }
}
