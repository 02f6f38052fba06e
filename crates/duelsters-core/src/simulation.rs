//! Match orchestration with the per-round state machine.
//!
//! The `Match` struct owns both combatants and the shared dice and sequences
//! each round:
//!
//! 1. **AWAIT P1**: Player One commits an action
//! 2. **AWAIT P2**: Player Two commits an action
//! 3. **RESOLVE**: classify the pair, apply the outcome, record events
//! 4. **ADVANCE**: clear per-round state, bump the round counter, check for a
//!    winner
//!
//! Steps 3 and 4 both happen inside [`Match::resolve_round`], so the only
//! phases a caller can observe are the ones listed in [`RoundPhase`].
//!
//! # Determinism
//!
//! All randomness flows through the match's single [`Dice`]. A match built
//! with [`Match::seeded`] replays identically for the same seed and the same
//! committed actions.
//!
//! # Example
//!
//! ```
//! use duelsters_core::action::Action;
//! use duelsters_core::combatant::{ClassArchetype, Combatant, ControllerKind, Side};
//! use duelsters_core::config::DuelRules;
//! use duelsters_core::outcome::Outcome;
//! use duelsters_core::simulation::Match;
//!
//! let rules = DuelRules::default();
//! let one = Combatant::new("Ada", ClassArchetype::Balanced, ControllerKind::Human, &rules)?;
//! let two = Combatant::new("Bo", ClassArchetype::Tank, ControllerKind::Computer, &rules)?;
//! let mut duel = Match::seeded(42, one, two, rules)?;
//!
//! duel.commit(Side::One, Action::AttackLeft)?;
//! duel.commit(Side::Two, Action::AttackLeft)?;
//! let report = duel.resolve_round()?;
//!
//! assert_eq!(report.outcome, Outcome::SwordClash);
//! assert_eq!(duel.round(), 2);
//! # Ok::<(), duelsters_core::error::DuelError>(())
//! ```

use std::fmt;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::combatant::{Combatant, Side};
use crate::config::DuelRules;
use crate::controller::{ActionChoice, ActionSource};
use crate::dice::{self, Dice};
use crate::error::{DuelError, Result};
use crate::outcome::Outcome;
use crate::resolver::{resolve, CombatEvent, EventLog, OutcomeProcessor};

// =============================================================================
// Round state
// =============================================================================

/// Where the current round stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for Player One to commit.
    AwaitingP1Action,
    /// Player One committed; waiting for Player Two.
    AwaitingP2Action,
    /// Both committed; ready for [`Match::resolve_round`].
    Resolving,
    /// A combatant fell. No more rounds until [`Match::rematch`].
    Finished,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingP1Action => write!(f, "awaiting Player One"),
            Self::AwaitingP2Action => write!(f, "awaiting Player Two"),
            Self::Resolving => write!(f, "resolving"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// How a match ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    /// Exactly one side is still standing.
    Winner(Side),
    /// Both sides fell in the same round.
    Draw,
}

/// Everything that happened in one resolved round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Round number that was resolved (first round is 1).
    pub round: u32,
    /// Actions committed by Player One and Player Two.
    pub actions: [Action; 2],
    /// Classification of the action pair.
    pub outcome: Outcome,
    /// Mechanical steps in the order they were applied.
    pub events: Vec<CombatEvent>,
    /// Health of Player One and Player Two after the round.
    pub health: [i32; 2],
    /// Set when this round ended the match.
    pub result: Option<MatchResult>,
}

/// Final state of a match run by [`Match::play_to_completion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// `None` if the round limit was reached first.
    pub result: Option<MatchResult>,
    /// Rounds resolved.
    pub rounds: u32,
    /// Health of Player One and Player Two at the end.
    pub health: [i32; 2],
}

// =============================================================================
// Match
// =============================================================================

/// A duel between two combatants.
///
/// Generic over the dice so tests can script rolls; production matches use
/// the seeded [`ChaCha8Rng`] default.
#[derive(Debug, Clone)]
pub struct Match<D: Dice = ChaCha8Rng> {
    one: Combatant,
    two: Combatant,
    /// Round currently being played, starting at 1.
    round: u32,
    phase: RoundPhase,
    dice: D,
    processor: OutcomeProcessor,
    log: EventLog,
}

impl Match<ChaCha8Rng> {
    /// Creates a match whose dice are seeded from `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`Match::with_dice`].
    pub fn seeded(seed: u64, one: Combatant, two: Combatant, rules: DuelRules) -> Result<Self> {
        Self::with_dice(one, two, rules, dice::seeded(seed))
    }
}

impl<D: Dice> Match<D> {
    /// Creates a match at round 1 using the given dice.
    ///
    /// Both combatants take their heal allowance from `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidRules`] if `rules` fail
    /// [`DuelRules::validate`]. Nothing is rolled in that case.
    pub fn with_dice(one: Combatant, two: Combatant, rules: DuelRules, dice: D) -> Result<Self> {
        let mut duel = Self {
            one,
            two,
            round: 1,
            phase: RoundPhase::AwaitingP1Action,
            dice,
            processor: OutcomeProcessor::new(rules)?,
            log: EventLog::new(),
        };
        for combatant in [&mut duel.one, &mut duel.two] {
            combatant.clear_action();
            combatant.set_heal_cap(rules.heal_cap);
        }
        if duel.result().is_some() {
            duel.phase = RoundPhase::Finished;
        }
        Ok(duel)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The combatant on `side`.
    #[must_use]
    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::One => &self.one,
            Side::Two => &self.two,
        }
    }

    /// Mutable access to the combatant on `side`.
    ///
    /// Intended for setup. Changing a combatant mid-round bypasses the
    /// phase checks.
    #[must_use]
    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::One => &mut self.one,
            Side::Two => &mut self.two,
        }
    }

    /// Round currently being played. Starts at 1.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Rounds fully resolved so far.
    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.round - 1
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Rules in effect.
    #[must_use]
    pub fn rules(&self) -> &DuelRules {
        self.processor.rules()
    }

    /// The shared dice.
    #[must_use]
    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    /// True once a combatant has fallen.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == RoundPhase::Finished
    }

    /// Winner or draw, `None` while both are standing.
    #[must_use]
    pub fn result(&self) -> Option<MatchResult> {
        match (self.one.is_defeated(), self.two.is_defeated()) {
            (true, true) => Some(MatchResult::Draw),
            (false, true) => Some(MatchResult::Winner(Side::One)),
            (true, false) => Some(MatchResult::Winner(Side::Two)),
            (false, false) => None,
        }
    }

    // -------------------------------------------------------------------------
    // Round flow
    // -------------------------------------------------------------------------

    /// Commits `action` for `side`.
    ///
    /// Player One must commit first, then Player Two.
    ///
    /// # Errors
    ///
    /// - [`DuelError::MatchOver`] once the match has a result
    /// - [`DuelError::OutOfTurn`] if it is not `side`'s turn to commit
    /// - [`DuelError::HealNotAllowed`] if `side` cannot heal
    pub fn commit(&mut self, side: Side, action: Action) -> Result<()> {
        let next = match (self.phase, side) {
            (RoundPhase::Finished, _) => return Err(DuelError::MatchOver),
            (RoundPhase::AwaitingP1Action, Side::One) => RoundPhase::AwaitingP2Action,
            (RoundPhase::AwaitingP2Action, Side::Two) => RoundPhase::Resolving,
            (expected, actual) => return Err(DuelError::OutOfTurn { expected, actual }),
        };
        self.combatant_mut(side).choose_action(action)?;
        tracing::trace!(round = self.round, %side, %action, "action committed");
        self.phase = next;
        Ok(())
    }

    /// Withdraws the most recent commit and returns the phase stepped back to.
    ///
    /// Does nothing while waiting for Player One.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::MatchOver`] once the match has a result.
    pub fn back(&mut self) -> Result<RoundPhase> {
        self.phase = match self.phase {
            RoundPhase::Finished => return Err(DuelError::MatchOver),
            RoundPhase::AwaitingP1Action => RoundPhase::AwaitingP1Action,
            RoundPhase::AwaitingP2Action => {
                self.one.clear_action();
                RoundPhase::AwaitingP1Action
            }
            RoundPhase::Resolving => {
                self.two.clear_action();
                RoundPhase::AwaitingP2Action
            }
        };
        Ok(self.phase)
    }

    /// Resolves the round once both sides have committed.
    ///
    /// Classifies the pair, applies the outcome, clears both combatants'
    /// per-round state and advances the round counter.
    ///
    /// # Errors
    ///
    /// - [`DuelError::MatchOver`] once the match has a result
    /// - [`DuelError::ActionsPending`] if a side has not committed
    pub fn resolve_round(&mut self) -> Result<RoundReport> {
        match self.phase {
            RoundPhase::Finished => return Err(DuelError::MatchOver),
            RoundPhase::Resolving => {}
            RoundPhase::AwaitingP1Action | RoundPhase::AwaitingP2Action => {
                return Err(DuelError::ActionsPending)
            }
        }
        let (Some(first), Some(second)) = (self.one.chosen_action(), self.two.chosen_action())
        else {
            return Err(DuelError::ActionsPending);
        };

        let outcome = resolve(first, second, self.one.can_heal(), self.two.can_heal());
        self.processor
            .process(outcome, &mut self.one, &mut self.two, &mut self.dice, &mut self.log);

        self.one.reset_round();
        self.two.reset_round();
        let result = self.result();
        let report = RoundReport {
            round: self.round,
            actions: [first, second],
            outcome,
            events: self.log.take(),
            health: [self.one.health(), self.two.health()],
            result,
        };
        self.round += 1;

        match result {
            Some(result) => {
                self.phase = RoundPhase::Finished;
                tracing::info!(
                    ?result,
                    rounds = report.round,
                    one = self.one.name(),
                    two = self.two.name(),
                    "match over"
                );
            }
            None => self.phase = RoundPhase::AwaitingP1Action,
        }
        Ok(report)
    }

    /// Plays one full round, asking each source for its side's action.
    ///
    /// A source answering [`ActionChoice::Back`] is asked again. Sides that
    /// already committed this round are not asked.
    ///
    /// # Errors
    ///
    /// Propagates source failures and the errors of [`Self::commit`] and
    /// [`Self::resolve_round`].
    pub fn play_round(
        &mut self,
        one: &mut dyn ActionSource,
        two: &mut dyn ActionSource,
    ) -> Result<RoundReport> {
        if self.phase == RoundPhase::AwaitingP1Action {
            let action = self.ask(Side::One, one)?;
            self.commit(Side::One, action)?;
        }
        if self.phase == RoundPhase::AwaitingP2Action {
            let action = self.ask(Side::Two, two)?;
            self.commit(Side::Two, action)?;
        }
        self.resolve_round()
    }

    /// Plays rounds until the match ends or `max_rounds` more have been played.
    ///
    /// # Errors
    ///
    /// Same as [`Self::play_round`].
    pub fn play_to_completion(
        &mut self,
        one: &mut dyn ActionSource,
        two: &mut dyn ActionSource,
        max_rounds: u32,
    ) -> Result<MatchSummary> {
        let mut played = 0;
        while !self.is_over() && played < max_rounds {
            self.play_round(one, two)?;
            played += 1;
        }
        Ok(self.summary())
    }

    /// Snapshot of the match as it stands.
    #[must_use]
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            result: self.result(),
            rounds: self.rounds_played(),
            health: [self.one.health(), self.two.health()],
        }
    }

    /// Restores both combatants and starts again from round 1.
    ///
    /// Names, archetypes and stats are kept; the dice keep rolling from
    /// where they are.
    pub fn rematch(&mut self) {
        self.one.reset_for_rematch();
        self.two.reset_for_rematch();
        self.round = 1;
        self.phase = RoundPhase::AwaitingP1Action;
        self.log.take();
        tracing::info!(one = self.one.name(), two = self.two.name(), "rematch");
    }

    fn ask(&mut self, side: Side, source: &mut dyn ActionSource) -> Result<Action> {
        let (me, opponent) = match side {
            Side::One => (&self.one, &self.two),
            Side::Two => (&self.two, &self.one),
        };
        loop {
            match source.choose(me, opponent, &mut self.dice)? {
                ActionChoice::Commit(action) => return Ok(action),
                ActionChoice::Back => tracing::trace!(%side, "source asked to go back"),
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{ClassArchetype, ControllerKind, Stats};
    use crate::controller::ScriptedSource;
    use crate::dice::ScriptedDice;

    fn fighter(name: &str, archetype: ClassArchetype) -> Combatant {
        Combatant::new(name, archetype, ControllerKind::Human, &DuelRules::default()).unwrap()
    }

    fn scripted(rolls: impl IntoIterator<Item = i32>) -> Match<ScriptedDice> {
        Match::with_dice(
            fighter("Ada", ClassArchetype::Balanced),
            fighter("Bo", ClassArchetype::Support),
            DuelRules::default(),
            ScriptedDice::new(rolls),
        )
        .unwrap()
    }

    mod creation_tests {
        use super::*;

        #[test]
        fn new_match_awaits_player_one_at_round_one() {
            let duel = scripted([]);
            assert_eq!(duel.round(), 1);
            assert_eq!(duel.rounds_played(), 0);
            assert_eq!(duel.phase(), RoundPhase::AwaitingP1Action);
            assert_eq!(duel.result(), None);
        }

        #[test]
        fn match_with_fallen_combatant_starts_finished() {
            let mut two = fighter("Bo", ClassArchetype::Tank);
            two.set_health(0);
            let duel = Match::seeded(1, fighter("Ada", ClassArchetype::Balanced), two, DuelRules::default())
                .unwrap();
            assert!(duel.is_over());
            assert_eq!(duel.result(), Some(MatchResult::Winner(Side::One)));
        }

        #[test]
        fn invalid_rules_rejected_before_any_round() {
            let rules = DuelRules { heal_min: 5, heal_max: 5, ..DuelRules::default() };
            let result = Match::with_dice(
                fighter("Ada", ClassArchetype::Support),
                fighter("Bo", ClassArchetype::Tank),
                rules,
                ScriptedDice::default(),
            );
            assert!(matches!(result, Err(DuelError::InvalidRules(_))));
        }

        #[test]
        fn match_rules_set_the_heal_cap() {
            let rules = DuelRules { heal_cap: 5, ..DuelRules::default() };
            let duel = Match::with_dice(
                fighter("Ada", ClassArchetype::Balanced),
                fighter("Bo", ClassArchetype::Support),
                rules,
                ScriptedDice::default(),
            )
            .unwrap();
            assert_eq!(duel.combatant(Side::Two).heal_cap(), 5);
            assert_eq!(duel.combatant(Side::Two).heals_remaining(), 5);
            assert_eq!(duel.combatant(Side::One).heal_cap(), 0);
        }
    }

    mod phase_tests {
        use super::*;

        #[test]
        fn player_two_cannot_commit_first() {
            let mut duel = scripted([]);
            let err = duel.commit(Side::Two, Action::GuardLeft).unwrap_err();
            assert!(matches!(
                err,
                DuelError::OutOfTurn { expected: RoundPhase::AwaitingP1Action, actual: Side::Two }
            ));
            assert_eq!(duel.combatant(Side::Two).chosen_action(), None);
        }

        #[test]
        fn player_one_cannot_commit_twice() {
            let mut duel = scripted([]);
            duel.commit(Side::One, Action::GuardLeft).unwrap();
            assert!(matches!(
                duel.commit(Side::One, Action::GuardRight),
                Err(DuelError::OutOfTurn { .. })
            ));
        }

        #[test]
        fn resolve_requires_both_actions() {
            let mut duel = scripted([]);
            assert!(matches!(duel.resolve_round(), Err(DuelError::ActionsPending)));
            duel.commit(Side::One, Action::GuardLeft).unwrap();
            assert!(matches!(duel.resolve_round(), Err(DuelError::ActionsPending)));
        }

        #[test]
        fn rejected_heal_leaves_phase_unchanged() {
            let mut duel = scripted([]);
            assert!(matches!(
                duel.commit(Side::One, Action::Heal),
                Err(DuelError::HealNotAllowed { .. })
            ));
            assert_eq!(duel.phase(), RoundPhase::AwaitingP1Action);
        }

        #[test]
        fn back_steps_through_commits() {
            let mut duel = scripted([]);
            assert_eq!(duel.back().unwrap(), RoundPhase::AwaitingP1Action);

            duel.commit(Side::One, Action::AttackLeft).unwrap();
            duel.commit(Side::Two, Action::GuardLeft).unwrap();
            assert_eq!(duel.back().unwrap(), RoundPhase::AwaitingP2Action);
            assert_eq!(duel.combatant(Side::Two).chosen_action(), None);
            assert_eq!(duel.back().unwrap(), RoundPhase::AwaitingP1Action);
            assert_eq!(duel.combatant(Side::One).chosen_action(), None);
        }
    }

    mod resolve_tests {
        use super::*;

        #[test]
        fn sword_clash_advances_round_only() {
            let mut duel = scripted([]);
            duel.commit(Side::One, Action::AttackLeft).unwrap();
            duel.commit(Side::Two, Action::AttackLeft).unwrap();

            let report = duel.resolve_round().unwrap();

            assert_eq!(report.round, 1);
            assert_eq!(report.outcome, Outcome::SwordClash);
            assert_eq!(report.health, [20, 25]);
            assert!(report.events.is_empty());
            assert_eq!(duel.round(), 2);
            assert_eq!(duel.phase(), RoundPhase::AwaitingP1Action);
        }

        #[test]
        fn resolution_clears_actions_but_keeps_stagger() {
            let mut duel = scripted([]);
            duel.commit(Side::One, Action::AttackRight).unwrap();
            duel.commit(Side::Two, Action::GuardRight).unwrap();

            let report = duel.resolve_round().unwrap();

            assert_eq!(report.outcome, Outcome::P1Blocked);
            assert_eq!(duel.combatant(Side::One).chosen_action(), None);
            assert_eq!(duel.combatant(Side::Two).chosen_action(), None);
            assert!(duel.combatant(Side::One).is_staggered());
        }

        #[test]
        fn killing_blow_finishes_the_match() {
            let mut duel = scripted([0]);
            duel.combatant_mut(Side::Two).set_health(1);
            duel.commit(Side::One, Action::AttackLeft).unwrap();
            duel.commit(Side::Two, Action::GuardRight).unwrap();

            let report = duel.resolve_round().unwrap();

            assert_eq!(report.outcome, Outcome::P2GuardBroken);
            assert_eq!(report.result, Some(MatchResult::Winner(Side::One)));
            assert!(duel.is_over());
            assert!(matches!(duel.commit(Side::One, Action::GuardLeft), Err(DuelError::MatchOver)));
            assert!(matches!(duel.resolve_round(), Err(DuelError::MatchOver)));
        }

        #[test]
        fn simultaneous_knockout_is_a_draw() {
            let mut duel = scripted([0, 0]);
            duel.combatant_mut(Side::One).set_health(1);
            duel.combatant_mut(Side::Two).set_health(1);
            duel.commit(Side::One, Action::AttackLeft).unwrap();
            duel.commit(Side::Two, Action::AttackRight).unwrap();

            let report = duel.resolve_round().unwrap();

            assert_eq!(report.outcome, Outcome::BothHit);
            assert_eq!(report.result, Some(MatchResult::Draw));
        }

        #[test]
        fn failed_heal_under_attack_takes_the_hit() {
            let mut duel = scripted([0]);
            duel.combatant_mut(Side::Two).set_heals_remaining(0);
            duel.commit(Side::One, Action::AttackRight).unwrap();
            duel.commit(Side::Two, Action::Heal).unwrap();

            let report = duel.resolve_round().unwrap();

            assert_eq!(report.outcome, Outcome::P2HealFailedUnderAttack);
            // Balanced 10 attack against Support 8 defense
            assert_eq!(report.health[1], 25 - 6);
            assert_eq!(duel.dice_mut().consumed(), 1);
        }
    }

    mod play_tests {
        use super::*;

        #[test]
        fn play_round_retries_after_back() {
            let mut duel = scripted([]);
            let mut one = ScriptedSource::new([
                ActionChoice::Back,
                ActionChoice::Back,
                ActionChoice::Commit(Action::EvadeLeft),
            ]);
            let mut two = ScriptedSource::actions([Action::EvadeRight]);

            let report = duel.play_round(&mut one, &mut two).unwrap();

            assert_eq!(report.actions, [Action::EvadeLeft, Action::EvadeRight]);
            assert_eq!(report.outcome, Outcome::DoubleDodge);
            assert_eq!(one.remaining(), 0);
        }

        #[test]
        fn play_to_completion_respects_round_limit() {
            let mut duel = scripted([]);
            let mut one = ScriptedSource::actions([]);
            let mut two = ScriptedSource::actions([]);

            let summary = duel.play_to_completion(&mut one, &mut two, 5).unwrap();

            assert_eq!(summary.result, None);
            assert_eq!(summary.rounds, 5);
            assert_eq!(summary.health, [20, 25]);
        }

        #[test]
        fn play_to_completion_stops_at_knockout() {
            let one = Combatant::with_stats(
                "Glass",
                ClassArchetype::Brawler,
                ControllerKind::Computer,
                Stats { max_health: 10, attack: 30, defense: 0, speed: 0 },
                &DuelRules::default(),
            )
            .unwrap();
            let two = fighter("Bo", ClassArchetype::Balanced);
            let mut duel =
                Match::with_dice(one, two, DuelRules::default(), ScriptedDice::default()).unwrap();
            let mut p1 = ScriptedSource::actions([]).with_fallback(Action::AttackLeft);
            let mut p2 = ScriptedSource::actions([]).with_fallback(Action::GuardRight);

            let summary = duel.play_to_completion(&mut p1, &mut p2, 100).unwrap();

            assert_eq!(summary.result, Some(MatchResult::Winner(Side::One)));
            assert_eq!(summary.rounds, 1);
        }

        #[test]
        fn rematch_restores_everything() {
            let mut duel = scripted([0]);
            duel.combatant_mut(Side::Two).set_health(1);
            duel.commit(Side::One, Action::AttackLeft).unwrap();
            duel.commit(Side::Two, Action::GuardRight).unwrap();
            duel.resolve_round().unwrap();
            assert!(duel.is_over());

            duel.rematch();

            assert_eq!(duel.round(), 1);
            assert_eq!(duel.phase(), RoundPhase::AwaitingP1Action);
            assert_eq!(duel.combatant(Side::Two).health(), 25);
            assert_eq!(duel.combatant(Side::Two).heals_remaining(), 3);
            assert_eq!(duel.result(), None);
        }
    }
}
