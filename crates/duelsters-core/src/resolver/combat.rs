//! Applies a resolved [`Outcome`] to the two combatants.
//!
//! The `OutcomeProcessor` is the only code that mutates combatant state
//! during a round. It handles:
//! - Attacks: base damage, muted counters, critical rolls, stagger removal
//! - Stagger: a blocked swing staggers the attacker
//! - Counters: a successful evade grants a probabilistic counter-attack
//! - Heals: restore health, then the heal-interrupt roll when under attack
//!
//! # Roll Order
//!
//! Dice are consumed in a fixed order so seeded matches replay exactly:
//! counter roll, then crit roll, then crit bonus roll for a counter; heal
//! roll, then heal-dodge roll, then the attacker's crit rolls for a heal
//! under attack. `BothHit` applies Player One's swing before Player Two's.

use crate::combatant::{Combatant, HealResult, Side};
use crate::config::DuelRules;
use crate::dice::Dice;
use crate::error::Result;
use crate::outcome::Outcome;

use super::event::{AttackReport, CombatEvent, EventLog};

/// Mechanical effect of an outcome with the sides made explicit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Effect {
    /// Nothing happens.
    Nothing,
    /// Both sides hit each other.
    Exchange,
    /// The side's swing was blocked.
    Stagger(Side),
    /// The side lands an uncontested hit.
    Hit(Side),
    /// The side evaded and may counter.
    Counter(Side),
    /// The side heals unopposed.
    Heal(Side),
    /// The side heals while the other swings.
    HealUnderAttack(Side),
    /// Both sides heal.
    DoubleHeal,
}

impl Effect {
    const fn of(outcome: Outcome) -> Self {
        match outcome {
            Outcome::SwordClash
            | Outcome::BothBlock
            | Outcome::DoubleDodge
            | Outcome::P1GuardEvadeMiss
            | Outcome::P2GuardEvadeMiss => Self::Nothing,
            Outcome::BothHit => Self::Exchange,
            Outcome::P1Blocked => Self::Stagger(Side::One),
            Outcome::P2Blocked => Self::Stagger(Side::Two),
            Outcome::P1GuardBroken | Outcome::P1EvadedInto => Self::Hit(Side::Two),
            Outcome::P2GuardBroken | Outcome::P2EvadedInto => Self::Hit(Side::One),
            Outcome::P1Evade | Outcome::P1EvadeGuard => Self::Counter(Side::One),
            Outcome::P2Evade | Outcome::P2EvadeGuard => Self::Counter(Side::Two),
            Outcome::P1Heal | Outcome::P1HealFailed => Self::Heal(Side::One),
            Outcome::P2Heal | Outcome::P2HealFailed => Self::Heal(Side::Two),
            Outcome::P1HealUnderAttack | Outcome::P1HealFailedUnderAttack => {
                Self::HealUnderAttack(Side::One)
            }
            Outcome::P2HealUnderAttack | Outcome::P2HealFailedUnderAttack => {
                Self::HealUnderAttack(Side::Two)
            }
            Outcome::DoubleHeal
            | Outcome::P1HealFailedP2Heal
            | Outcome::P2HealFailedP1Heal
            | Outcome::DoubleHealFailed => Self::DoubleHeal,
        }
    }
}

/// Orders the pair as `(side, other)`.
fn split<'a>(
    side: Side,
    one: &'a mut Combatant,
    two: &'a mut Combatant,
) -> (&'a mut Combatant, &'a mut Combatant) {
    match side {
        Side::One => (one, two),
        Side::Two => (two, one),
    }
}

/// Applies outcomes to combatants using a fixed set of rules.
///
/// # Example
///
/// ```
/// use duelsters_core::combatant::{ClassArchetype, Combatant, ControllerKind};
/// use duelsters_core::config::DuelRules;
/// use duelsters_core::dice::ScriptedDice;
/// use duelsters_core::outcome::Outcome;
/// use duelsters_core::resolver::{EventLog, OutcomeProcessor};
///
/// let rules = DuelRules::default();
/// let mut one = Combatant::new("Ada", ClassArchetype::Brawler, ControllerKind::Human, &rules)?;
/// let mut two = Combatant::new("Bo", ClassArchetype::Tank, ControllerKind::Human, &rules)?;
///
/// let processor = OutcomeProcessor::new(rules)?;
/// let mut log = EventLog::new();
/// processor.process(Outcome::P1Blocked, &mut one, &mut two, &mut ScriptedDice::default(), &mut log);
/// assert!(one.is_staggered());
/// # Ok::<(), duelsters_core::error::DuelError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutcomeProcessor {
    rules: DuelRules,
}

impl OutcomeProcessor {
    /// Creates a processor for the given rules.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidRules`](crate::error::DuelError::InvalidRules)
    /// if `rules` fail [`DuelRules::validate`].
    pub fn new(rules: DuelRules) -> Result<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    /// Rules in effect.
    #[must_use]
    pub fn rules(&self) -> &DuelRules {
        &self.rules
    }

    /// Applies every mechanical consequence of `outcome`.
    ///
    /// `one` and `two` must still carry the actions the outcome was resolved
    /// from; guard and evade checks read them.
    pub fn process(
        &self,
        outcome: Outcome,
        one: &mut Combatant,
        two: &mut Combatant,
        dice: &mut dyn Dice,
        log: &mut EventLog,
    ) {
        let effect = Effect::of(outcome);
        tracing::debug!(?outcome, ?effect, "processing outcome");

        match effect {
            Effect::Nothing => {}
            Effect::Exchange => {
                self.apply_attack_result(Side::One, one, two, dice, log);
                self.apply_attack_result(Side::Two, two, one, dice, log);
            }
            Effect::Stagger(side) => {
                let (blocked, _) = split(side, one, two);
                blocked.stagger();
                log.push(CombatEvent::Staggered { side });
            }
            Effect::Hit(side) => {
                let (attacker, defender) = split(side, one, two);
                self.apply_attack_result(side, attacker, defender, dice, log);
            }
            Effect::Counter(side) => {
                let (evader, attacker) = split(side, one, two);
                self.counter_attack(side, evader, attacker, dice, log);
            }
            Effect::Heal(side) => {
                let (healer, _) = split(side, one, two);
                self.heal(side, healer, dice, log);
                healer.clear_healing();
            }
            Effect::HealUnderAttack(side) => {
                let (healer, attacker) = split(side, one, two);
                self.heal(side, healer, dice, log);
                self.heal_interrupt(side, healer, attacker, dice, log);
            }
            Effect::DoubleHeal => {
                self.heal(Side::One, one, dice, log);
                self.heal(Side::Two, two, dice, log);
                one.clear_healing();
                two.clear_healing();
            }
        }
    }

    /// Lands one attack from `attacker` on `defender`.
    ///
    /// Base damage is halved when a counter meets a raised guard. Any landed
    /// hit removes the defender's stagger. Health is reduced through the
    /// clamping setter, so the report's `dealt` may be less than its total.
    pub fn apply_attack_result(
        &self,
        attacker_side: Side,
        attacker: &mut Combatant,
        defender: &mut Combatant,
        dice: &mut dyn Dice,
        log: &mut EventLog,
    ) -> AttackReport {
        let mut base = attacker.calculate_base_damage(defender);
        let muted = attacker.is_countering() && defender.is_guarding();
        if muted {
            base /= 2;
        }

        let critical = attacker.is_critical(defender, dice, &self.rules);
        let crit_bonus = if critical {
            attacker.calculate_critical_damage(dice, &self.rules)
        } else {
            0
        };

        defender.clear_stagger();
        let dealt = defender.take_damage(base + crit_bonus);

        let report = AttackReport {
            attacker: attacker_side,
            defender: attacker_side.opponent(),
            base,
            critical,
            crit_bonus,
            dealt,
            muted,
        };
        tracing::debug!(
            attacker = attacker.name(),
            defender = defender.name(),
            base,
            critical,
            crit_bonus,
            dealt,
            health = defender.health(),
            "attack landed"
        );
        log.push(CombatEvent::Attack(report));
        report
    }

    /// Rolls a counter for `evader` and, on success, lands it on `target`.
    ///
    /// Returns the attack report when the counter connected.
    pub fn counter_attack(
        &self,
        evader_side: Side,
        evader: &mut Combatant,
        target: &mut Combatant,
        dice: &mut dyn Dice,
        log: &mut EventLog,
    ) -> Option<AttackReport> {
        if !evader.roll_counter(dice, &self.rules) {
            log.push(CombatEvent::CounterWhiffed { side: evader_side });
            return None;
        }

        log.push(CombatEvent::Countered { side: evader_side });
        let report = self.apply_attack_result(evader_side, evader, target, dice, log);
        evader.clear_countering();
        Some(report)
    }

    /// Resolves an incoming swing against a healer who has already healed.
    ///
    /// A healer whose heal succeeded rolls to dodge the swing entirely. A
    /// healer whose heal failed takes the swing with no roll.
    pub fn heal_interrupt(
        &self,
        healer_side: Side,
        healer: &mut Combatant,
        attacker: &mut Combatant,
        dice: &mut dyn Dice,
        log: &mut EventLog,
    ) -> Option<AttackReport> {
        if healer.is_healing() {
            let roll = dice.roll(0, self.rules.heal_dodge_die);
            healer.clear_healing();
            if roll >= self.rules.heal_dodge_threshold {
                log.push(CombatEvent::HealDodged { side: healer_side });
                return None;
            }
            log.push(CombatEvent::HealInterrupted { side: healer_side });
        }

        Some(self.apply_attack_result(healer_side.opponent(), attacker, healer, dice, log))
    }

    fn heal(&self, side: Side, healer: &mut Combatant, dice: &mut dyn Dice, log: &mut EventLog) {
        match healer.heal(dice, &self.rules) {
            HealResult::Restored { amount } => {
                tracing::debug!(healer = healer.name(), amount, "healed");
                log.push(CombatEvent::Healed { side, amount });
            }
            HealResult::Exhausted => {
                tracing::debug!(healer = healer.name(), "no heals left");
                log.push(CombatEvent::HealFailed { side });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::combatant::{ClassArchetype, ControllerKind, Stats};
    use crate::dice::ScriptedDice;

    fn fighter(name: &str, attack: i32, defense: i32, speed: i32, health: i32) -> Combatant {
        Combatant::with_stats(
            name,
            ClassArchetype::Balanced,
            ControllerKind::Human,
            Stats { max_health: health, attack, defense, speed },
            &DuelRules::default(),
        )
        .unwrap()
    }

    fn healer(name: &str) -> Combatant {
        Combatant::new(name, ClassArchetype::Support, ControllerKind::Human, &DuelRules::default())
            .unwrap()
    }

    fn with_action(mut c: Combatant, action: Action) -> Combatant {
        c.choose_action(action).unwrap();
        c
    }

    fn processor() -> OutcomeProcessor {
        OutcomeProcessor::default()
    }

    #[test]
    fn invalid_rules_rejected_up_front() {
        let rules = DuelRules { heal_min: 5, heal_max: 5, ..DuelRules::default() };
        assert!(matches!(
            OutcomeProcessor::new(rules),
            Err(crate::error::DuelError::InvalidRules(_))
        ));
        assert!(OutcomeProcessor::new(DuelRules::default()).is_ok());
    }

    mod attack_tests {
        use super::*;

        #[test]
        fn plain_hit_without_crit() {
            let mut attacker = fighter("A", 15, 0, 0, 20);
            let mut defender = fighter("D", 0, 10, 0, 20);
            let mut dice = ScriptedDice::new([0]);
            let mut log = EventLog::new();

            let report =
                processor().apply_attack_result(Side::One, &mut attacker, &mut defender, &mut dice, &mut log);

            assert_eq!(report.base, 10);
            assert!(!report.critical);
            assert_eq!(report.dealt, 10);
            assert_eq!(defender.health(), 10);
            assert_eq!(log.len(), 1);
        }

        #[test]
        fn critical_hit_bypasses_defense_and_clamps() {
            let mut attacker = fighter("A", 15, 0, 0, 20);
            let mut defender = fighter("D", 0, 10, 0, 20);
            // crit roll 19, bonus roll 4 -> 10 + 4 + 7 = 21
            let mut dice = ScriptedDice::new([19, 4]);
            let mut log = EventLog::new();

            let report =
                processor().apply_attack_result(Side::One, &mut attacker, &mut defender, &mut dice, &mut log);

            assert!(report.critical);
            assert_eq!(report.crit_bonus, 11);
            assert_eq!(report.total(), 21);
            assert_eq!(report.dealt, 20);
            assert_eq!(defender.health(), 0);
        }

        #[test]
        fn hit_on_staggered_defender_crits_and_clears_stagger() {
            let mut attacker = fighter("A", 10, 0, 0, 20);
            let mut defender = fighter("D", 0, 0, 0, 30);
            defender.stagger();
            let mut dice = ScriptedDice::new([0, 1]);

            let report = processor().apply_attack_result(
                Side::Two,
                &mut attacker,
                &mut defender,
                &mut dice,
                &mut EventLog::new(),
            );

            assert!(report.critical);
            assert_eq!(report.defender, Side::One);
            assert!(!defender.is_staggered());
            assert_eq!(defender.health(), 30 - (10 + 1 + 5));
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn sword_clash_changes_nothing() {
            let mut one = with_action(fighter("A", 10, 5, 5, 20), Action::AttackLeft);
            let mut two = with_action(fighter("B", 10, 5, 5, 20), Action::AttackLeft);
            let mut dice = ScriptedDice::default();
            let mut log = EventLog::new();

            processor().process(Outcome::SwordClash, &mut one, &mut two, &mut dice, &mut log);

            assert_eq!(one.health(), 20);
            assert_eq!(two.health(), 20);
            assert!(log.is_empty());
            assert_eq!(dice.consumed(), 0);
        }

        #[test]
        fn both_hit_applies_both_swings_in_order() {
            let mut one = with_action(fighter("A", 10, 4, 0, 20), Action::AttackLeft);
            let mut two = with_action(fighter("B", 6, 4, 0, 20), Action::AttackRight);
            let mut dice = ScriptedDice::new([0, 0]);
            let mut log = EventLog::new();

            processor().process(Outcome::BothHit, &mut one, &mut two, &mut dice, &mut log);

            assert_eq!(two.health(), 20 - 8);
            assert_eq!(one.health(), 20 - 4);
            let events = log.take();
            assert!(matches!(events[0], CombatEvent::Attack(r) if r.attacker == Side::One));
            assert!(matches!(events[1], CombatEvent::Attack(r) if r.attacker == Side::Two));
        }

        #[test]
        fn blocked_swing_staggers_the_attacker_only() {
            let mut one = with_action(fighter("A", 10, 5, 5, 20), Action::AttackRight);
            let mut two = with_action(fighter("B", 10, 5, 5, 20), Action::GuardRight);
            let mut log = EventLog::new();

            processor().process(
                Outcome::P1Blocked,
                &mut one,
                &mut two,
                &mut ScriptedDice::default(),
                &mut log,
            );

            assert!(one.is_staggered());
            assert!(!two.is_staggered());
            assert_eq!(one.health(), 20);
            assert_eq!(log.events(), &[CombatEvent::Staggered { side: Side::One }]);
        }

        #[test]
        fn guard_broken_hits_the_guard() {
            let mut one = with_action(fighter("A", 10, 0, 0, 20), Action::GuardLeft);
            let mut two = with_action(fighter("B", 12, 0, 0, 20), Action::AttackRight);

            processor().process(
                Outcome::P1GuardBroken,
                &mut one,
                &mut two,
                &mut ScriptedDice::new([0]),
                &mut EventLog::new(),
            );

            assert_eq!(one.health(), 8);
            assert_eq!(two.health(), 20);
        }

        #[test]
        fn evading_into_a_swing_is_always_critical() {
            let mut one = with_action(fighter("A", 8, 0, 0, 20), Action::AttackLeft);
            let mut two = with_action(fighter("B", 8, 0, 0, 20), Action::EvadeRight);
            let mut dice = ScriptedDice::new([0, 1]);
            let mut log = EventLog::new();

            processor().process(Outcome::P2EvadedInto, &mut one, &mut two, &mut dice, &mut log);

            assert_eq!(two.health(), 20 - (8 + 1 + 4));
            assert!(matches!(log.events()[0], CombatEvent::Attack(r) if r.critical));
        }
    }

    mod counter_tests {
        use super::*;

        #[test]
        fn failed_counter_is_narration_only() {
            let mut one = with_action(fighter("A", 10, 0, 0, 20), Action::EvadeLeft);
            let mut two = with_action(fighter("B", 10, 0, 0, 20), Action::AttackLeft);
            let mut dice = ScriptedDice::new([14]);
            let mut log = EventLog::new();

            processor().process(Outcome::P1Evade, &mut one, &mut two, &mut dice, &mut log);

            assert_eq!(two.health(), 20);
            assert!(!one.is_countering());
            assert_eq!(log.events(), &[CombatEvent::CounterWhiffed { side: Side::One }]);
        }

        #[test]
        fn successful_counter_gets_crit_bonus_and_clears_flag() {
            let mut one = with_action(fighter("A", 10, 0, 0, 20), Action::EvadeLeft);
            let mut two = with_action(fighter("B", 10, 0, 0, 20), Action::AttackLeft);
            // counter 15, crit 7 + 5 bonus = 12, crit damage 2 + 5
            let mut dice = ScriptedDice::new([15, 7, 2]);
            let mut log = EventLog::new();

            processor().process(Outcome::P1Evade, &mut one, &mut two, &mut dice, &mut log);

            assert_eq!(two.health(), 20 - (10 + 7));
            assert!(!one.is_countering());
            let events = log.take();
            assert_eq!(events[0], CombatEvent::Countered { side: Side::One });
            assert!(matches!(events[1], CombatEvent::Attack(r) if r.critical && !r.muted));
        }

        #[test]
        fn counter_into_guard_is_halved_and_never_crits() {
            let mut one = with_action(fighter("A", 10, 0, 0, 20), Action::GuardRight);
            let mut two = with_action(fighter("B", 11, 0, 0, 20), Action::EvadeRight);
            one.stagger();
            let mut dice = ScriptedDice::new([19, 19]);
            let mut log = EventLog::new();

            processor().process(Outcome::P2EvadeGuard, &mut one, &mut two, &mut dice, &mut log);

            assert_eq!(one.health(), 20 - 5);
            assert!(!one.is_staggered());
            let events = log.take();
            assert!(matches!(events[1], CombatEvent::Attack(r) if r.muted && !r.critical));
            assert_eq!(dice.consumed(), 2);
        }
    }

    mod heal_tests {
        use super::*;

        #[test]
        fn unopposed_heal_restores_and_clears_flag() {
            let mut one = with_action(healer("M"), Action::Heal);
            one.set_health(10);
            let mut two = with_action(fighter("B", 10, 0, 0, 20), Action::GuardLeft);
            let mut log = EventLog::new();

            processor().process(Outcome::P1Heal, &mut one, &mut two, &mut ScriptedDice::new([7]), &mut log);

            assert_eq!(one.health(), 17);
            assert_eq!(one.heals_remaining(), 2);
            assert!(!one.is_healing());
            assert_eq!(log.events(), &[CombatEvent::Healed { side: Side::One, amount: 7 }]);
        }

        #[test]
        fn healer_can_dodge_the_swing() {
            let mut one = with_action(fighter("B", 10, 0, 0, 20), Action::AttackLeft);
            let mut two = with_action(healer("M"), Action::Heal);
            two.set_health(10);
            let mut dice = ScriptedDice::new([5, 6]);
            let mut log = EventLog::new();

            processor().process(Outcome::P2HealUnderAttack, &mut one, &mut two, &mut dice, &mut log);

            assert_eq!(two.health(), 15);
            assert!(!two.is_healing());
            assert_eq!(log.events()[1], CombatEvent::HealDodged { side: Side::Two });
        }

        #[test]
        fn healer_can_be_interrupted() {
            let mut one = with_action(fighter("B", 10, 0, 0, 20), Action::AttackLeft);
            let mut two = with_action(healer("M"), Action::Heal);
            two.set_health(10);
            // heal 5, dodge 5 fails, crit 0 fails; base 10 - 8 / 2 = 6
            let mut dice = ScriptedDice::new([5, 5, 0]);
            let mut log = EventLog::new();

            processor().process(Outcome::P2HealUnderAttack, &mut one, &mut two, &mut dice, &mut log);

            assert_eq!(two.health(), 10 + 5 - 6);
            assert!(!two.is_healing());
            assert_eq!(log.events()[1], CombatEvent::HealInterrupted { side: Side::Two });
        }

        #[test]
        fn failed_heal_under_attack_skips_the_dodge_roll() {
            let mut one = with_action(healer("M"), Action::Heal);
            one.set_heals_remaining(0);
            let mut two = with_action(fighter("B", 10, 0, 0, 20), Action::AttackRight);
            // the only roll is the crit roll
            let mut dice = ScriptedDice::new([0]);
            let mut log = EventLog::new();

            processor().process(
                Outcome::P1HealFailedUnderAttack,
                &mut one,
                &mut two,
                &mut dice,
                &mut log,
            );

            assert_eq!(one.health(), 25 - 6);
            assert_eq!(dice.consumed(), 1);
            let events = log.take();
            assert_eq!(events[0], CombatEvent::HealFailed { side: Side::One });
            assert!(matches!(events[1], CombatEvent::Attack(r) if r.defender == Side::One));
        }

        #[test]
        fn double_heal_has_no_interrupt_roll() {
            let mut one = with_action(healer("M1"), Action::Heal);
            let mut two = with_action(healer("M2"), Action::Heal);
            one.set_health(5);
            two.set_health(5);
            let mut dice = ScriptedDice::new([3, 4]);

            processor().process(Outcome::DoubleHeal, &mut one, &mut two, &mut dice, &mut EventLog::new());

            assert_eq!(one.health(), 8);
            assert_eq!(two.health(), 9);
            assert_eq!(dice.consumed(), 2);
            assert!(!one.is_healing() && !two.is_healing());
        }
    }

    #[test]
    fn every_outcome_maps_to_a_consistent_effect() {
        for outcome in Outcome::ALL {
            let effect = Effect::of(outcome);
            if outcome.is_no_op() {
                assert!(
                    matches!(effect, Effect::Nothing | Effect::Heal(_) | Effect::DoubleHeal),
                    "{outcome}"
                );
            }
            if outcome.deals_damage() {
                assert!(
                    matches!(effect, Effect::Exchange | Effect::Hit(_) | Effect::HealUnderAttack(_)),
                    "{outcome}"
                );
            }
        }
    }
}
