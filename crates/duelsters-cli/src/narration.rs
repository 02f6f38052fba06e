//! Turns round reports into arena commentary.
//!
//! Narration is read-only: it looks at a [`RoundReport`] after the round has
//! been applied and never touches match state. Lines come in the order the
//! round happened: what each side did, what the pair of actions amounted to,
//! then each mechanical step, then the result if the round ended the match.

use duelsters_core::action::Action;
use duelsters_core::combatant::Side;
use duelsters_core::outcome::Outcome;
use duelsters_core::resolver::{AttackReport, CombatEvent};
use duelsters_core::simulation::{MatchResult, RoundReport};

/// Narrates rounds for a fixed pair of combatant names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrator {
    names: [String; 2],
}

impl Narrator {
    /// Creates a narrator for Player One `one` and Player Two `two`.
    #[must_use]
    pub fn new(one: impl Into<String>, two: impl Into<String>) -> Self {
        Self {
            names: [one.into(), two.into()],
        }
    }

    /// Name of `side`.
    #[must_use]
    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::One => &self.names[0],
            Side::Two => &self.names[1],
        }
    }

    /// Every line for a resolved round, in order.
    #[must_use]
    pub fn round(&self, report: &RoundReport) -> Vec<String> {
        let mut lines = Vec::with_capacity(report.events.len() + 4);
        lines.push(action_line(self.name(Side::One), report.actions[0]));
        lines.push(action_line(self.name(Side::Two), report.actions[1]));
        lines.push(self.outcome(report.outcome));
        lines.extend(report.events.iter().map(|event| self.event(event)));
        if let Some(result) = report.result {
            lines.push(self.result(result));
        }
        lines
    }

    /// One line describing what a pair of actions amounted to.
    #[must_use]
    pub fn outcome(&self, outcome: Outcome) -> String {
        let one = self.name(Side::One);
        let two = self.name(Side::Two);
        // sided outcomes are worded from the named side's point of view
        let (me, them) = match outcome.subject() {
            Some(side) => (self.name(side), self.name(side.opponent())),
            None => (one, two),
        };

        match outcome {
            Outcome::SwordClash => format!(
                "The blades of {one} and {two} meet with a ring of steel. They part and reset."
            ),
            Outcome::BothHit => {
                format!("{one} and {two} cut into each other at the same moment!")
            }
            Outcome::BothBlock => format!(
                "{one} and {two} both hide behind their shields. The crowd is not impressed."
            ),
            Outcome::DoubleDodge => format!(
                "{one} and {two} dance around each other. Nobody is hurt, everybody is entertained."
            ),
            Outcome::DoubleHeal => format!("{one} and {two} both stop to patch their wounds."),
            Outcome::DoubleHealFailed => format!(
                "{one} and {two} reach for their medicine and both come up empty."
            ),
            Outcome::P1Blocked | Outcome::P2Blocked => {
                format!("{them} blocks {me}'s swing! The impact rattles {me}'s arm.")
            }
            Outcome::P1GuardBroken | Outcome::P2GuardBroken => {
                format!("{me} guards the wrong side and {them}'s blade finds the gap!")
            }
            Outcome::P1EvadedInto | Outcome::P2EvadedInto => {
                format!("{me} dodges straight into {them}'s swing!")
            }
            Outcome::P1Evade | Outcome::P2Evade => {
                format!("{me} slips past {them}'s swing and looks for an opening.")
            }
            Outcome::P1EvadeGuard | Outcome::P2EvadeGuard => {
                format!("{me} darts toward {them}'s open side, but the shield is still up.")
            }
            Outcome::P1GuardEvadeMiss | Outcome::P2GuardEvadeMiss => {
                format!("{them} hops away from {me}'s raised shield. Nothing comes of it.")
            }
            Outcome::P1Heal | Outcome::P2Heal => {
                format!("{me} tends their wounds while {them} keeps their distance.")
            }
            Outcome::P1HealFailed | Outcome::P2HealFailed => {
                format!("{me} rummages through an empty medicine bag. {them} waits it out.")
            }
            Outcome::P1HealUnderAttack | Outcome::P2HealUnderAttack => {
                format!("{me} starts to heal as {them} swings!")
            }
            Outcome::P1HealFailedUnderAttack | Outcome::P2HealFailedUnderAttack => {
                format!("{me} reaches for a heal that isn't there, and {them} swings!")
            }
            Outcome::P1HealFailedP2Heal | Outcome::P2HealFailedP1Heal => {
                format!("{them} heals up while {me} stares into an empty medicine bag.")
            }
        }
    }

    /// One line for a single mechanical step.
    #[must_use]
    pub fn event(&self, event: &CombatEvent) -> String {
        let who = self.name(event.side());
        match event {
            CombatEvent::Attack(report) => self.attack(report),
            CombatEvent::Staggered { .. } => {
                format!("{who} is staggered. The next hit on them will be critical.")
            }
            CombatEvent::Countered { .. } => format!("{who} launches a counterattack!"),
            CombatEvent::CounterWhiffed { .. } => {
                format!("{who} whiffs the counter. No harm done.")
            }
            CombatEvent::Healed { amount, .. } => format!("{who} recovers {amount} health."),
            CombatEvent::HealFailed { .. } => format!("{who} has no heals left."),
            CombatEvent::HealDodged { .. } => {
                format!("{who} sees the blow coming and sidesteps it mid-heal!")
            }
            CombatEvent::HealInterrupted { .. } => format!("{who} is caught mid-heal!"),
        }
    }

    fn attack(&self, report: &AttackReport) -> String {
        let attacker = self.name(report.attacker);
        let defender = self.name(report.defender);
        let critical = if report.critical {
            format!(" (critical, +{})", report.crit_bonus)
        } else {
            String::new()
        };
        let muted = if report.muted {
            ", glancing off the shield"
        } else {
            ""
        };
        format!(
            "{attacker} hits {defender} for {} damage{critical}{muted}.",
            report.dealt
        )
    }

    /// Closing line of a finished match.
    #[must_use]
    pub fn result(&self, result: MatchResult) -> String {
        match result {
            MatchResult::Winner(side) => format!(
                "{} falls. {} is victorious!",
                self.name(side.opponent()),
                self.name(side)
            ),
            MatchResult::Draw => format!(
                "{} and {} collapse together. The duel is a draw.",
                self.name(Side::One),
                self.name(Side::Two)
            ),
        }
    }
}

/// What a combatant is seen doing.
#[must_use]
pub fn action_line(name: &str, action: Action) -> String {
    match action {
        Action::AttackLeft => format!("{name} swings to their left."),
        Action::AttackRight => format!("{name} swings to their right."),
        Action::GuardLeft => format!("{name} raises their shield on the left."),
        Action::GuardRight => format!("{name} raises their shield on the right."),
        Action::EvadeLeft => format!("{name} ducks to the left."),
        Action::EvadeRight => format!("{name} ducks to the right."),
        Action::Heal => format!("{name} reaches for their medicine bag."),
    }
}
