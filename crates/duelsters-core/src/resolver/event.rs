//! Structured record of what happened while an outcome was applied.
//!
//! The processor does not mutate anything here beyond appending. Callers
//! drain the log with [`EventLog::take`] once per round and use it for
//! narration, replay and debugging.

use serde::{Deserialize, Serialize};

use crate::combatant::Side;

/// Arithmetic of a single landed attack.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackReport {
    /// Side that swung.
    pub attacker: Side,
    /// Side that was hit.
    pub defender: Side,
    /// Base damage after the defender's defense.
    pub base: i32,
    /// Whether the hit was critical.
    pub critical: bool,
    /// Bonus damage added by the critical, 0 otherwise.
    pub crit_bonus: i32,
    /// Health actually removed from the defender.
    pub dealt: i32,
    /// True when the hit was a counter into a raised guard and was halved.
    pub muted: bool,
}

impl AttackReport {
    /// Damage before health clamping.
    #[must_use]
    pub const fn total(&self) -> i32 {
        self.base + self.crit_bonus
    }
}

/// One mechanical step of a round.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatEvent {
    /// An attack landed.
    Attack(AttackReport),
    /// A blocked swing left the attacker staggered.
    Staggered {
        /// The staggered side.
        side: Side,
    },
    /// A counter roll succeeded; the following attack is the counter.
    Countered {
        /// The countering side.
        side: Side,
    },
    /// A counter roll failed.
    CounterWhiffed {
        /// The side that tried to counter.
        side: Side,
    },
    /// A heal restored health.
    Healed {
        /// The healing side.
        side: Side,
        /// Health gained.
        amount: i32,
    },
    /// A heal was attempted with none left.
    HealFailed {
        /// The side that tried to heal.
        side: Side,
    },
    /// A healer dodged the incoming swing.
    HealDodged {
        /// The healing side.
        side: Side,
    },
    /// A healer was caught mid-heal by the incoming swing.
    HealInterrupted {
        /// The healing side.
        side: Side,
    },
}

impl CombatEvent {
    /// The side the event is about.
    #[must_use]
    pub const fn side(&self) -> Side {
        match self {
            Self::Attack(report) => report.defender,
            Self::Staggered { side }
            | Self::Countered { side }
            | Self::CounterWhiffed { side }
            | Self::Healed { side, .. }
            | Self::HealFailed { side }
            | Self::HealDodged { side }
            | Self::HealInterrupted { side } => *side,
        }
    }
}

/// Append-only event buffer for the round in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event.
    pub fn push(&mut self, event: CombatEvent) {
        tracing::trace!(?event, "combat event");
        self.events.push(event);
    }

    /// Drains and returns all recorded events in order.
    pub fn take(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recorded events in order.
    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total health removed from `side` by recorded attacks.
    #[must_use]
    pub fn damage_taken(&self, side: Side) -> i32 {
        self.events
            .iter()
            .filter_map(|event| match event {
                CombatEvent::Attack(report) if report.defender == side => Some(report.dealt),
                _ => None,
            })
            .sum()
    }
}
