//! Stat presets, status flags and controller kinds for combatants.
//!
//! The class table lives here and is consulted exactly once, when a
//! [`Combatant`](super::Combatant) is created.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::dice::Dice;
use crate::error::{DuelError, Result};

/// Base stats for a combatant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    /// Maximum (and starting) health.
    pub max_health: i32,
    /// Offensive power.
    pub attack: i32,
    /// Damage mitigation; half of it is subtracted from incoming base damage.
    pub defense: i32,
    /// Improves crit and counter rolls.
    pub speed: i32,
}

impl Stats {
    /// Largest value any single stat may take.
    pub const LIMIT: i32 = 999;

    /// Checks every stat is within `[0, LIMIT]` and max health is at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidStats`] naming the first stat out of range.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("max_health", self.max_health, 1),
            ("attack", self.attack, 0),
            ("defense", self.defense, 0),
            ("speed", self.speed, 0),
        ];
        for (name, value, min) in fields {
            if !(min..=Self::LIMIT).contains(&value) {
                return Err(DuelError::InvalidStats(format!(
                    "{name} must be within [{min}, {}], got {value}",
                    Self::LIMIT
                )));
            }
        }
        Ok(())
    }
}

/// Class archetype chosen at character creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassArchetype {
    /// Average at everything.
    Balanced,
    /// Huge health and defense, slow and weak.
    Tank,
    /// Glass cannon: heavy hits, thin armor.
    Brawler,
    /// Speedster with the best crit and counter odds.
    Acrobat,
    /// Durable healer; the only archetype allowed to heal.
    Support,
}

const CLASS_COUNT: i32 = 5;

/// Class stat table, indexed in [`ClassArchetype::ALL`] order.
const CLASS_TABLE: [(ClassArchetype, Stats); 5] = [
    (
        ClassArchetype::Balanced,
        Stats { max_health: 20, attack: 10, defense: 8, speed: 5 },
    ),
    (
        ClassArchetype::Tank,
        Stats { max_health: 30, attack: 7, defense: 15, speed: 3 },
    ),
    (
        ClassArchetype::Brawler,
        Stats { max_health: 16, attack: 16, defense: 4, speed: 6 },
    ),
    (
        ClassArchetype::Acrobat,
        Stats { max_health: 18, attack: 8, defense: 6, speed: 12 },
    ),
    (
        ClassArchetype::Support,
        Stats { max_health: 25, attack: 9, defense: 8, speed: 4 },
    ),
];

impl ClassArchetype {
    /// Every archetype, in menu order.
    pub const ALL: [ClassArchetype; 5] = [
        ClassArchetype::Balanced,
        ClassArchetype::Tank,
        ClassArchetype::Brawler,
        ClassArchetype::Acrobat,
        ClassArchetype::Support,
    ];

    /// Base stats for this archetype.
    #[must_use]
    pub fn stats(self) -> Stats {
        CLASS_TABLE[self as usize].1
    }

    /// Whether this archetype may select `Heal`.
    #[must_use]
    pub const fn can_heal(self) -> bool {
        matches!(self, Self::Support)
    }

    /// Picks an archetype uniformly at random.
    pub fn random(dice: &mut dyn Dice) -> Self {
        let roll = dice.roll(0, CLASS_COUNT);
        usize::try_from(roll)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .unwrap_or(Self::Balanced)
    }
}

impl fmt::Display for ClassArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Balanced => write!(f, "Balanced"),
            Self::Tank => write!(f, "Tank"),
            Self::Brawler => write!(f, "Brawler"),
            Self::Acrobat => write!(f, "Acrobat"),
            Self::Support => write!(f, "Support"),
        }
    }
}

/// Who picks a combatant's actions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControllerKind {
    /// A person at the keyboard.
    #[default]
    Human,
    /// The weighted random policy.
    Computer,
}

bitflags! {
    /// Transient per-round status flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StatusFlags: u8 {
        /// Swing was blocked; the next hit taken is a guaranteed critical.
        const STAGGERED = 1 << 0;
        /// Mid counter-attack. Only set while the counter is being applied.
        const COUNTERING = 1 << 1;
        /// Heal succeeded this round; consumed by the heal-interrupt check.
        const HEALING = 1 << 2;
    }
}
