//! The closed set of actions a combatant may choose each round.
//!
//! Attack, guard and evade are directional. Heal has no direction, so any
//! direction comparison involving it yields no [`Facing`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the body an action is aimed at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Left.
    Left,
    /// Right.
    Right,
}

/// Relative direction of two directional actions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Both actions point the same way.
    Same,
    /// The actions point opposite ways.
    Opposite,
}

/// Category of an action with its direction stripped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Swing the sword.
    Attack,
    /// Raise the shield.
    Guard,
    /// Sidestep.
    Evade,
    /// Patch yourself up.
    Heal,
}

/// An action chosen for one round.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Swing to the left.
    AttackLeft,
    /// Swing to the right.
    AttackRight,
    /// Guard the left side.
    GuardLeft,
    /// Guard the right side.
    GuardRight,
    /// Evade to the left.
    EvadeLeft,
    /// Evade to the right.
    EvadeRight,
    /// Heal (healing-capable archetypes only).
    Heal,
}

impl Action {
    /// Every action, in menu order.
    pub const ALL: [Action; 7] = [
        Action::AttackLeft,
        Action::AttackRight,
        Action::GuardLeft,
        Action::GuardRight,
        Action::EvadeLeft,
        Action::EvadeRight,
        Action::Heal,
    ];

    /// The six directional actions.
    pub const DIRECTIONAL: [Action; 6] = [
        Action::AttackLeft,
        Action::AttackRight,
        Action::GuardLeft,
        Action::GuardRight,
        Action::EvadeLeft,
        Action::EvadeRight,
    ];

    /// Builds a directional action from its parts.
    ///
    /// Returns `None` for [`ActionKind::Heal`], which has no direction.
    #[must_use]
    pub const fn directional(kind: ActionKind, direction: Direction) -> Option<Self> {
        match (kind, direction) {
            (ActionKind::Attack, Direction::Left) => Some(Self::AttackLeft),
            (ActionKind::Attack, Direction::Right) => Some(Self::AttackRight),
            (ActionKind::Guard, Direction::Left) => Some(Self::GuardLeft),
            (ActionKind::Guard, Direction::Right) => Some(Self::GuardRight),
            (ActionKind::Evade, Direction::Left) => Some(Self::EvadeLeft),
            (ActionKind::Evade, Direction::Right) => Some(Self::EvadeRight),
            (ActionKind::Heal, _) => None,
        }
    }

    /// The action's category.
    #[must_use]
    pub const fn kind(self) -> ActionKind {
        match self {
            Self::AttackLeft | Self::AttackRight => ActionKind::Attack,
            Self::GuardLeft | Self::GuardRight => ActionKind::Guard,
            Self::EvadeLeft | Self::EvadeRight => ActionKind::Evade,
            Self::Heal => ActionKind::Heal,
        }
    }

    /// The action's direction, if it has one.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::AttackLeft | Self::GuardLeft | Self::EvadeLeft => Some(Direction::Left),
            Self::AttackRight | Self::GuardRight | Self::EvadeRight => Some(Direction::Right),
            Self::Heal => None,
        }
    }

    /// Relative direction against another action.
    ///
    /// `None` when either side is healing.
    #[must_use]
    pub fn facing(self, other: Self) -> Option<Facing> {
        match (self.direction(), other.direction()) {
            (Some(a), Some(b)) if a == b => Some(Facing::Same),
            (Some(_), Some(_)) => Some(Facing::Opposite),
            _ => None,
        }
    }

    /// True for either guard direction.
    #[must_use]
    pub const fn is_guard(self) -> bool {
        matches!(self.kind(), ActionKind::Guard)
    }

    /// True for either evade direction.
    #[must_use]
    pub const fn is_evade(self) -> bool {
        matches!(self.kind(), ActionKind::Evade)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttackLeft => write!(f, "attack left"),
            Self::AttackRight => write!(f, "attack right"),
            Self::GuardLeft => write!(f, "guard left"),
            Self::GuardRight => write!(f, "guard right"),
            Self::EvadeLeft => write!(f, "evade left"),
            Self::EvadeRight => write!(f, "evade right"),
            Self::Heal => write!(f, "heal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_roundtrips_kind_and_direction() {
        for action in Action::DIRECTIONAL {
            let rebuilt = Action::directional(action.kind(), action.direction().unwrap());
            assert_eq!(rebuilt, Some(action));
        }
        assert_eq!(Action::directional(ActionKind::Heal, Direction::Left), None);
    }

    #[test]
    fn heal_has_no_facing() {
        assert_eq!(Action::Heal.direction(), None);
        assert_eq!(Action::Heal.facing(Action::AttackLeft), None);
        assert_eq!(Action::GuardRight.facing(Action::Heal), None);
    }

    #[test]
    fn facing_compares_direction_only() {
        assert_eq!(Action::AttackLeft.facing(Action::EvadeLeft), Some(Facing::Same));
        assert_eq!(Action::GuardRight.facing(Action::AttackLeft), Some(Facing::Opposite));
    }

    #[test]
    fn all_covers_every_kind() {
        let heals = Action::ALL.iter().filter(|a| a.kind() == ActionKind::Heal).count();
        assert_eq!(heals, 1);
        assert_eq!(Action::ALL.len(), Action::DIRECTIONAL.len() + 1);
    }
}
