//! Symbolic classification of a resolved round.
//!
//! An [`Outcome`] carries no data. It names which of the fixed action-pair
//! patterns occurred and drives both the mechanical effects applied by
//! [`OutcomeProcessor`](crate::resolver::OutcomeProcessor) and the narration
//! picked by the caller.
//!
//! Variants prefixed `P1`/`P2` name the side the description is about; every
//! such variant has a mirror for the other side (see [`Outcome::mirrored`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combatant::Side;

/// Every reachable combination of two chosen actions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Both swing the same way. Blades meet, nobody is hurt.
    SwordClash,
    /// Both swing opposite ways. Both take a full, crit-eligible hit.
    BothHit,
    /// Player One's swing is blocked; Player One is staggered.
    P1Blocked,
    /// Player Two's swing is blocked; Player Two is staggered.
    P2Blocked,
    /// Player One guards the wrong side and takes Player Two's hit.
    P1GuardBroken,
    /// Player Two guards the wrong side and takes Player One's hit.
    P2GuardBroken,
    /// Both guard. Nothing happens.
    BothBlock,
    /// Player One evades into Player Two's swing and is critically hit.
    P1EvadedInto,
    /// Player Two evades into Player One's swing and is critically hit.
    P2EvadedInto,
    /// Player One evades Player Two's swing and may counter.
    P1Evade,
    /// Player Two evades Player One's swing and may counter.
    P2Evade,
    /// Player One evades toward Player Two's guard and may land a muted counter.
    P1EvadeGuard,
    /// Player Two evades toward Player One's guard and may land a muted counter.
    P2EvadeGuard,
    /// Player One guards while Player Two evades away. Nothing happens.
    P1GuardEvadeMiss,
    /// Player Two guards while Player One evades away. Nothing happens.
    P2GuardEvadeMiss,
    /// Both evade. Nothing happens.
    DoubleDodge,
    /// Player One heals while Player Two guards or evades.
    P1Heal,
    /// Player Two heals while Player One guards or evades.
    P2Heal,
    /// Player One tries to heal with no heals left while Player Two guards or evades.
    P1HealFailed,
    /// Player Two tries to heal with no heals left while Player One guards or evades.
    P2HealFailed,
    /// Player One heals while Player Two swings; Player One may dodge the swing.
    P1HealUnderAttack,
    /// Player Two heals while Player One swings; Player Two may dodge the swing.
    P2HealUnderAttack,
    /// Player One fails to heal while Player Two swings; the swing always lands.
    P1HealFailedUnderAttack,
    /// Player Two fails to heal while Player One swings; the swing always lands.
    P2HealFailedUnderAttack,
    /// Both heal successfully.
    DoubleHeal,
    /// Player One fails to heal while Player Two heals.
    P1HealFailedP2Heal,
    /// Player Two fails to heal while Player One heals.
    P2HealFailedP1Heal,
    /// Both try to heal with no heals left.
    DoubleHealFailed,
}

impl Outcome {
    /// Every outcome.
    pub const ALL: [Outcome; 28] = [
        Outcome::SwordClash,
        Outcome::BothHit,
        Outcome::P1Blocked,
        Outcome::P2Blocked,
        Outcome::P1GuardBroken,
        Outcome::P2GuardBroken,
        Outcome::BothBlock,
        Outcome::P1EvadedInto,
        Outcome::P2EvadedInto,
        Outcome::P1Evade,
        Outcome::P2Evade,
        Outcome::P1EvadeGuard,
        Outcome::P2EvadeGuard,
        Outcome::P1GuardEvadeMiss,
        Outcome::P2GuardEvadeMiss,
        Outcome::DoubleDodge,
        Outcome::P1Heal,
        Outcome::P2Heal,
        Outcome::P1HealFailed,
        Outcome::P2HealFailed,
        Outcome::P1HealUnderAttack,
        Outcome::P2HealUnderAttack,
        Outcome::P1HealFailedUnderAttack,
        Outcome::P2HealFailedUnderAttack,
        Outcome::DoubleHeal,
        Outcome::P1HealFailedP2Heal,
        Outcome::P2HealFailedP1Heal,
        Outcome::DoubleHealFailed,
    ];

    /// The same outcome with the two sides swapped.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::SwordClash => Self::SwordClash,
            Self::BothHit => Self::BothHit,
            Self::BothBlock => Self::BothBlock,
            Self::DoubleDodge => Self::DoubleDodge,
            Self::DoubleHeal => Self::DoubleHeal,
            Self::DoubleHealFailed => Self::DoubleHealFailed,
            Self::P1Blocked => Self::P2Blocked,
            Self::P2Blocked => Self::P1Blocked,
            Self::P1GuardBroken => Self::P2GuardBroken,
            Self::P2GuardBroken => Self::P1GuardBroken,
            Self::P1EvadedInto => Self::P2EvadedInto,
            Self::P2EvadedInto => Self::P1EvadedInto,
            Self::P1Evade => Self::P2Evade,
            Self::P2Evade => Self::P1Evade,
            Self::P1EvadeGuard => Self::P2EvadeGuard,
            Self::P2EvadeGuard => Self::P1EvadeGuard,
            Self::P1GuardEvadeMiss => Self::P2GuardEvadeMiss,
            Self::P2GuardEvadeMiss => Self::P1GuardEvadeMiss,
            Self::P1Heal => Self::P2Heal,
            Self::P2Heal => Self::P1Heal,
            Self::P1HealFailed => Self::P2HealFailed,
            Self::P2HealFailed => Self::P1HealFailed,
            Self::P1HealUnderAttack => Self::P2HealUnderAttack,
            Self::P2HealUnderAttack => Self::P1HealUnderAttack,
            Self::P1HealFailedUnderAttack => Self::P2HealFailedUnderAttack,
            Self::P2HealFailedUnderAttack => Self::P1HealFailedUnderAttack,
            Self::P1HealFailedP2Heal => Self::P2HealFailedP1Heal,
            Self::P2HealFailedP1Heal => Self::P1HealFailedP2Heal,
        }
    }

    /// The side a one-sided outcome is about, `None` for symmetric outcomes.
    #[must_use]
    pub const fn subject(self) -> Option<Side> {
        match self {
            Self::SwordClash
            | Self::BothHit
            | Self::BothBlock
            | Self::DoubleDodge
            | Self::DoubleHeal
            | Self::DoubleHealFailed => None,
            Self::P1Blocked
            | Self::P1GuardBroken
            | Self::P1EvadedInto
            | Self::P1Evade
            | Self::P1EvadeGuard
            | Self::P1GuardEvadeMiss
            | Self::P1Heal
            | Self::P1HealFailed
            | Self::P1HealUnderAttack
            | Self::P1HealFailedUnderAttack
            | Self::P1HealFailedP2Heal => Some(Side::One),
            Self::P2Blocked
            | Self::P2GuardBroken
            | Self::P2EvadedInto
            | Self::P2Evade
            | Self::P2EvadeGuard
            | Self::P2GuardEvadeMiss
            | Self::P2Heal
            | Self::P2HealFailed
            | Self::P2HealUnderAttack
            | Self::P2HealFailedUnderAttack
            | Self::P2HealFailedP1Heal => Some(Side::Two),
        }
    }

    /// True when the outcome is guaranteed to apply at least one attack.
    ///
    /// Counter and heal-dodge outcomes are excluded since their hit depends on a roll.
    #[must_use]
    pub const fn deals_damage(self) -> bool {
        matches!(
            self,
            Self::BothHit
                | Self::P1GuardBroken
                | Self::P2GuardBroken
                | Self::P1EvadedInto
                | Self::P2EvadedInto
                | Self::P1HealFailedUnderAttack
                | Self::P2HealFailedUnderAttack
        )
    }

    /// True when nothing mechanical can happen.
    #[must_use]
    pub const fn is_no_op(self) -> bool {
        matches!(
            self,
            Self::SwordClash
                | Self::BothBlock
                | Self::DoubleDodge
                | Self::P1GuardEvadeMiss
                | Self::P2GuardEvadeMiss
                | Self::P1HealFailed
                | Self::P2HealFailed
                | Self::DoubleHealFailed
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn all_is_complete_and_unique() {
        let unique: HashSet<_> = Outcome::ALL.iter().collect();
        assert_eq!(unique.len(), Outcome::ALL.len());
    }

    #[test]
    fn mirroring_twice_is_identity() {
        for outcome in Outcome::ALL {
            assert_eq!(outcome.mirrored().mirrored(), outcome);
        }
    }

    #[test]
    fn symmetric_outcomes_mirror_to_themselves() {
        for outcome in Outcome::ALL {
            if outcome.subject().is_none() {
                assert_eq!(outcome.mirrored(), outcome);
            } else {
                assert_ne!(outcome.mirrored(), outcome);
            }
        }
    }

    #[test]
    fn mirror_swaps_subject() {
        for outcome in Outcome::ALL {
            assert_eq!(
                outcome.mirrored().subject(),
                outcome.subject().map(Side::opponent)
            );
        }
    }

    #[test]
    fn damage_and_no_op_are_disjoint() {
        for outcome in Outcome::ALL {
            assert!(!(outcome.deals_damage() && outcome.is_no_op()), "{outcome}");
        }
    }

    #[test]
    fn serializes_as_variant_name() {
        let json = serde_json::to_string(&Outcome::P1GuardBroken).unwrap();
        assert_eq!(json, "\"P1GuardBroken\"");
    }
}
