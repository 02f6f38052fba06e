//! Tuning constants for combat arithmetic.
//!
//! Every roll in the engine is expressed as a half-open range `[min, max)`
//! plus an optional threshold. [`DuelRules::default`] carries the canonical
//! values; rules files may override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DuelError, Result};

/// Configuration for a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelRules {
    /// Die size for critical rolls (roll is `[0, crit_die)`).
    pub crit_die: i32,
    /// Critical hit succeeds when `roll + speed / 2 >= crit_threshold`.
    pub crit_threshold: i32,
    /// Bonus added to a crit roll while countering an unguarded defender.
    pub counter_crit_bonus: i32,
    /// Lower bound (inclusive) of the critical bonus damage roll.
    pub crit_bonus_min: i32,
    /// Upper bound (exclusive) of the critical bonus damage roll.
    pub crit_bonus_max: i32,
    /// Die size for counter rolls (roll is `[0, counter_die)`).
    pub counter_die: i32,
    /// Counter succeeds when `roll + speed >= counter_threshold`.
    pub counter_threshold: i32,
    /// Heals available to a healing-capable archetype per match.
    pub heal_cap: u8,
    /// Lower bound (inclusive) of the heal amount roll.
    pub heal_min: i32,
    /// Upper bound (exclusive) of the heal amount roll.
    pub heal_max: i32,
    /// Die size for the heal-dodge roll (roll is `[0, heal_dodge_die)`).
    pub heal_dodge_die: i32,
    /// A successful healer dodges an incoming swing when the roll meets this.
    pub heal_dodge_threshold: i32,
}

impl Default for DuelRules {
    fn default() -> Self {
        Self {
            crit_die: 20,
            crit_threshold: 12,
            counter_crit_bonus: 5,
            crit_bonus_min: 1,
            crit_bonus_max: 5,
            counter_die: 20,
            counter_threshold: 15,
            heal_cap: 3,
            heal_min: 1,
            heal_max: 10,
            heal_dodge_die: 10,
            heal_dodge_threshold: 6,
        }
    }
}

impl DuelRules {
    /// Parses rules from JSON. Missing fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::RulesParse`] on malformed JSON and
    /// [`DuelError::InvalidRules`] if the parsed rules fail [`Self::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Loads rules from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Self::from_json_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that every roll range is non-empty, every die has a face and
    /// every threshold can be met by the bare die roll.
    ///
    /// # Errors
    ///
    /// Returns [`DuelError::InvalidRules`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let dice = [
            ("crit_die", self.crit_die),
            ("counter_die", self.counter_die),
            ("heal_dodge_die", self.heal_dodge_die),
        ];
        for (name, size) in dice {
            if size <= 0 {
                return Err(DuelError::InvalidRules(format!(
                    "{name} must be positive, got {size}"
                )));
            }
        }

        let ranges = [
            ("crit_bonus", self.crit_bonus_min, self.crit_bonus_max),
            ("heal", self.heal_min, self.heal_max),
        ];
        for (name, min, max) in ranges {
            if min >= max {
                return Err(DuelError::InvalidRules(format!(
                    "{name} range [{min}, {max}) is empty"
                )));
            }
            if min < 0 {
                return Err(DuelError::InvalidRules(format!(
                    "{name} range must not go below zero, got {min}"
                )));
            }
        }

        let thresholds = [
            ("crit_threshold", self.crit_threshold, self.crit_die),
            ("counter_threshold", self.counter_threshold, self.counter_die),
            ("heal_dodge_threshold", self.heal_dodge_threshold, self.heal_dodge_die),
        ];
        for (name, threshold, die) in thresholds {
            if !(0..die).contains(&threshold) {
                return Err(DuelError::InvalidRules(format!(
                    "{name} must be within [0, {die}) to be reachable on its die, got {threshold}"
                )));
            }
        }

        Ok(())
    }
}
