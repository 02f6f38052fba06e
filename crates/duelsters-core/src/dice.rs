//! The match's shared random source.
//!
//! All randomness flows through [`Dice`], which a [`Match`](crate::simulation::Match)
//! owns for its whole lifetime. Production matches use a seeded
//! [`ChaCha8Rng`]; tests script exact rolls with [`ScriptedDice`].

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A source of uniform integer rolls.
pub trait Dice {
    /// Rolls uniformly in `[low, high)`.
    ///
    /// Callers guarantee `low < high`.
    fn roll(&mut self, low: i32, high: i32) -> i32;
}

impl Dice for ChaCha8Rng {
    fn roll(&mut self, low: i32, high: i32) -> i32 {
        let value = self.gen_range(low..high);
        tracing::trace!(low, high, value, "dice roll");
        value
    }
}

/// Creates the deterministic dice used by seeded matches.
#[must_use]
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Dice that replay a fixed script of results.
///
/// Each scripted value is clamped into the requested range so a script
/// written for one set of rules never produces an out-of-range roll.
/// Once the script runs out every roll returns `low`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    script: VecDeque<i32>,
    consumed: usize,
}

impl ScriptedDice {
    /// Creates dice that return `rolls` in order.
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self {
            script: rolls.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Appends more rolls to the end of the script.
    pub fn push(&mut self, roll: i32) {
        self.script.push_back(roll);
    }

    /// Number of rolls taken so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Number of scripted rolls not yet used.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, low: i32, high: i32) -> i32 {
        self.consumed += 1;
        match self.script.pop_front() {
            Some(value) => value.clamp(low, high - 1),
            None => low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_dice_are_reproducible() {
        let mut a = seeded(7);
        let mut b = seeded(7);
        let rolls_a: Vec<i32> = (0..32).map(|_| a.roll(0, 20)).collect();
        let rolls_b: Vec<i32> = (0..32).map(|_| b.roll(0, 20)).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn seeded_rolls_stay_in_range() {
        let mut dice = seeded(99);
        for _ in 0..1000 {
            let value = dice.roll(1, 5);
            assert!((1..5).contains(&value));
        }
    }

    #[test]
    fn scripted_dice_replay_in_order() {
        let mut dice = ScriptedDice::new([3, 17, 0]);
        assert_eq!(dice.roll(0, 20), 3);
        assert_eq!(dice.roll(0, 20), 17);
        assert_eq!(dice.roll(0, 20), 0);
        assert_eq!(dice.consumed(), 3);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn scripted_dice_clamp_and_fall_back_to_low() {
        let mut dice = ScriptedDice::new([50, -4]);
        assert_eq!(dice.roll(0, 10), 9);
        assert_eq!(dice.roll(1, 10), 1);
        assert_eq!(dice.roll(2, 6), 2);
    }
}
