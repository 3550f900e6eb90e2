//! Injectable randomness for towns, encounters and shops.

use std::collections::VecDeque;

use rand::Rng;

/// Source of the uniform draws the rules engine consumes.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn chance(&mut self) -> f64;

    /// Uniform integer in `low..=high`.
    fn roll(&mut self, low: i32, high: i32) -> i32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn chance(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn roll(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.gen_range(low..=high)
    }
}

/// Replays fixed draws in order.
///
/// Probability draws and integer rolls are queued separately. Once a queue
/// runs dry it keeps yielding the lowest value of the requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    chances: VecDeque<f64>,
    rolls: VecDeque<i32>,
}

impl ScriptedRandom {
    /// Build a script from the probability draws and integer rolls to replay.
    pub fn new(
        chances: impl IntoIterator<Item = f64>,
        rolls: impl IntoIterator<Item = i32>,
    ) -> Self {
        Self {
            chances: chances.into_iter().collect(),
            rolls: rolls.into_iter().collect(),
        }
    }

    /// Script made only of integer rolls.
    pub fn with_rolls(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self::new(Vec::new(), rolls)
    }

    /// Script made only of probability draws.
    pub fn with_chances(chances: impl IntoIterator<Item = f64>) -> Self {
        Self::new(chances, Vec::new())
    }

    /// Draws not yet consumed, as `(chances, rolls)`.
    pub fn remaining(&self) -> (usize, usize) {
        (self.chances.len(), self.rolls.len())
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self) -> f64 {
        self.chances.pop_front().unwrap_or(0.0).clamp(0.0, 0.999_999)
    }

    fn roll(&mut self, low: i32, high: i32) -> i32 {
        self.rolls
            .pop_front()
            .map(|value| value.clamp(low, high.max(low)))
            .unwrap_or(low)
    }
}
