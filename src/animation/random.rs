//! Random sparkle
//!
//! Draws an independent on/off value for every cell and holds the pattern
//! for a few steps. Only the seed of the held pattern is stored; the pattern
//! is redrawn from it on every step.

use super::{Animation, Frame};

/// Steps a pattern stays on the matrix.
const HOLD_STEPS: u8 = 3;

#[derive(Debug, Clone)]
pub struct RandomAnimation {
    rng: fastrand::Rng,
    initial_seed: u64,
    pattern_seed: u64,
    remaining: u8,
}

impl RandomAnimation {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            initial_seed: seed,
            pattern_seed: 0,
            remaining: 0,
        }
    }
}

impl Animation for RandomAnimation {
    fn render(&mut self, frame: &mut Frame<'_>) {
        if self.remaining == 0 {
            self.pattern_seed = self.rng.u64(..);
            self.remaining = HOLD_STEPS;
        }
        self.remaining -= 1;

        let mut pattern = fastrand::Rng::with_seed(self.pattern_seed);
        frame.fill_linear(|_| pattern.bool());
    }

    fn reset(&mut self) {
        *self = Self::new(self.initial_seed);
    }
}
