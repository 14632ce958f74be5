//! Pulse
//!
//! Grows a lit prefix of the matrix over four phases, then shrinks it over
//! the next four.

use super::{Animation, Frame};

const PHASES: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct PulseAnimation {
    phase: usize,
}

impl PulseAnimation {
    pub const fn new() -> Self {
        Self { phase: 0 }
    }

    /// Number of lit cells at `phase`.
    const fn lit(phase: usize) -> usize {
        if phase < PHASES / 2 {
            phase + 1
        } else {
            PHASES - phase
        }
    }
}

impl Animation for PulseAnimation {
    fn render(&mut self, frame: &mut Frame<'_>) {
        let lit = Self::lit(self.phase);
        frame.fill_linear(|index| index < lit);
        self.phase = (self.phase + 1) % PHASES;
    }

    fn reset(&mut self) {
        self.phase = 0;
    }
}
