//! Whole-matrix blink

use super::{Animation, Frame};

/// Alternates between all-on and all-off, starting with all-on.
#[derive(Debug, Clone, Default)]
pub struct BlinkAnimation {
    lit: bool,
}

impl BlinkAnimation {
    pub const fn new() -> Self {
        Self { lit: false }
    }
}

impl Animation for BlinkAnimation {
    fn render(&mut self, frame: &mut Frame<'_>) {
        frame.fill(!self.lit);
        self.lit = !self.lit;
    }

    fn reset(&mut self) {
        self.lit = false;
    }
}
