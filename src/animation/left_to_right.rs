use super::{Animation, Frame};

/// Lights one full column at a time, sweeping left to right.
#[derive(Debug, Clone, Default)]
pub struct LeftToRightAnimation {
    col: usize,
}

impl LeftToRightAnimation {
    pub const fn new() -> Self {
        Self { col: 0 }
    }
}

impl Animation for LeftToRightAnimation {
    fn render(&mut self, frame: &mut Frame<'_>) {
        let current = self.col;
        frame.fill_with(|_, col| col == current);
        self.col = (self.col + 1) % frame.cols();
    }

    fn reset(&mut self) {
        self.col = 0;
    }
}
