use super::{Animation, Frame};

/// A single lit cell sweeping through the matrix in row-major order.
#[derive(Debug, Clone, Default)]
pub struct RadarAnimation {
    position: usize,
}

impl RadarAnimation {
    pub const fn new() -> Self {
        Self { position: 0 }
    }
}

impl Animation for RadarAnimation {
    fn render(&mut self, frame: &mut Frame<'_>) {
        let current = self.position;
        frame.fill_linear(|index| index == current);
        self.position = (self.position + 1) % frame.len();
    }

    fn reset(&mut self) {
        self.position = 0;
    }
}
