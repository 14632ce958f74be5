use super::{Animation, Frame};

/// Number of lit cells, head included.
const SNAKE_LENGTH: usize = 3;

/// A three cell snake crawling through the matrix in row-major order.
#[derive(Debug, Clone, Default)]
pub struct SnakeAnimation {
    head: usize,
}

impl SnakeAnimation {
    pub const fn new() -> Self {
        Self { head: 0 }
    }
}

impl Animation for SnakeAnimation {
    fn render(&mut self, frame: &mut Frame<'_>) {
        let total = frame.len();
        let head = self.head;
        // Distance behind the head, wrapping around the end of the matrix.
        frame.fill_linear(|index| (head + total - index) % total < SNAKE_LENGTH);
        self.head = (self.head + 1) % total;
    }

    fn reset(&mut self) {
        self.head = 0;
    }
}
