//! Bouncing diagonal
//!
//! Each row lights the column `(cursor + row) mod cols`, so the rows form a
//! cascading diagonal. The cursor bounces between the edges.

use super::{Animation, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Right,
    Left,
}

#[derive(Debug, Clone)]
pub struct PingPongAnimation {
    cursor: isize,
    direction: Direction,
}

impl Default for PingPongAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl PingPongAnimation {
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            direction: Direction::Right,
        }
    }
}

impl Animation for PingPongAnimation {
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn render(&mut self, frame: &mut Frame<'_>) {
        let cols = frame.cols() as isize;
        let cursor = self.cursor;
        frame.fill_with(|row, col| (cursor + row as isize).rem_euclid(cols) as usize == col);

        // The frame above is drawn from the cursor before the edge check.
        if self.cursor >= cols - 1 {
            self.direction = Direction::Left;
        } else if self.cursor <= 0 {
            self.direction = Direction::Right;
        }

        self.cursor += match self.direction {
            Direction::Right => 1,
            Direction::Left => -1,
        };
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
