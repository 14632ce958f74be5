use super::{Animation, Frame};

/// Lights a single cell, walking each row left to right, then the next row.
#[derive(Debug, Clone, Default)]
pub struct SequentialAnimation {
    row: usize,
    col: usize,
}

impl SequentialAnimation {
    pub const fn new() -> Self {
        Self { row: 0, col: 0 }
    }
}

impl Animation for SequentialAnimation {
    fn render(&mut self, frame: &mut Frame<'_>) {
        let (current_row, current_col) = (self.row, self.col);
        frame.fill_with(|row, col| row == current_row && col == current_col);

        self.col += 1;
        if self.col >= frame.cols() {
            self.col = 0;
            self.row += 1;
            if self.row >= frame.rows() {
                self.row = 0;
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
