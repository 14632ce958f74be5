//! Binary counter
//!
//! Every row shows a number in binary, most significant bit in column 0.
//! Row `r` shows `counter + r`, all modulo `2^cols`.

use super::{Animation, Frame};

#[derive(Debug, Clone, Default)]
pub struct BinaryAnimation {
    counter: u64,
}

impl BinaryAnimation {
    pub const fn new() -> Self {
        Self { counter: 0 }
    }
}

/// `value mod 2^cols`; wide matrices simply never wrap.
fn wrap(value: u64, cols: usize) -> u64 {
    u32::try_from(cols)
        .ok()
        .and_then(|bits| 1_u64.checked_shl(bits))
        .map_or(value, |modulus| value % modulus)
}

impl Animation for BinaryAnimation {
    fn render(&mut self, frame: &mut Frame<'_>) {
        let cols = frame.cols();
        let counter = self.counter;
        frame.fill_with(|row, col| {
            let number = wrap(counter.wrapping_add(row as u64), cols);
            let bit = cols - 1 - col;
            bit < 64 && (number >> bit) & 1 == 1
        });
        self.counter = wrap(self.counter.wrapping_add(1), cols);
    }

    fn reset(&mut self) {
        self.counter = 0;
    }
}
