use super::{Animation, Frame};

/// Alternates between odd and even cells, starting with the odd ones.
#[derive(Debug, Clone, Default)]
pub struct StarAnimation {
    even: bool,
}

impl StarAnimation {
    pub const fn new() -> Self {
        Self { even: false }
    }
}

impl Animation for StarAnimation {
    fn render(&mut self, frame: &mut Frame<'_>) {
        let even = self.even;
        frame.fill_linear(|index| (index % 2 == 0) == even);
        self.even = !self.even;
    }

    fn reset(&mut self) {
        self.even = false;
    }
}
