//! Animation system with compile-time known animation variants
//!
//! All animations are stored in an enum to avoid heap allocations.
//! Each animation implements the `Animation` trait and owns only the cursor
//! state it needs; a fresh slot starts from the first frame.

mod binary;
mod blink;
mod left_to_right;
mod ping_pong;
mod pulse;
mod radar;
mod random;
mod sequential;
mod snake;
mod star;

pub use binary::BinaryAnimation;
pub use blink::BlinkAnimation;
pub use left_to_right::LeftToRightAnimation;
pub use ping_pong::PingPongAnimation;
pub use pulse::PulseAnimation;
pub use radar::RadarAnimation;
pub use random::RandomAnimation;
pub use sequential::SequentialAnimation;
pub use snake::SnakeAnimation;
pub use star::StarAnimation;

const ANIMATION_NAME_BLINK: &str = "blink";
const ANIMATION_NAME_LEFT_TO_RIGHT: &str = "left-to-right";
const ANIMATION_NAME_SEQUENTIAL: &str = "sequential";
const ANIMATION_NAME_PING_PONG: &str = "ping-pong";
const ANIMATION_NAME_BINARY: &str = "binary";
const ANIMATION_NAME_RADAR: &str = "radar";
const ANIMATION_NAME_SNAKE: &str = "snake";
const ANIMATION_NAME_RANDOM: &str = "random";
const ANIMATION_NAME_STAR: &str = "star";
const ANIMATION_NAME_PULSE: &str = "pulse";

const ANIMATION_ID_BLINK: u8 = 0;
const ANIMATION_ID_LEFT_TO_RIGHT: u8 = 1;
const ANIMATION_ID_SEQUENTIAL: u8 = 2;
const ANIMATION_ID_PING_PONG: u8 = 3;
const ANIMATION_ID_BINARY: u8 = 4;
const ANIMATION_ID_RADAR: u8 = 5;
const ANIMATION_ID_SNAKE: u8 = 6;
const ANIMATION_ID_RANDOM: u8 = 7;
const ANIMATION_ID_STAR: u8 = 8;
const ANIMATION_ID_PULSE: u8 = 9;

/// A row-major on/off image of the whole matrix.
pub struct Frame<'a> {
    cells: &'a mut [bool],
    cols: usize,
}

impl<'a> Frame<'a> {
    /// Wrap a row-major buffer whose length is a multiple of `cols`.
    pub fn new(cells: &'a mut [bool], cols: usize) -> Self {
        debug_assert!(cols > 0 && cells.len() % cols == 0);
        Self { cells, cols }
    }

    pub fn rows(&self) -> usize {
        self.cells.len() / self.cols
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        col < self.cols && self.cells.get(row * self.cols + col).copied().unwrap_or(false)
    }

    pub fn fill(&mut self, on: bool) {
        self.cells.fill(on);
    }

    /// Set every cell from a predicate over `(row, col)`.
    pub fn fill_with(&mut self, mut pattern: impl FnMut(usize, usize) -> bool) {
        let cols = self.cols;
        for (index, cell) in self.cells.iter_mut().enumerate() {
            *cell = pattern(index / cols, index % cols);
        }
    }

    /// Set every cell from a predicate over its linear (row-major) index.
    pub fn fill_linear(&mut self, mut pattern: impl FnMut(usize) -> bool) {
        for (index, cell) in self.cells.iter_mut().enumerate() {
            *cell = pattern(index);
        }
    }
}

pub trait Animation {
    /// Render the next frame and advance the cursor
    fn render(&mut self, frame: &mut Frame<'_>);

    /// Rewind to the first frame
    fn reset(&mut self);
}

/// Animation slot - enum containing all possible animations
#[derive(Debug, Clone)]
pub enum AnimationSlot {
    Blink(BlinkAnimation),
    LeftToRight(LeftToRightAnimation),
    Sequential(SequentialAnimation),
    PingPong(PingPongAnimation),
    Binary(BinaryAnimation),
    Radar(RadarAnimation),
    Snake(SnakeAnimation),
    Random(RandomAnimation),
    Star(StarAnimation),
    Pulse(PulseAnimation),
}

/// Known animation ids, in cycling order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AnimationId {
    #[default]
    Blink = ANIMATION_ID_BLINK,
    LeftToRight = ANIMATION_ID_LEFT_TO_RIGHT,
    Sequential = ANIMATION_ID_SEQUENTIAL,
    PingPong = ANIMATION_ID_PING_PONG,
    Binary = ANIMATION_ID_BINARY,
    Radar = ANIMATION_ID_RADAR,
    Snake = ANIMATION_ID_SNAKE,
    Random = ANIMATION_ID_RANDOM,
    Star = ANIMATION_ID_STAR,
    Pulse = ANIMATION_ID_PULSE,
}

impl AnimationId {
    /// Every animation in cycling order.
    pub const ALL: [Self; 10] = [
        Self::Blink,
        Self::LeftToRight,
        Self::Sequential,
        Self::PingPong,
        Self::Binary,
        Self::Radar,
        Self::Snake,
        Self::Random,
        Self::Star,
        Self::Pulse,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            ANIMATION_ID_BLINK => Self::Blink,
            ANIMATION_ID_LEFT_TO_RIGHT => Self::LeftToRight,
            ANIMATION_ID_SEQUENTIAL => Self::Sequential,
            ANIMATION_ID_PING_PONG => Self::PingPong,
            ANIMATION_ID_BINARY => Self::Binary,
            ANIMATION_ID_RADAR => Self::Radar,
            ANIMATION_ID_SNAKE => Self::Snake,
            ANIMATION_ID_RANDOM => Self::Random,
            ANIMATION_ID_STAR => Self::Star,
            ANIMATION_ID_PULSE => Self::Pulse,
            _ => return None,
        })
    }

    /// The following animation, wrapping after [`AnimationId::Pulse`].
    pub fn next(self) -> Self {
        let index = (self as usize + 1) % Self::ALL.len();
        Self::ALL[index]
    }

    /// `seed` only matters for [`AnimationId::Random`].
    pub fn to_slot(self, seed: u64) -> AnimationSlot {
        match self {
            Self::Blink => AnimationSlot::Blink(BlinkAnimation::new()),
            Self::LeftToRight => AnimationSlot::LeftToRight(LeftToRightAnimation::new()),
            Self::Sequential => AnimationSlot::Sequential(SequentialAnimation::new()),
            Self::PingPong => AnimationSlot::PingPong(PingPongAnimation::new()),
            Self::Binary => AnimationSlot::Binary(BinaryAnimation::new()),
            Self::Radar => AnimationSlot::Radar(RadarAnimation::new()),
            Self::Snake => AnimationSlot::Snake(SnakeAnimation::new()),
            Self::Random => AnimationSlot::Random(RandomAnimation::new(seed)),
            Self::Star => AnimationSlot::Star(StarAnimation::new()),
            Self::Pulse => AnimationSlot::Pulse(PulseAnimation::new()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blink => ANIMATION_NAME_BLINK,
            Self::LeftToRight => ANIMATION_NAME_LEFT_TO_RIGHT,
            Self::Sequential => ANIMATION_NAME_SEQUENTIAL,
            Self::PingPong => ANIMATION_NAME_PING_PONG,
            Self::Binary => ANIMATION_NAME_BINARY,
            Self::Radar => ANIMATION_NAME_RADAR,
            Self::Snake => ANIMATION_NAME_SNAKE,
            Self::Random => ANIMATION_NAME_RANDOM,
            Self::Star => ANIMATION_NAME_STAR,
            Self::Pulse => ANIMATION_NAME_PULSE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            ANIMATION_NAME_BLINK => Some(Self::Blink),
            ANIMATION_NAME_LEFT_TO_RIGHT => Some(Self::LeftToRight),
            ANIMATION_NAME_SEQUENTIAL => Some(Self::Sequential),
            ANIMATION_NAME_PING_PONG => Some(Self::PingPong),
            ANIMATION_NAME_BINARY => Some(Self::Binary),
            ANIMATION_NAME_RADAR => Some(Self::Radar),
            ANIMATION_NAME_SNAKE => Some(Self::Snake),
            ANIMATION_NAME_RANDOM => Some(Self::Random),
            ANIMATION_NAME_STAR => Some(Self::Star),
            ANIMATION_NAME_PULSE => Some(Self::Pulse),
            _ => None,
        }
    }

    /// Parse a name, falling back to [`AnimationId::Blink`] with a warning.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse_from_str(s).unwrap_or_else(|| {
            log::warn!("Invalid animation '{}', using '{}'", s, ANIMATION_NAME_BLINK);
            Self::Blink
        })
    }
}

impl AnimationSlot {
    /// Render the current animation
    pub fn render(&mut self, frame: &mut Frame<'_>) {
        match self {
            Self::Blink(animation) => animation.render(frame),
            Self::LeftToRight(animation) => animation.render(frame),
            Self::Sequential(animation) => animation.render(frame),
            Self::PingPong(animation) => animation.render(frame),
            Self::Binary(animation) => animation.render(frame),
            Self::Radar(animation) => animation.render(frame),
            Self::Snake(animation) => animation.render(frame),
            Self::Random(animation) => animation.render(frame),
            Self::Star(animation) => animation.render(frame),
            Self::Pulse(animation) => animation.render(frame),
        }
    }

    /// Reset the animation state
    pub fn reset(&mut self) {
        match self {
            Self::Blink(animation) => animation.reset(),
            Self::LeftToRight(animation) => animation.reset(),
            Self::Sequential(animation) => animation.reset(),
            Self::PingPong(animation) => animation.reset(),
            Self::Binary(animation) => animation.reset(),
            Self::Radar(animation) => animation.reset(),
            Self::Snake(animation) => animation.reset(),
            Self::Random(animation) => animation.reset(),
            Self::Star(animation) => animation.reset(),
            Self::Pulse(animation) => animation.reset(),
        }
    }

    /// Get the animation ID for external observation
    pub fn id(&self) -> AnimationId {
        match self {
            Self::Blink(_) => AnimationId::Blink,
            Self::LeftToRight(_) => AnimationId::LeftToRight,
            Self::Sequential(_) => AnimationId::Sequential,
            Self::PingPong(_) => AnimationId::PingPong,
            Self::Binary(_) => AnimationId::Binary,
            Self::Radar(_) => AnimationId::Radar,
            Self::Snake(_) => AnimationId::Snake,
            Self::Random(_) => AnimationId::Random,
            Self::Star(_) => AnimationId::Star,
            Self::Pulse(_) => AnimationId::Pulse,
        }
    }
}

impl Default for AnimationSlot {
    fn default() -> Self {
        Self::Blink(BlinkAnimation::new())
    }
}
