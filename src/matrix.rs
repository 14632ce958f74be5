//! LED matrix over mixed direct-pin and shift-register outputs.

use embassy_time::{Duration, Timer};
use embedded_hal::digital::StatefulOutputPin;
use log::{error, info};
use snafu::ensure;

use crate::animation::{AnimationId, AnimationSlot, Frame};
use crate::control::{MatrixControl, MatrixIntent};
use crate::error::{CellOutOfRangeSnafu, Error, InvalidCellSnafu};
use crate::output::{OutputUnit, Polarity, VirtualPin};
use crate::shift_register::{BITS_PER_REGISTER, ShiftRegisterHandle};

/// Default pause between animation steps.
pub const DEFAULT_ANIMATION_DELAY: Duration = Duration::from_millis(300);

/// How often an unpowered monitor looks at the control queue.
pub const IDLE_POLL: Duration = Duration::from_millis(100);

/// Golden ratio increment, so every random activation gets a new seed.
const SEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// Configuration for the LED matrix
#[derive(Debug, Clone)]
pub struct MatrixConfig {
    /// Animation selected at start-up.
    pub animation: AnimationId,
    /// Pause after every animation step.
    pub animation_delay: Duration,
    /// Polarity of cells given as `(register, bit)` pairs.
    pub polarity: Polarity,
    /// Seed for the random animation.
    pub seed: u64,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            animation: AnimationId::Blink,
            animation_delay: DEFAULT_ANIMATION_DELAY,
            polarity: Polarity::ActiveHigh,
            seed: 0x5EED,
        }
    }
}

impl MatrixConfig {
    /// Select the start-up animation by name; unknown names become `blink`.
    #[must_use]
    pub fn with_animation_name(mut self, name: &str) -> Self {
        self.animation = AnimationId::parse_or_default(name);
        self
    }
}

/// What a caller may put in a matrix cell.
pub enum MatrixCell<'a, P> {
    /// A ready output unit.
    Output(OutputUnit<'a, P>),
    /// Bit of a register, bound with [`MatrixConfig::polarity`].
    Register(ShiftRegisterHandle<'a>, u8),
}

impl<'a, P> From<OutputUnit<'a, P>> for MatrixCell<'a, P> {
    fn from(unit: OutputUnit<'a, P>) -> Self {
        Self::Output(unit)
    }
}

impl<'a, P> From<VirtualPin<'a>> for MatrixCell<'a, P> {
    fn from(pin: VirtualPin<'a>) -> Self {
        Self::Register(pin.register(), pin.position())
    }
}

/// Requested logical state of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellState {
    pub row: usize,
    pub col: usize,
    pub on: bool,
}

impl CellState {
    pub const fn new(row: usize, col: usize, on: bool) -> Self {
        Self { row, col, on }
    }
}

/// A `ROWS` x `COLS` grid of outputs with an animation scheduler.
///
/// `P` is the type of the direct pins; use [`NoPin`](crate::NoPin) for a
/// matrix wired only to shift registers.
pub struct LedMatrix<'a, P, const ROWS: usize, const COLS: usize> {
    cells: [[OutputUnit<'a, P>; COLS]; ROWS],
    frame: [[bool; COLS]; ROWS],

    animation: AnimationSlot,
    animation_delay: Duration,
    seed: u64,

    powered: bool,
    running: bool,
}

impl<'a, P: StatefulOutputPin, const ROWS: usize, const COLS: usize> LedMatrix<'a, P, ROWS, COLS> {
    /// Bind every cell to its output.
    ///
    /// Fails with [`Error::InvalidCell`] for a register cell whose bit does
    /// not exist. Nothing is written to the hardware.
    pub fn new(cells: [[MatrixCell<'a, P>; COLS]; ROWS], config: &MatrixConfig) -> Result<Self, Error> {
        const { assert!(ROWS > 0 && COLS > 0, "a matrix needs at least one cell") };

        for (row, line) in cells.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                if let MatrixCell::Register(_, position) = cell {
                    ensure!(
                        *position < BITS_PER_REGISTER,
                        InvalidCellSnafu { row, col }
                    );
                }
            }
        }

        let polarity = config.polarity;
        let cells = cells.map(|line| {
            line.map(|cell| match cell {
                MatrixCell::Output(unit) => unit,
                MatrixCell::Register(register, position) => {
                    OutputUnit::from_virtual(VirtualPin::bound(register, position), polarity)
                }
            })
        });

        info!("Initializing with animation: {}", config.animation.as_str());

        Ok(Self {
            cells,
            frame: [[false; COLS]; ROWS],
            animation: config.animation.to_slot(config.seed),
            animation_delay: config.animation_delay,
            seed: config.seed,
            powered: true,
            running: true,
        })
    }

    pub const fn rows(&self) -> usize {
        ROWS
    }

    pub const fn cols(&self) -> usize {
        COLS
    }

    /// Logical state of a cell as read back from its backend.
    pub fn is_on(&mut self, row: usize, col: usize) -> Result<bool, Error> {
        self.unit_mut(row, col)?.is_on()
    }

    pub fn set_pixel(&mut self, row: usize, col: usize, on: bool) -> Result<(), Error> {
        self.apply(&[CellState::new(row, col, on)])
    }

    pub fn toggle_pixel(&mut self, row: usize, col: usize) -> Result<(), Error> {
        let on = self.is_on(row, col)?;
        self.set_pixel(row, col, !on)
    }

    pub fn set_row(&mut self, row: usize, values: &[bool; COLS]) -> Result<(), Error> {
        let mut states = [CellState::new(row, 0, false); COLS];
        for (col, (state, on)) in states.iter_mut().zip(values).enumerate() {
            *state = CellState::new(row, col, *on);
        }
        self.apply(&states)
    }

    pub fn set_column(&mut self, col: usize, values: &[bool; ROWS]) -> Result<(), Error> {
        let mut states = [CellState::new(0, col, false); ROWS];
        for (row, (state, on)) in states.iter_mut().zip(values).enumerate() {
            *state = CellState::new(row, col, *on);
        }
        self.apply(&states)
    }

    /// Turn every cell off.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.apply_pattern(|_, _| false)
    }

    /// Turn every cell on.
    pub fn fill(&mut self) -> Result<(), Error> {
        self.apply_pattern(|_, _| true)
    }

    /// Set every cell from a predicate over `(row, col)` in one synchronized commit.
    pub fn apply_pattern(&mut self, pattern: impl FnMut(usize, usize) -> bool) -> Result<(), Error> {
        Frame::new(self.frame.as_flattened_mut(), COLS).fill_with(pattern);
        self.apply_frame()
    }

    /// Apply a batch of cell changes as one frame.
    ///
    /// Register-backed cells are written first with their registers in batch
    /// mode, so each touched register commits exactly once. Direct pins are
    /// written only after every register has latched.
    pub fn apply(&mut self, states: &[CellState]) -> Result<(), Error> {
        for state in states {
            ensure!(
                state.row < ROWS && state.col < COLS,
                CellOutOfRangeSnafu {
                    row: state.row,
                    col: state.col
                }
            );
        }
        self.apply_synced(states.iter().copied())
    }

    fn apply_frame(&mut self) -> Result<(), Error> {
        let frame = self.frame;
        let states = (0..ROWS).flat_map(move |row| {
            (0..COLS).map(move |col| CellState::new(row, col, frame[row][col]))
        });
        self.apply_synced(states)
    }

    fn apply_synced<I>(&mut self, states: I) -> Result<(), Error>
    where
        I: Iterator<Item = CellState> + Clone,
    {
        for state in states.clone() {
            if let Some(register) = self.unit(state).shift_register() {
                register.begin_batch();
            }
        }

        let mut result = Ok(());
        for state in states.clone() {
            let unit = &mut self.cells[state.row][state.col];
            if unit.shift_register().is_some() {
                if let Err(err) = unit.set(state.on) {
                    result = Err(err);
                    break;
                }
            }
        }

        // Batches are closed even after a failed write, once per distinct bank.
        for (index, state) in states.clone().enumerate() {
            let Some(register) = self.unit(state).shift_register() else {
                continue;
            };
            let seen = states.clone().take(index).any(|earlier| {
                self.unit(earlier)
                    .shift_register()
                    .is_some_and(|other| other.same_bank(&register))
            });
            if !seen {
                let committed = register.end_batch();
                if result.is_ok() {
                    result = committed;
                }
            }
        }
        result?;

        for state in states {
            let unit = &mut self.cells[state.row][state.col];
            if unit.shift_register().is_none() {
                unit.set(state.on)?;
            }
        }
        Ok(())
    }

    fn unit(&self, state: CellState) -> &OutputUnit<'a, P> {
        &self.cells[state.row][state.col]
    }

    fn unit_mut(&mut self, row: usize, col: usize) -> Result<&mut OutputUnit<'a, P>, Error> {
        self.cells
            .get_mut(row)
            .and_then(|line| line.get_mut(col))
            .ok_or(Error::CellOutOfRange { row, col })
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Powering off stops stepping and clears the matrix; powering on
    /// restarts the current animation from its first frame.
    pub fn toggle_power(&mut self) -> Result<(), Error> {
        self.powered = !self.powered;
        info!("Power toggled: {}", if self.powered { "on" } else { "off" });

        if self.powered {
            self.animation.reset();
            Ok(())
        } else {
            self.clear()
        }
    }

    pub fn current_animation(&self) -> AnimationId {
        self.animation.id()
    }

    /// Advance to the next animation, wrapping. Ignored while powered off.
    pub fn cycle_animation(&mut self) {
        if !self.powered {
            return;
        }
        self.select_animation(self.animation.id().next());
    }

    /// Replace the running animation with a fresh one.
    pub fn select_animation(&mut self, id: AnimationId) {
        self.seed = self.seed.wrapping_add(SEED_STEP);
        self.animation = id.to_slot(self.seed);
        info!("Animation changed to: {}", id.as_str());
    }

    pub fn animation_delay(&self) -> Duration {
        self.animation_delay
    }

    pub fn set_animation_delay(&mut self, delay: Duration) {
        self.animation_delay = delay;
    }

    /// Render the next animation frame and commit it. No-op while powered off.
    pub fn step(&mut self) -> Result<(), Error> {
        if !self.powered {
            return Ok(());
        }
        let mut frame = Frame::new(self.frame.as_flattened_mut(), COLS);
        self.animation.render(&mut frame);
        self.apply_frame()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Make the monitor return once it next checks.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// One monitor iteration without the wait.
    ///
    /// Drains the control queue, then steps the animation if powered.
    /// Returns how long to wait before the next call, or `None` once stopped.
    pub fn tick<const SIZE: usize>(
        &mut self,
        control: &MatrixControl<SIZE>,
    ) -> Result<Option<Duration>, Error> {
        while let Some(intent) = control.try_receive() {
            self.handle_intent(intent)?;
        }
        if !self.running {
            return Ok(None);
        }
        if !self.powered {
            return Ok(Some(IDLE_POLL));
        }
        self.step()?;
        Ok(Some(self.animation_delay))
    }

    /// Drive the animation until stopped.
    ///
    /// A failing step or control action is logged and ends the loop with
    /// that error; there is no retry.
    pub async fn monitor<const SIZE: usize>(
        &mut self,
        control: &MatrixControl<SIZE>,
    ) -> Result<(), Error> {
        self.running = true;
        info!(
            "Starting monitor with animation: {}",
            self.animation.id().as_str()
        );

        loop {
            match self.tick(control) {
                Ok(Some(pause)) => Timer::after(pause).await,
                Ok(None) => break,
                Err(err) => {
                    error!("Animation error: {err}");
                    self.running = false;
                    return Err(err);
                }
            }
        }

        info!("Monitor stopped");
        Ok(())
    }

    fn handle_intent(&mut self, intent: MatrixIntent) -> Result<(), Error> {
        match intent {
            MatrixIntent::TogglePower => self.toggle_power()?,
            MatrixIntent::CycleAnimation => self.cycle_animation(),
            MatrixIntent::SelectAnimation(id) => self.select_animation(id),
            MatrixIntent::SetAnimationDelay(delay) => self.set_animation_delay(delay),
            MatrixIntent::Stop => self.stop(),
        }
        Ok(())
    }
}
