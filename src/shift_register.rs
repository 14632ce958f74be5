//! Driver for daisy-chained 74HC595-style serial-in/parallel-out registers.
//!
//! The whole chain is one [`ShiftRegister`] owning the three control lines and
//! the in-memory image of every register. Individual registers are reached
//! through lightweight [`ShiftRegisterHandle`]s that only remember their lane,
//! so the batch flag lives with the bank and is shared by every handle.
//!
//! ```text
//!         ┌───────────────────┐
//!     1 ──┤Q1             VCC ├── 16
//!     2 ──┤Q2              Q0 ├── 15
//!     3 ──┤Q3              DS ├── 14  serial data
//!     4 ──┤Q4              OE ├── 13  GND
//!     5 ──┤Q5            STCP ├── 12  latch clock
//!     6 ──┤Q6            SHCP ├── 11  shift clock
//!     7 ──┤Q7              MR ├── 10  VCC
//!     8 ──┤GND            Q7' ├── 9   next register in the chain
//!         └───────────────────┘
//! ```

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;
use embassy_time::{Duration, Timer};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use log::{debug, info};
use snafu::ensure;

use crate::error::{ChainOverflowSnafu, Error, RangeSnafu};
use crate::output::VirtualPin;

/// Width of every clock edge in microseconds.
///
/// Minimum for the register family at low supply voltages. Platforms without
/// microsecond sleeps must round this up.
pub const PULSE_WIDTH_US: u32 = 5;

/// Number of outputs on a single register.
pub const BITS_PER_REGISTER: u8 = 8;

/// Number of blink cycles at the end of [`ShiftRegister::test_sequence`].
const TEST_BLINKS: usize = 3;

/// The three lines shared by every register of a daisy chain.
pub struct ControlLines<P> {
    /// Serial data input (DS).
    pub data: P,
    /// Storage register clock (STCP). Pulsed once per commit.
    pub latch: P,
    /// Shift register clock (SHCP). Pulsed once per bit.
    pub clock: P,
}

/// Shared state of a register chain as seen by handles and virtual pins.
///
/// Lanes are indexed from the controller outwards: lane 0 is the register
/// wired directly to the data line.
pub trait RegisterBank {
    /// Number of registers in the chain.
    fn registers(&self) -> usize;

    /// In-memory value of one lane.
    fn lane_value(&self, lane: usize) -> Result<u8, Error>;

    /// Update one bit in memory, committing unless a batch is open.
    fn write_bit(&self, lane: usize, position: u8, value: bool) -> Result<(), Error>;

    /// Read back one bit from memory. This is not a hardware readback.
    fn read_bit(&self, lane: usize, position: u8) -> Result<bool, Error>;

    /// Set every lane to `value` and commit.
    fn fill_lanes(&self, value: u8) -> Result<(), Error>;

    /// Defer commits until [`RegisterBank::end_batch`].
    fn begin_batch(&self);

    /// Close the batch and commit exactly once.
    fn end_batch(&self) -> Result<(), Error>;

    /// Whether writes are currently deferred.
    fn is_batching(&self) -> bool;

    /// Shift the whole bank out and latch it.
    fn commit(&self) -> Result<(), Error>;
}

struct Bank<P, D, const N: usize> {
    lines: ControlLines<P>,
    delay: D,
    state: [u8; N],
    batch: bool,
}

impl<P: OutputPin, D: DelayNs, const N: usize> Bank<P, D, N> {
    /// Most distal register first, most significant bit first, then one latch pulse.
    fn shift_out(&mut self) -> Result<(), Error> {
        debug!("Committing registers {:02x?}", self.state);

        for byte in self.state.iter().rev() {
            for bit in (0..BITS_PER_REGISTER).rev() {
                let level = PinState::from((byte >> bit) & 1 == 1);
                self.lines
                    .data
                    .set_state(level)
                    .map_err(|e| Error::pin(&e))?;
                pulse(&mut self.lines.clock, &mut self.delay)?;
            }
        }

        pulse(&mut self.lines.latch, &mut self.delay)
    }

    fn lane_mut(&mut self, lane: usize) -> Result<&mut u8, Error> {
        self.state.get_mut(lane).ok_or(Error::ChainOverflow {
            lane,
            registers: N,
        })
    }
}

/// Low, high, low with [`PULSE_WIDTH_US`] on every edge.
fn pulse<P: OutputPin, D: DelayNs>(pin: &mut P, delay: &mut D) -> Result<(), Error> {
    pin.set_low().map_err(|e| Error::pin(&e))?;
    delay.delay_us(PULSE_WIDTH_US);
    pin.set_high().map_err(|e| Error::pin(&e))?;
    delay.delay_us(PULSE_WIDTH_US);
    pin.set_low().map_err(|e| Error::pin(&e))?;
    delay.delay_us(PULSE_WIDTH_US);
    Ok(())
}

fn mask(position: u8) -> Result<u8, Error> {
    ensure!(position < BITS_PER_REGISTER, RangeSnafu { position });
    Ok(1 << position)
}

/// A chain of `N` registers sharing data, latch and clock lines.
///
/// All state sits behind a critical section so handles can be shared freely;
/// a commit runs to completion inside it.
pub struct ShiftRegister<P, D, const N: usize = 1> {
    inner: Mutex<RefCell<Bank<P, D, N>>>,
}

impl<P: OutputPin, D: DelayNs, const N: usize> ShiftRegister<P, D, N> {
    /// Take ownership of the control lines.
    ///
    /// Every line is driven high and then low so the chain starts from a
    /// known clock phase. The bank starts zeroed but is not committed.
    pub fn new(mut lines: ControlLines<P>, delay: D) -> Result<Self, Error> {
        const { assert!(N > 0, "a chain needs at least one register") };

        for pin in [&mut lines.data, &mut lines.latch, &mut lines.clock] {
            pin.set_high().map_err(|e| Error::pin(&e))?;
        }
        for pin in [&mut lines.data, &mut lines.latch, &mut lines.clock] {
            pin.set_low().map_err(|e| Error::pin(&e))?;
        }

        Ok(Self {
            inner: Mutex::new(RefCell::new(Bank {
                lines,
                delay,
                state: [0; N],
                batch: false,
            })),
        })
    }

    /// Handle to the register nearest the controller.
    pub fn handle(&self) -> ShiftRegisterHandle<'_> {
        ShiftRegisterHandle {
            bank: self,
            position: 0,
        }
    }

    /// Handle to an arbitrary lane of the chain.
    pub fn lane(&self, lane: usize) -> Result<ShiftRegisterHandle<'_>, Error> {
        ensure!(lane < N, ChainOverflowSnafu { lane, registers: N });
        Ok(ShiftRegisterHandle {
            bank: self,
            position: lane,
        })
    }

    /// Snapshot of the in-memory bank.
    pub fn state(&self) -> [u8; N] {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().state)
    }

    /// Give the control lines and delay back.
    pub fn release(self) -> (ControlLines<P>, D) {
        let bank = self.inner.into_inner().into_inner();
        (bank.lines, bank.delay)
    }

    /// Walk a single lit output across the chain and blink everything.
    ///
    /// Lights every output in order, turns them off in the same order, then
    /// blinks the whole chain three times, waiting `step` between changes.
    pub async fn test_sequence(&self, step: Duration) -> Result<(), Error> {
        info!("Running test sequence over {} register(s)", N);
        self.fill_lanes(0x00)?;

        for value in [true, false] {
            for lane in 0..N {
                for position in 0..BITS_PER_REGISTER {
                    self.write_bit(lane, position, value)?;
                    Timer::after(step).await;
                }
            }
        }

        for _ in 0..TEST_BLINKS {
            self.fill_lanes(0xFF)?;
            Timer::after(step).await;
            self.fill_lanes(0x00)?;
            Timer::after(step).await;
        }

        Ok(())
    }
}

impl<P: OutputPin, D: DelayNs, const N: usize> RegisterBank for ShiftRegister<P, D, N> {
    fn registers(&self) -> usize {
        N
    }

    fn lane_value(&self, lane: usize) -> Result<u8, Error> {
        critical_section::with(|cs| {
            let mut bank = self.inner.borrow(cs).borrow_mut();
            bank.lane_mut(lane).map(|byte| *byte)
        })
    }

    fn write_bit(&self, lane: usize, position: u8, value: bool) -> Result<(), Error> {
        let mask = mask(position)?;
        critical_section::with(|cs| {
            let mut bank = self.inner.borrow(cs).borrow_mut();
            let byte = bank.lane_mut(lane)?;
            if value {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
            debug!("Lane {lane} pin {position} {}", if value { "HIGH" } else { "LOW" });

            if bank.batch {
                return Ok(());
            }
            bank.shift_out()
        })
    }

    fn read_bit(&self, lane: usize, position: u8) -> Result<bool, Error> {
        let mask = mask(position)?;
        Ok(self.lane_value(lane)? & mask != 0)
    }

    fn fill_lanes(&self, value: u8) -> Result<(), Error> {
        critical_section::with(|cs| {
            let mut bank = self.inner.borrow(cs).borrow_mut();
            bank.state = [value; N];
            bank.shift_out()
        })
    }

    fn begin_batch(&self) {
        critical_section::with(|cs| {
            self.inner.borrow(cs).borrow_mut().batch = true;
        });
    }

    fn end_batch(&self) -> Result<(), Error> {
        critical_section::with(|cs| {
            let mut bank = self.inner.borrow(cs).borrow_mut();
            bank.batch = false;
            bank.shift_out()
        })
    }

    fn is_batching(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().batch)
    }

    fn commit(&self) -> Result<(), Error> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().shift_out())
    }
}

/// One register of a chain.
///
/// Handles are `Copy`; every handle of a chain refers to the same bank, so
/// batching through one handle defers commits for all of them.
#[derive(Clone, Copy)]
pub struct ShiftRegisterHandle<'a> {
    bank: &'a dyn RegisterBank,
    position: usize,
}

impl<'a> ShiftRegisterHandle<'a> {
    /// Handle to `lane` of an arbitrary bank.
    pub fn new(bank: &'a dyn RegisterBank, lane: usize) -> Result<Self, Error> {
        let registers = bank.registers();
        ensure!(lane < registers, ChainOverflowSnafu { lane, registers });
        Ok(Self {
            bank,
            position: lane,
        })
    }

    /// Lane owned by this handle.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of registers in the whole chain.
    pub fn registers(&self) -> usize {
        self.bank.registers()
    }

    /// In-memory value of this register.
    pub fn value(&self) -> Result<u8, Error> {
        self.bank.lane_value(self.position)
    }

    /// Set or clear output `position`, committing unless a batch is open.
    pub fn set_pin(&self, position: u8, value: bool) -> Result<(), Error> {
        self.bank.write_bit(self.position, position, value)
    }

    /// Logical value of output `position`.
    pub fn get_pin(&self, position: u8) -> Result<bool, Error> {
        self.bank.read_bit(self.position, position)
    }

    pub fn begin_batch(&self) {
        self.bank.begin_batch();
    }

    pub fn end_batch(&self) -> Result<(), Error> {
        self.bank.end_batch()
    }

    pub fn is_batching(&self) -> bool {
        self.bank.is_batching()
    }

    pub fn commit(&self) -> Result<(), Error> {
        self.bank.commit()
    }

    /// Turn off every output of the chain.
    pub fn clear(&self) -> Result<(), Error> {
        info!("Clearing shift register (all bits to 0)");
        self.bank.fill_lanes(0x00)
    }

    /// Turn on every output of the chain.
    pub fn fill(&self) -> Result<(), Error> {
        info!("Filling shift register (all bits to 1)");
        self.bank.fill_lanes(0xFF)
    }

    /// The following register of the chain.
    pub fn next(&self) -> Result<Self, Error> {
        Self::new(self.bank, self.position + 1)
    }

    /// Output `position` of this register as a standalone pin.
    pub fn pin(&self, position: u8) -> Result<VirtualPin<'a>, Error> {
        VirtualPin::new(*self, position)
    }

    /// Whether both handles drive the same chain.
    pub fn same_bank(&self, other: &Self) -> bool {
        core::ptr::addr_eq(self.bank, other.bank)
    }
}

impl fmt::Debug for ShiftRegisterHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShiftRegisterHandle")
            .field("position", &self.position)
            .field("registers", &self.bank.registers())
            .finish()
    }
}
