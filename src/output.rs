//! On/off outputs over either a direct pin or one bit of a shift register.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, PinState, StatefulOutputPin};
use log::debug;
use snafu::ensure;

use crate::error::{Error, InvalidBackendSnafu, RangeSnafu};
use crate::shift_register::{BITS_PER_REGISTER, ShiftRegisterHandle};

/// Which electrical level means "on".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Logical on drives the backend high.
    #[default]
    ActiveHigh,
    /// Logical on drives the backend low (LED wired to the supply).
    ActiveLow,
}

impl Polarity {
    /// Raw backend level for a logical state.
    pub const fn level(self, on: bool) -> bool {
        match self {
            Self::ActiveHigh => on,
            Self::ActiveLow => !on,
        }
    }

    /// Logical state for a raw backend level.
    pub const fn is_on(self, level: bool) -> bool {
        self.level(level)
    }
}

/// One output of a shift register, usable like a pin.
#[derive(Debug, Clone, Copy)]
pub struct VirtualPin<'a> {
    register: ShiftRegisterHandle<'a>,
    position: u8,
}

impl<'a> VirtualPin<'a> {
    pub fn new(register: ShiftRegisterHandle<'a>, position: u8) -> Result<Self, Error> {
        ensure!(position < BITS_PER_REGISTER, RangeSnafu { position });
        Ok(Self { register, position })
    }

    /// Caller has already checked `position`.
    pub(crate) const fn bound(register: ShiftRegisterHandle<'a>, position: u8) -> Self {
        Self { register, position }
    }

    pub fn register(&self) -> ShiftRegisterHandle<'a> {
        self.register
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    /// Logical bit as held in the register bank.
    pub fn read(&self) -> Result<bool, Error> {
        self.register.get_pin(self.position)
    }

    pub fn write(&self, value: bool) -> Result<(), Error> {
        self.register.set_pin(self.position, value)
    }
}

impl ErrorType for VirtualPin<'_> {
    type Error = Error;
}

impl OutputPin for VirtualPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

impl StatefulOutputPin for VirtualPin<'_> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.read()
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.read().map(|level| !level)
    }
}

/// Placeholder direct pin type for matrices wired only to shift registers.
///
/// It has no values, so a `Direct(NoPin)` backend can never be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPin {}

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }
}

impl StatefulOutputPin for NoPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        match *self {}
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        match *self {}
    }
}

/// Where an output unit sends its level. Resolved once at construction.
#[derive(Debug)]
pub enum OutputBackend<'a, P> {
    /// A controller GPIO.
    Direct(P),
    /// One bit of a shift register.
    Virtual(VirtualPin<'a>),
}

/// A logical on/off device independent of how it is wired.
#[derive(Debug)]
pub struct OutputUnit<'a, P> {
    backend: OutputBackend<'a, P>,
    polarity: Polarity,
}

impl<'a, P: StatefulOutputPin> OutputUnit<'a, P> {
    /// Output on a controller pin.
    pub fn direct(pin: P, polarity: Polarity) -> Self {
        Self {
            backend: OutputBackend::Direct(pin),
            polarity,
        }
    }

    /// Output on bit `position` of a register.
    pub fn register(
        register: ShiftRegisterHandle<'a>,
        position: u8,
        polarity: Polarity,
    ) -> Result<Self, Error> {
        ensure!(
            position < BITS_PER_REGISTER,
            InvalidBackendSnafu { position }
        );
        Ok(Self::from_virtual(VirtualPin::bound(register, position), polarity))
    }

    pub fn from_virtual(pin: VirtualPin<'a>, polarity: Polarity) -> Self {
        Self {
            backend: OutputBackend::Virtual(pin),
            polarity,
        }
    }

    pub fn backend(&self) -> &OutputBackend<'a, P> {
        &self.backend
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Register this unit writes to, if any.
    pub fn shift_register(&self) -> Option<ShiftRegisterHandle<'a>> {
        match &self.backend {
            OutputBackend::Direct(_) => None,
            OutputBackend::Virtual(pin) => Some(pin.register()),
        }
    }

    pub fn on(&mut self) -> Result<(), Error> {
        self.set(true)
    }

    pub fn off(&mut self) -> Result<(), Error> {
        self.set(false)
    }

    pub fn toggle(&mut self) -> Result<(), Error> {
        let level = self.value()?;
        self.set_value(!level)
    }

    /// Apply a logical state through the polarity.
    pub fn set(&mut self, on: bool) -> Result<(), Error> {
        self.set_value(self.polarity.level(on))
    }

    /// Logical state derived from the backend level.
    pub fn is_on(&mut self) -> Result<bool, Error> {
        Ok(self.polarity.is_on(self.value()?))
    }

    /// Raw backend level, no polarity applied.
    pub fn value(&mut self) -> Result<bool, Error> {
        match &mut self.backend {
            OutputBackend::Direct(pin) => pin.is_set_high().map_err(|e| Error::pin(&e)),
            OutputBackend::Virtual(pin) => pin.read(),
        }
    }

    /// Drive the raw backend level, no polarity applied.
    pub fn set_value(&mut self, level: bool) -> Result<(), Error> {
        match &mut self.backend {
            OutputBackend::Direct(pin) => {
                debug!("Direct pin {}", if level { "HIGH" } else { "LOW" });
                pin.set_state(PinState::from(level))
                    .map_err(|e| Error::pin(&e))
            }
            OutputBackend::Virtual(pin) => pin.write(level),
        }
    }
}
