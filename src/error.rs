use embedded_hal::digital::ErrorKind;
use snafu::prelude::*;

/// Errors of the shift register driver and the LED matrix.
///
/// Apart from [`Error::Pin`], every variant points at a wiring or
/// configuration bug and is not worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// A bit position outside of `0..8` was requested.
    #[snafu(display("bit position {position} is outside 0..8"))]
    Range { position: u8 },
    /// A register lane past the end of the daisy chain was requested.
    #[snafu(display("no register at lane {lane}, the chain has {registers}"))]
    ChainOverflow { lane: usize, registers: usize },
    /// An output unit was bound to a register bit that does not exist.
    #[snafu(display("cannot bind an output to register bit {position}"))]
    InvalidBackend { position: u8 },
    /// A matrix cell could not be turned into an output unit.
    #[snafu(display("cell ({row}, {col}) is not a valid output"))]
    InvalidCell { row: usize, col: usize },
    /// A pixel address outside of the matrix.
    #[snafu(display("cell ({row}, {col}) is outside the matrix"))]
    CellOutOfRange { row: usize, col: usize },
    /// The HAL failed to drive a pin.
    #[snafu(display("pin operation failed: {kind:?}"))]
    Pin { kind: ErrorKind },
}

impl Error {
    /// Wraps a HAL pin error.
    pub(crate) fn pin<E: embedded_hal::digital::Error>(err: &E) -> Self {
        Self::Pin { kind: err.kind() }
    }
}

/// Lets [`VirtualPin`](crate::output::VirtualPin) stand in for a HAL pin.
impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Pin { kind } => *kind,
            _ => ErrorKind::Other,
        }
    }
}
