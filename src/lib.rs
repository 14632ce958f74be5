#![no_std]

pub mod animation;
pub mod control;
pub mod error;
pub mod matrix;
pub mod output;
pub mod shift_register;

pub use animation::{Animation, AnimationId, AnimationSlot, Frame};
pub use control::{ControlQueueFull, ControlSender, MatrixControl, MatrixIntent};
pub use error::Error;
pub use matrix::{CellState, LedMatrix, MatrixCell, MatrixConfig};
pub use output::{NoPin, OutputBackend, OutputUnit, Polarity, VirtualPin};
pub use shift_register::{ControlLines, RegisterBank, ShiftRegister, ShiftRegisterHandle};

pub use embassy_time::{Duration, Instant};
