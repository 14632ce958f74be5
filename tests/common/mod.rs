#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorType, OutputPin, StatefulOutputPin};
use shift_matrix::ControlLines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Data,
    Latch,
    Clock,
}

/// Every level change on the three control lines, in order.
#[derive(Debug, Clone, Default)]
pub struct Wire {
    events: Rc<RefCell<Vec<(Line, bool)>>>,
}

impl Wire {
    pub fn lines(&self) -> ControlLines<MockLine> {
        ControlLines {
            data: self.line(Line::Data),
            latch: self.line(Line::Latch),
            clock: self.line(Line::Clock),
        }
    }

    fn line(&self, line: Line) -> MockLine {
        MockLine {
            line,
            events: Rc::clone(&self.events),
        }
    }

    pub fn events(&self) -> Vec<(Line, bool)> {
        self.events.borrow().clone()
    }

    pub fn reset(&self) {
        self.events.borrow_mut().clear();
    }

    fn rising_edges(&self, of: Line) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|(line, high)| *line == of && *high)
            .count()
    }

    /// Number of latch pulses, i.e. commits.
    pub fn latches(&self) -> usize {
        self.rising_edges(Line::Latch)
    }

    pub fn clock_pulses(&self) -> usize {
        self.rising_edges(Line::Clock)
    }

    /// Data level sampled at every shift clock rising edge.
    pub fn shifted_bits(&self) -> Vec<bool> {
        let mut data = false;
        let mut bits = Vec::new();
        for (line, high) in self.events.borrow().iter() {
            match line {
                Line::Data => data = *high,
                Line::Clock if *high => bits.push(data),
                _ => {}
            }
        }
        bits
    }

    /// Bytes presented by the last latch, lane 0 first.
    pub fn latched_lanes(&self, registers: usize) -> Vec<u8> {
        let bits = self.shifted_bits();
        let frame = &bits[bits.len() - registers * 8..];
        // The first bits shifted end up in the most distal register.
        let mut lanes: Vec<u8> = frame
            .chunks(8)
            .map(|chunk| chunk.iter().fold(0, |byte, bit| (byte << 1) | u8::from(*bit)))
            .collect();
        lanes.reverse();
        lanes
    }
}

pub struct MockLine {
    line: Line,
    events: Rc<RefCell<Vec<(Line, bool)>>>,
}

impl ErrorType for MockLine {
    type Error = Infallible;
}

impl OutputPin for MockLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push((self.line, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push((self.line, true));
        Ok(())
    }
}

/// Records every requested pause.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    pauses: Rc<RefCell<Vec<u32>>>,
}

impl MockDelay {
    pub fn pauses_ns(&self) -> Vec<u32> {
        self.pauses.borrow().clone()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.pauses.borrow_mut().push(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_ns(us * 1_000);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Direct GPIO with an observable level and write counter.
#[derive(Debug, Clone, Default)]
pub struct MockPin {
    level: Rc<Cell<bool>>,
    writes: Rc<Cell<usize>>,
    fail_after: Option<usize>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pin that rejects every write after the first `writes`.
    pub fn failing_after(writes: usize) -> Self {
        Self {
            fail_after: Some(writes),
            ..Self::default()
        }
    }

    pub fn level(&self) -> bool {
        self.level.get()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    fn write(&mut self, level: bool) -> Result<(), MockPinError> {
        if self.fail_after.is_some_and(|limit| self.writes.get() >= limit) {
            return Err(MockPinError);
        }
        self.writes.set(self.writes.get() + 1);
        self.level.set(level);
        Ok(())
    }
}

impl ErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

impl StatefulOutputPin for MockPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}
