//! Control queue between input handlers and the matrix monitor.
//!
//! While [`LedMatrix::monitor`](crate::LedMatrix::monitor) runs it owns the
//! matrix, so buttons and touch pads request changes through a bounded queue
//! built on `critical-section` and `heapless::Deque`. The monitor drains it
//! at the top of every iteration.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Duration;
use heapless::Deque;

use crate::animation::AnimationId;

/// A change requested from outside the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixIntent {
    /// Power off (stop stepping and clear) or power back on.
    TogglePower,
    /// Advance to the next animation.
    CycleAnimation,
    /// Jump to a specific animation.
    SelectAnimation(AnimationId),
    /// Change the pause between animation steps.
    SetAnimationDelay(Duration),
    /// Leave the monitor loop.
    Stop,
}

/// Returned when the queue has no room; carries the rejected intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlQueueFull(pub MatrixIntent);

/// Bounded intent queue, usually placed in a `static`.
pub struct MatrixControl<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<MatrixIntent, SIZE>>>,
}

impl<const SIZE: usize> MatrixControl<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Handle for input tasks. Any number may coexist.
    pub const fn sender(&self) -> ControlSender<'_, SIZE> {
        ControlSender { control: self }
    }

    pub fn try_send(&self, intent: MatrixIntent) -> Result<(), ControlQueueFull> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(intent).map_err(ControlQueueFull)
        })
    }

    pub fn try_receive(&self) -> Option<MatrixIntent> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().is_empty())
    }
}

impl<const SIZE: usize> Default for MatrixControl<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lightweight, copyable sending side of a [`MatrixControl`].
#[derive(Clone, Copy)]
pub struct ControlSender<'a, const SIZE: usize> {
    control: &'a MatrixControl<SIZE>,
}

impl<const SIZE: usize> ControlSender<'_, SIZE> {
    pub fn try_send(&self, intent: MatrixIntent) -> Result<(), ControlQueueFull> {
        self.control.try_send(intent)
    }

    pub fn toggle_power(&self) -> Result<(), ControlQueueFull> {
        self.try_send(MatrixIntent::TogglePower)
    }

    pub fn cycle_animation(&self) -> Result<(), ControlQueueFull> {
        self.try_send(MatrixIntent::CycleAnimation)
    }

    pub fn select_animation(&self, id: AnimationId) -> Result<(), ControlQueueFull> {
        self.try_send(MatrixIntent::SelectAnimation(id))
    }

    pub fn set_animation_delay(&self, delay: Duration) -> Result<(), ControlQueueFull> {
        self.try_send(MatrixIntent::SetAnimationDelay(delay))
    }

    /// Ask the monitor to return after its current step.
    pub fn stop(&self) -> Result<(), ControlQueueFull> {
        self.try_send(MatrixIntent::Stop)
    }
}
