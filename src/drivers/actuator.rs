//! Binary actuator driver with the pulse-and-auto-close protocol.
//!
//! One [`Actuator`] per physical output, owning its GPIO pin for the
//! process lifetime.  `energized` is the logical state (latch holding,
//! smoke flowing, light on, motion sensing enabled); the per-kind polarity
//! maps it to a wire level — the latch drive is active-high, the relay
//! bank is active-low.
//!
//! ## Pulse-and-auto-close
//!
//! Timed de-energise/re-energise simulating a momentary actuation (latch
//! briefly opening then self-closing).  The sequence owns the process-wide
//! pulse interlock for its whole duration and intentionally blocks the
//! calling thread — that blocking is the backpressure that keeps a second
//! pulse from overlapping the first.

use core::time::Duration;

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::events::StatusEvent;
use crate::app::flags::SharedFlags;
use crate::error::ActuatorError;

/// Which physical actuator a driver instance controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorKind {
    /// Electromagnetic latch. Energised = magnet holding = closed.
    Latch,
    /// Smoke generator relay.
    Smoke,
    /// Light relay.
    Light,
    /// Motion-sensor enable relay.
    MotionEnable,
}

impl ActuatorKind {
    /// Wire level that means "energised" for this kind.
    const fn active_high(self) -> bool {
        matches!(self, Self::Latch)
    }

    /// Logical state the actuator rests in at startup.  The latch boots
    /// energised (holding); everything else boots off.
    pub const fn initial_energized(self) -> bool {
        matches!(self, Self::Latch)
    }

    /// Closed-status event for the pulse-capable kinds.
    pub const fn closed_event(self) -> Option<StatusEvent> {
        match self {
            Self::Latch => Some(StatusEvent::Latch1Closed),
            Self::MotionEnable => Some(StatusEvent::Latch2Closed),
            Self::Smoke | Self::Light => None,
        }
    }
}

/// A binary actuator bound to one output pin.
#[derive(Debug)]
pub struct Actuator<O> {
    kind: ActuatorKind,
    pin: O,
    energized: bool,
}

impl<O: OutputPin> Actuator<O> {
    /// Take ownership of `pin` and drive it to the kind's rest state.
    pub fn new(kind: ActuatorKind, pin: O) -> Self {
        let mut actuator = Self {
            kind,
            pin,
            energized: kind.initial_energized(),
        };
        actuator.write_level(actuator.energized);
        actuator
    }

    pub fn kind(&self) -> ActuatorKind {
        self.kind
    }

    /// Logical state as last commanded.
    pub fn energized(&self) -> bool {
        self.energized
    }

    /// Set the actuator state. Immediate, idempotent, emits nothing.
    /// GPIO write failures are logged and swallowed — the logical state
    /// still advances so a later retry converges.
    pub fn set_energized(&mut self, on: bool) {
        self.write_level(on);
        self.energized = on;
    }

    /// Run the pulse-then-auto-close sequence: acquire the interlock,
    /// de-energise, wait `open`, re-energise, report closed via
    /// `on_closed`, wait `settle`, release the interlock.
    ///
    /// Blocks the calling thread for `open + settle`.  Fails without
    /// touching the output if another pulse holds the interlock or the
    /// kind has no pulse protocol.  `on_closed` runs between re-energise
    /// and the settle delay; it must not block (the production callback is
    /// a bounded-channel send).
    pub fn pulse_and_auto_close(
        &mut self,
        flags: &SharedFlags,
        open: Duration,
        settle: Duration,
        on_closed: impl FnOnce(StatusEvent),
    ) -> Result<(), ActuatorError> {
        let closed_event = self
            .kind
            .closed_event()
            .ok_or(ActuatorError::PulseUnsupported)?;
        let guard = flags.begin_pulse().ok_or(ActuatorError::PulseInFlight)?;

        self.set_energized(false);
        std::thread::sleep(open);
        self.set_energized(true);
        on_closed(closed_event);
        std::thread::sleep(settle);

        drop(guard);
        Ok(())
    }

    fn write_level(&mut self, energized: bool) {
        let high = energized == self.kind.active_high();
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if let Err(e) = result {
            warn!("{:?}: GPIO write failed: {e:?}", self.kind);
        }
    }
}
