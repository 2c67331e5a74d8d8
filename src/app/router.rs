//! Command router — maps wire tokens onto actuator actions.
//!
//! One router instance owns all four actuators and runs on the dispatch
//! thread; transports feed it tokens through the command bus, serialising
//! concurrent delivery.  After each action the router emits a generic `ok`
//! acknowledgment, **except** for the hand-authored list of actions whose
//! terminal event is a latch-closed notification (`latch_close`,
//! `latch_open`, `motion_off` and their aliases) — those would otherwise
//! double-report — and `quit`, which echoes nothing at all.

use core::time::Duration;

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::app::commands::Command;
use crate::app::events::StatusEvent;
use crate::app::flags::SharedFlags;
use crate::app::ports::{StatusSink, SystemPort};
use crate::config::SystemConfig;
use crate::drivers::actuator::{Actuator, ActuatorKind};
use crate::error::ActuatorError;

/// What the dispatch loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Quit,
}

/// The command router.  Generic over the output pin type (real GPIO in
/// production, recording pins in tests) and the system-control port.
pub struct CommandRouter<O, S> {
    latch: Actuator<O>,
    smoke: Actuator<O>,
    light: Actuator<O>,
    motion: Actuator<O>,
    flags: SharedFlags,
    system: S,
    pulse_open: Duration,
    pulse_settle: Duration,
}

impl<O: OutputPin, S: SystemPort> CommandRouter<O, S> {
    /// Build the router and drive every actuator to its rest state.
    pub fn new(
        config: &SystemConfig,
        flags: SharedFlags,
        system: S,
        latch_pin: O,
        smoke_pin: O,
        light_pin: O,
        motion_pin: O,
    ) -> Self {
        Self {
            latch: Actuator::new(ActuatorKind::Latch, latch_pin),
            smoke: Actuator::new(ActuatorKind::Smoke, smoke_pin),
            light: Actuator::new(ActuatorKind::Light, light_pin),
            motion: Actuator::new(ActuatorKind::MotionEnable, motion_pin),
            flags,
            system,
            pulse_open: Duration::from_millis(config.pulse_open_ms),
            pulse_settle: Duration::from_millis(config.pulse_settle_ms),
        }
    }

    /// Dispatch one wire token.  Emits exactly one terminal status event
    /// per command — `ok` or a closed-notification — except `quit`.
    pub fn dispatch(&mut self, token: &str, sink: &mut impl StatusSink) -> Decision {
        match Command::parse(token) {
            Command::Quit => {
                self.flags.set_flashing(false);
                info!("quit received, shutting down");
                return Decision::Quit;
            }
            Command::Alive => info!("liveness probe"),
            Command::LedOn => {
                self.flags.set_flashing(true);
                info!("LED animation on");
            }
            Command::LedOff => {
                self.flags.set_flashing(false);
                info!("LED animation off");
            }
            Command::LatchClose => {
                info!("latch close (manual)");
                self.latch.set_energized(true);
                sink.emit(StatusEvent::Latch1Closed);
                return Decision::Continue;
            }
            Command::LatchOpen => {
                self.pulse_latch(sink);
                return Decision::Continue;
            }
            Command::SmokeOn => {
                info!("smoke on");
                self.smoke.set_energized(true);
            }
            Command::SmokeOff => {
                info!("smoke off");
                self.smoke.set_energized(false);
            }
            Command::LightOn => {
                info!("light on");
                self.light.set_energized(true);
            }
            Command::LightOff => {
                info!("light off");
                self.light.set_energized(false);
            }
            Command::MotionOn => {
                info!("motion sensing on");
                self.motion.set_energized(true);
            }
            Command::MotionOff => {
                info!("motion sensing off");
                self.motion.set_energized(false);
                sink.emit(StatusEvent::Latch2Closed);
                return Decision::Continue;
            }
            Command::Reboot => {
                info!("reboot requested");
                self.system.reboot();
            }
            Command::Shutdown => {
                info!("host shutdown requested");
                self.system.shutdown();
            }
            Command::Unknown => warn!("unknown command: {token:?}"),
        }

        sink.emit(StatusEvent::Ok);
        Decision::Continue
    }

    /// Pulse the latch open and auto-close.  Blocks the dispatch thread
    /// for the open + settle window by design.  A pulse that loses the
    /// interlock race is dropped with a log; the latch never opened, so
    /// the closed-notification is still truthful and the command keeps
    /// its usual terminal event.
    fn pulse_latch(&mut self, sink: &mut impl StatusSink) {
        info!("latch open (pulse)");
        let result = self.latch.pulse_and_auto_close(
            &self.flags,
            self.pulse_open,
            self.pulse_settle,
            |ev| sink.emit(ev),
        );
        match result {
            Ok(()) => {}
            Err(ActuatorError::PulseInFlight) => {
                warn!("pulse rejected: another pulse is in flight");
                sink.emit(StatusEvent::Latch1Closed);
            }
            Err(e) => {
                warn!("pulse failed: {e}");
                sink.emit(StatusEvent::Latch1Closed);
            }
        }
    }

    /// Latch state as last commanded (true = closed/holding).
    pub fn latch_energized(&self) -> bool {
        self.latch.energized()
    }

    pub fn smoke_energized(&self) -> bool {
        self.smoke.energized()
    }

    pub fn light_energized(&self) -> bool {
        self.light.energized()
    }

    pub fn motion_energized(&self) -> bool {
        self.motion.energized()
    }
}
