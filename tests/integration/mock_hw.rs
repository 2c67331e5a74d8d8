//! Mock hardware for integration tests.
//!
//! Records every GPIO level write and emitted status event so tests can
//! assert on full histories without touching real pins.

use core::convert::Infallible;
use std::sync::{Arc, Mutex};

use embedded_hal::digital::OutputPin;
use proprig::app::events::StatusEvent;
use proprig::app::ports::{StatusSink, SystemPort};

// ── Recording output pin ──────────────────────────────────────

/// Output pin that remembers every level it was driven to.
#[derive(Clone, Default)]
pub struct RecordingPin {
    levels: Arc<Mutex<Vec<bool>>>,
}

#[allow(dead_code)]
impl RecordingPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full write history, oldest first.
    pub fn history(&self) -> Vec<bool> {
        self.levels.lock().unwrap().clone()
    }

    /// Most recent driven level.
    pub fn level(&self) -> Option<bool> {
        self.levels.lock().unwrap().last().copied()
    }
}

impl embedded_hal::digital::ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.levels.lock().unwrap().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.levels.lock().unwrap().push(true);
        Ok(())
    }
}

// ── Recording status sink ─────────────────────────────────────

/// Sink that records emitted events in order.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<StatusEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.token()).collect()
    }
}

impl StatusSink for RecordingSink {
    fn emit(&mut self, event: StatusEvent) {
        self.events.push(event);
    }
}

// ── Recording system port ─────────────────────────────────────

/// System port that counts power-control requests instead of running them.
#[derive(Clone, Default)]
pub struct RecordingSystem {
    pub reboots: Arc<Mutex<u32>>,
    pub shutdowns: Arc<Mutex<u32>>,
}

#[allow(dead_code)]
impl RecordingSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reboot_count(&self) -> u32 {
        *self.reboots.lock().unwrap()
    }

    pub fn shutdown_count(&self) -> u32 {
        *self.shutdowns.lock().unwrap()
    }
}

impl SystemPort for RecordingSystem {
    fn reboot(&mut self) {
        *self.reboots.lock().unwrap() += 1;
    }

    fn shutdown(&mut self) {
        *self.shutdowns.lock().unwrap() += 1;
    }
}
