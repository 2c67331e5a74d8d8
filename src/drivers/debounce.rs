//! Debounced edge detection for the prop's two contact sensors.
//!
//! Debounce here is "change relative to the last observed settled level",
//! not a timer: the poll cadence (100 ms) is slow enough that contact
//! bounce has settled by the next read, so a two-state machine per sensor
//! is all that is needed.  Repeated reads of the same level emit nothing.
//!
//! | Sensor   | Polarity    | Raised event | Released event |
//! |----------|-------------|--------------|----------------|
//! | Button   | active-high | `high`       | `low`          |
//! | Doorbell | active-low  | `high2`      | `low2`         |

use crate::app::events::StatusEvent;

/// Which physical sensor a state machine tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Button,
    Doorbell,
}

/// A settled level transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Raised,
    Released,
}

/// Two-state edge detector over a logical "active" level.
#[derive(Debug, Default)]
pub struct DebouncedInput {
    raised: bool,
}

impl DebouncedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one polled level. Returns the edge if the settled state changed.
    pub fn poll(&mut self, active: bool) -> Option<Edge> {
        match (self.raised, active) {
            (false, true) => {
                self.raised = true;
                Some(Edge::Raised)
            }
            (true, false) => {
                self.raised = false;
                Some(Edge::Released)
            }
            _ => None,
        }
    }

    /// Current settled state.
    pub fn raised(&self) -> bool {
        self.raised
    }
}

/// A sensor: polarity mapping + edge detector + event vocabulary.
#[derive(Debug)]
pub struct DebouncedSensor {
    kind: SensorKind,
    input: DebouncedInput,
}

impl DebouncedSensor {
    pub fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            input: DebouncedInput::new(),
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Feed one polled GPIO level (true = electrically high) and map any
    /// settled edge to its wire event.
    pub fn poll(&mut self, level_high: bool) -> Option<StatusEvent> {
        let active = match self.kind {
            SensorKind::Button => level_high,
            SensorKind::Doorbell => !level_high,
        };
        let edge = self.input.poll(active)?;
        Some(match (self.kind, edge) {
            (SensorKind::Button, Edge::Raised) => StatusEvent::ButtonHigh,
            (SensorKind::Button, Edge::Released) => StatusEvent::ButtonLow,
            (SensorKind::Doorbell, Edge::Raised) => StatusEvent::DoorbellHigh,
            (SensorKind::Doorbell, Edge::Released) => StatusEvent::DoorbellLow,
        })
    }
}
