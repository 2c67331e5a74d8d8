//! Port traits — the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ router / poller / animator (domain)
//! ```
//!
//! Digital sensor and actuator pins use the `embedded-hal` 1.0 traits
//! directly ([`embedded_hal::digital::InputPin`] /
//! [`embedded_hal::digital::OutputPin`]); the traits below cover the
//! remaining seams.  Driven adapters implement them, and the domain
//! consumes them via generics, so the core never touches hardware, sockets,
//! or the OS directly.

use crate::app::events::StatusEvent;

// ───────────────────────────────────────────────────────────────
// Status sink (domain → transports)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`StatusEvent`]s through this port.  The production
/// implementation is the multi-lane fan-out in
/// [`crate::transport::channels::StatusFanout`]; tests substitute a
/// recording sink.
///
/// `emit` must not block beyond adapter-internal queuing.
pub trait StatusSink {
    fn emit(&mut self, event: StatusEvent);
}

// ───────────────────────────────────────────────────────────────
// PWM output (domain → LED hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the breathing LED.  Implementations log hardware
/// write failures internally — there is nothing the animator could do with
/// them beyond retrying on the next tick anyway.
pub trait PwmPort {
    /// Drive the output at `percent` duty (clamped to 0–100).
    fn set_duty(&mut self, percent: u8);

    /// Stop the PWM carrier and leave the output de-energised.
    fn off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// System control (domain → OS)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget host power control, delegated to an external
/// collaborator.  Failures are logged by the implementation; the router
/// acknowledges the command either way.
pub trait SystemPort {
    fn reboot(&mut self);
    fn shutdown(&mut self);
}
