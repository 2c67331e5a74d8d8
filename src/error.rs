//! Unified error types for the prop controller.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! dispatch loop's error handling uniform.  All variants are `Copy` so they
//! can be passed between threads without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor level could not be read.
    Sensor(SensorError),
    /// An actuator command failed at the GPIO layer.
    Actuator(ActuatorError),
    /// A transport subsystem failed.
    Transport(TransportError),
    /// Peripheral or socket initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO level read returned an error; the poll tick is skipped.
    GpioReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO level write failed.
    GpioWriteFailed,
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// A pulse was requested while another pulse held the interlock.
    PulseInFlight,
    /// The actuator kind does not support the pulse protocol.
    PulseUnsupported,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::PulseInFlight => write!(f, "pulse already in flight"),
            Self::PulseUnsupported => write!(f, "actuator kind has no pulse protocol"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// UDP socket bind failed at startup.
    BindFailed,
    /// Datagram send failed (peer unreachable, buffer full).
    SendFailed,
    /// MQTT publish was rejected by the client.
    PublishFailed,
    /// Inbound payload was not valid ASCII/UTF-8 or exceeded the token size.
    MalformedPayload,
    /// The bounded command channel was full; the command was dropped.
    CommandQueueFull,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindFailed => write!(f, "socket bind failed"),
            Self::SendFailed => write!(f, "datagram send failed"),
            Self::PublishFailed => write!(f, "MQTT publish failed"),
            Self::MalformedPayload => write!(f, "malformed payload"),
            Self::CommandQueueFull => write!(f, "command queue full"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
