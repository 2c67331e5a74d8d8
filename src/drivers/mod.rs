//! Pure-logic drivers: state machines for sensors, actuators, and the
//! breathing LED.  No I/O — pins and PWM come in through the `embedded-hal`
//! traits and the [`crate::app::ports`] seams, so every driver runs on the
//! host unchanged.

pub mod actuator;
pub mod breather;
pub mod debounce;
