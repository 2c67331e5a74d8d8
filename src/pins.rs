//! GPIO pin assignments for the prop controller board.
//!
//! Single source of truth — every adapter references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//!
//! Numbers are BCM (the scheme `rppal` uses), with the physical header
//! position noted for bench wiring.

// ---------------------------------------------------------------------------
// Sensors — digital inputs
// ---------------------------------------------------------------------------

/// Push button, active-high with internal pull-down. Header pin 18.
pub const BUTTON_GPIO: u8 = 24;

/// Doorbell contact, active-low with internal pull-up. Header pin 22.
pub const DOORBELL_GPIO: u8 = 25;

// ---------------------------------------------------------------------------
// Actuators — digital outputs
// ---------------------------------------------------------------------------

/// Electromagnetic latch drive (active HIGH — energised holds the latch
/// closed). Header pin 8.
pub const LATCH_GPIO: u8 = 14;

/// Smoke generator relay (active LOW). Header pin 10.
pub const SMOKE_GPIO: u8 = 15;

/// Light relay (active LOW). Header pin 11.
pub const LIGHT_GPIO: u8 = 17;

/// Motion-sensor enable relay (active LOW). Header pin 16.
pub const MOTION_GPIO: u8 = 23;

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// Button halo LED, software PWM. Header pin 12.
pub const LED_GPIO: u8 = 18;

/// Software PWM carrier frequency for the LED (Hz).
pub const LED_PWM_FREQ_HZ: f64 = 50.0;
