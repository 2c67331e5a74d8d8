//! Breathing-LED animation state machine.
//!
//! Simple bounce: duty ramps 0 → 100 → 0 in fixed percent steps, one step
//! per tick, looping while flashing is enabled.  With the default 5 % step
//! and 50 ms tick a full breath takes about two seconds.
//!
//! ```text
//!          flashing            duty == 100
//!   Idle ───────────▶ RampUp ─────────────▶ RampDown
//!    ▲                  ▲                       │
//!    │                  └───────────────────────┘
//!    └── !flashing (from any phase)   duty == 0
//! ```
//!
//! The machine is pure: the animator thread feeds it the flashing and
//! interlock flags each tick and applies the returned drive to the PWM
//! port.  A frozen tick (interlock set) advances nothing, so the ramp
//! resumes exactly where it stopped.

/// Animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RampUp,
    RampDown,
}

/// What the animator should do with the PWM output this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedDrive {
    /// Stop the carrier, output de-energised.
    Off,
    /// Drive at the given duty (0–100).
    Duty(u8),
    /// Leave the output exactly as it is (interlock freeze).
    Hold,
}

/// The breathing state machine.
#[derive(Debug)]
pub struct Breather {
    phase: Phase,
    duty: u8,
    step: u8,
}

impl Breather {
    /// `step_percent` is clamped to 1–100.
    pub fn new(step_percent: u8) -> Self {
        Self {
            phase: Phase::Idle,
            duty: 0,
            step: step_percent.clamp(1, 100),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// Advance one tick.  Disabling always wins over the interlock freeze:
    /// `flashing = false` drives the output off within this tick even
    /// mid-pulse.
    pub fn tick(&mut self, flashing: bool, frozen: bool) -> LedDrive {
        if !flashing {
            self.phase = Phase::Idle;
            self.duty = 0;
            return LedDrive::Off;
        }
        if frozen {
            return LedDrive::Hold;
        }
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::RampUp;
                self.duty = 0;
            }
            Phase::RampUp => {
                self.duty = self.duty.saturating_add(self.step).min(100);
                if self.duty == 100 {
                    self.phase = Phase::RampDown;
                }
            }
            Phase::RampDown => {
                self.duty = self.duty.saturating_sub(self.step);
                if self.duty == 0 {
                    self.phase = Phase::RampUp;
                }
            }
        }
        LedDrive::Duty(self.duty)
    }
}
