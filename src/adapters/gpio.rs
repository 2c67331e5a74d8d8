//! GPIO construction — real Raspberry Pi pins or in-memory simulation.
//!
//! ## Dual-target design
//!
//! - **feature `rpi`**: `rppal` pins with the pulls and rest levels from
//!   [`crate::pins`]; the LED runs on software PWM.
//! - **all other builds**: simulation pins that track state in memory, so
//!   the whole binary (and every test) runs on the host.
//!
//! Both variants expose the same `PropPins` field names and a `build()`
//! entry point, and both satisfy the `embedded-hal` digital traits plus
//! [`PwmPort`], so the rest of the crate is oblivious to the difference.

#[cfg(feature = "rpi")]
pub use real::{LedPwm, PropPins, build};

#[cfg(not(feature = "rpi"))]
pub use sim::{PropPins, SimInputPin, SimLevel, SimOutputPin, SimPwm, SimPwmProbe, build};

// ───────────────────────────────────────────────────────────────
// Raspberry Pi hardware
// ───────────────────────────────────────────────────────────────

#[cfg(feature = "rpi")]
mod real {
    use anyhow::Context;
    use log::{info, warn};
    use rppal::gpio::{Gpio, InputPin, OutputPin};

    use crate::app::ports::PwmPort;
    use crate::pins;

    /// Every pin the controller owns, configured and at rest.
    pub struct PropPins {
        pub button: InputPin,
        pub doorbell: InputPin,
        pub latch: OutputPin,
        pub smoke: OutputPin,
        pub light: OutputPin,
        pub motion: OutputPin,
        pub led: LedPwm,
    }

    /// Configure all pins.  Outputs come up in their rest levels: latch
    /// held (high), relay bank off (high, active-low), LED dark.
    pub fn build() -> anyhow::Result<PropPins> {
        let gpio = Gpio::new().context("GPIO controller unavailable")?;

        let button = gpio
            .get(pins::BUTTON_GPIO)
            .context("button pin")?
            .into_input_pulldown();
        let doorbell = gpio
            .get(pins::DOORBELL_GPIO)
            .context("doorbell pin")?
            .into_input_pullup();
        let latch = gpio
            .get(pins::LATCH_GPIO)
            .context("latch pin")?
            .into_output_high();
        let smoke = gpio
            .get(pins::SMOKE_GPIO)
            .context("smoke pin")?
            .into_output_high();
        let light = gpio
            .get(pins::LIGHT_GPIO)
            .context("light pin")?
            .into_output_high();
        let motion = gpio
            .get(pins::MOTION_GPIO)
            .context("motion pin")?
            .into_output_high();
        let led = LedPwm::new(
            gpio.get(pins::LED_GPIO)
                .context("LED pin")?
                .into_output_low(),
        );

        info!(
            "GPIO configured (BCM: button={} doorbell={} latch={} smoke={} light={} motion={} led={})",
            pins::BUTTON_GPIO,
            pins::DOORBELL_GPIO,
            pins::LATCH_GPIO,
            pins::SMOKE_GPIO,
            pins::LIGHT_GPIO,
            pins::MOTION_GPIO,
            pins::LED_GPIO,
        );

        Ok(PropPins {
            button,
            doorbell,
            latch,
            smoke,
            light,
            motion,
            led,
        })
    }

    /// Software-PWM LED output.
    pub struct LedPwm {
        pin: OutputPin,
    }

    impl LedPwm {
        pub fn new(pin: OutputPin) -> Self {
            Self { pin }
        }
    }

    impl PwmPort for LedPwm {
        fn set_duty(&mut self, percent: u8) {
            let duty = f64::from(percent.min(100)) / 100.0;
            if let Err(e) = self.pin.set_pwm_frequency(pins::LED_PWM_FREQ_HZ, duty) {
                warn!("LED PWM write failed: {e}");
            }
        }

        fn off(&mut self) {
            if let Err(e) = self.pin.clear_pwm() {
                warn!("LED PWM stop failed: {e}");
            }
            self.pin.set_low();
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(feature = "rpi"))]
mod sim {
    use core::convert::Infallible;
    use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
    use std::sync::Arc;

    use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
    use log::info;

    use crate::app::ports::PwmPort;

    /// Shared handle to a simulated level: tests write it, pins read it
    /// (or the other way around for outputs).
    #[derive(Debug, Clone, Default)]
    pub struct SimLevel(Arc<AtomicBool>);

    impl SimLevel {
        pub fn set_high(&self, high: bool) {
            self.0.store(high, Ordering::Release);
        }

        pub fn is_high(&self) -> bool {
            self.0.load(Ordering::Acquire)
        }
    }

    /// Simulated digital input.
    pub struct SimInputPin {
        level: SimLevel,
    }

    impl SimInputPin {
        /// Returns the pin and the level handle that drives it.
        pub fn new(initial_high: bool) -> (Self, SimLevel) {
            let level = SimLevel::default();
            level.set_high(initial_high);
            (
                Self {
                    level: level.clone(),
                },
                level,
            )
        }
    }

    impl ErrorType for SimInputPin {
        type Error = Infallible;
    }

    impl InputPin for SimInputPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.level.is_high())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.level.is_high())
        }
    }

    /// Simulated digital output.
    pub struct SimOutputPin {
        level: SimLevel,
    }

    impl SimOutputPin {
        /// Returns the pin and a handle observing its driven level.
        pub fn new(initial_high: bool) -> (Self, SimLevel) {
            let level = SimLevel::default();
            level.set_high(initial_high);
            (
                Self {
                    level: level.clone(),
                },
                level,
            )
        }
    }

    impl ErrorType for SimOutputPin {
        type Error = Infallible;
    }

    impl OutputPin for SimOutputPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.level.set_high(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.level.set_high(true);
            Ok(())
        }
    }

    /// Observer half of a [`SimPwm`].
    #[derive(Debug, Clone, Default)]
    pub struct SimPwmProbe {
        duty: Arc<AtomicU8>,
        running: Arc<AtomicBool>,
    }

    impl SimPwmProbe {
        pub fn duty(&self) -> u8 {
            self.duty.load(Ordering::Acquire)
        }

        pub fn running(&self) -> bool {
            self.running.load(Ordering::Acquire)
        }
    }

    /// Simulated PWM output.
    #[derive(Default)]
    pub struct SimPwm {
        probe: SimPwmProbe,
    }

    impl SimPwm {
        pub fn new() -> (Self, SimPwmProbe) {
            let probe = SimPwmProbe::default();
            (
                Self {
                    probe: probe.clone(),
                },
                probe,
            )
        }
    }

    impl PwmPort for SimPwm {
        fn set_duty(&mut self, percent: u8) {
            self.probe.duty.store(percent.min(100), Ordering::Release);
            self.probe.running.store(true, Ordering::Release);
        }

        fn off(&mut self) {
            self.probe.duty.store(0, Ordering::Release);
            self.probe.running.store(false, Ordering::Release);
        }
    }

    /// Same shape as the hardware variant, backed by memory.
    pub struct PropPins {
        pub button: SimInputPin,
        pub doorbell: SimInputPin,
        pub latch: SimOutputPin,
        pub smoke: SimOutputPin,
        pub light: SimOutputPin,
        pub motion: SimOutputPin,
        pub led: SimPwm,
    }

    /// Build the simulated pin set in the same rest state as hardware:
    /// button low, doorbell pulled high, outputs high, LED dark.
    pub fn build() -> anyhow::Result<PropPins> {
        info!("GPIO(sim): in-memory pins, no hardware access");
        Ok(PropPins {
            button: SimInputPin::new(false).0,
            doorbell: SimInputPin::new(true).0,
            latch: SimOutputPin::new(true).0,
            smoke: SimOutputPin::new(true).0,
            light: SimOutputPin::new(true).0,
            motion: SimOutputPin::new(true).0,
            led: SimPwm::default(),
        })
    }

}
