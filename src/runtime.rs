//! Supervised execution contexts and ordered shutdown.
//!
//! Every long-running loop (sensor poller, LED animator, transport I/O)
//! runs in a named thread registered with the [`Supervisor`].  A shared
//! [`ShutdownFlag`] is the only stop signal: loops check it at their tick
//! cadence, so no join can hang, and teardown needs no thread killing.
//!
//! Shutdown order is fixed: LED animator first (it must leave the output
//! de-energised), then the sensor poller, then the transports — each step
//! best-effort (log and continue on failure).

use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use embedded_hal::digital::InputPin;
use log::{error, info, warn};

use crate::app::flags::SharedFlags;
use crate::app::ports::PwmPort;
use crate::config::SystemConfig;
use crate::drivers::breather::{Breather, LedDrive};
use crate::drivers::debounce::{DebouncedSensor, SensorKind};
use crate::transport::channels::StatusFanout;

// ───────────────────────────────────────────────────────────────
// Shutdown signal
// ───────────────────────────────────────────────────────────────

/// Cooperative shutdown signal shared by every supervised thread.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Completes once the flag is raised.  Used as the run-until future
    /// for the transport executors.
    pub async fn wait(&self) {
        while !self.is_set() {
            async_io_mini::Timer::after(Duration::from_millis(50)).await;
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Sensor poller
// ───────────────────────────────────────────────────────────────

/// One poll iteration: button first, then doorbell — the fixed priority
/// order that makes simultaneous transitions deterministic.  A set pulse
/// interlock suppresses the whole tick (no state advance, no emission).
pub fn poll_tick<BTN: InputPin, BELL: InputPin>(
    button: &mut DebouncedSensor,
    button_pin: &mut BTN,
    doorbell: &mut DebouncedSensor,
    doorbell_pin: &mut BELL,
    flags: &SharedFlags,
    fanout: &StatusFanout,
) {
    if flags.interlocked() {
        return;
    }
    poll_sensor(button, button_pin, fanout);
    poll_sensor(doorbell, doorbell_pin, fanout);
}

fn poll_sensor<P: InputPin>(sensor: &mut DebouncedSensor, pin: &mut P, fanout: &StatusFanout) {
    match pin.is_high() {
        Ok(level) => {
            if let Some(event) = sensor.poll(level) {
                info!("{:?}: {event}", sensor.kind());
                fanout.broadcast(event);
            }
        }
        // Non-fatal: skip this tick, the next one retries.
        Err(e) => warn!("{:?}: read failed ({e:?})", sensor.kind()),
    }
}

/// Spawn the sensor polling thread.
pub fn spawn_sensor_poller<BTN, BELL>(
    mut button_pin: BTN,
    mut doorbell_pin: BELL,
    flags: SharedFlags,
    fanout: StatusFanout,
    config: &SystemConfig,
    shutdown: ShutdownFlag,
) -> std::io::Result<JoinHandle<()>>
where
    BTN: InputPin + Send + 'static,
    BELL: InputPin + Send + 'static,
{
    let interval = Duration::from_millis(config.poll_interval_ms);
    std::thread::Builder::new()
        .name("sensor-poll".into())
        .spawn(move || {
            let mut button = DebouncedSensor::new(SensorKind::Button);
            let mut doorbell = DebouncedSensor::new(SensorKind::Doorbell);
            info!("sensor poller started ({interval:?} tick)");
            while !shutdown.is_set() {
                poll_tick(
                    &mut button,
                    &mut button_pin,
                    &mut doorbell,
                    &mut doorbell_pin,
                    &flags,
                    &fanout,
                );
                std::thread::sleep(interval);
            }
            info!("sensor poller stopped");
        })
}

// ───────────────────────────────────────────────────────────────
// LED animator
// ───────────────────────────────────────────────────────────────

/// Spawn the LED animation thread.  Exits only on shutdown, always
/// leaving the output de-energised.
pub fn spawn_led_animator<P>(
    mut pwm: P,
    flags: SharedFlags,
    config: &SystemConfig,
    shutdown: ShutdownFlag,
) -> std::io::Result<JoinHandle<()>>
where
    P: PwmPort + Send + 'static,
{
    let tick = Duration::from_millis(config.led_tick_ms);
    let step = config.led_step_percent;
    std::thread::Builder::new()
        .name("led-animator".into())
        .spawn(move || {
            let mut breather = Breather::new(step);
            info!("LED animator started ({tick:?} tick, {step}% step)");
            while !shutdown.is_set() {
                match breather.tick(flags.flashing(), flags.interlocked()) {
                    LedDrive::Off => pwm.off(),
                    LedDrive::Duty(duty) => pwm.set_duty(duty),
                    LedDrive::Hold => {}
                }
                std::thread::sleep(tick);
            }
            pwm.off();
            info!("LED animator stopped");
        })
}

// ───────────────────────────────────────────────────────────────
// Supervisor
// ───────────────────────────────────────────────────────────────

/// A transport's supervised thread plus its optional disconnect hook.
pub struct TransportHandle {
    pub name: &'static str,
    pub join: JoinHandle<()>,
    /// Called before joining, to wake the thread out of blocking waits
    /// (e.g. an MQTT disconnect request).
    pub disconnect: Option<Box<dyn FnOnce() + Send>>,
}

/// Owns every supervised thread and tears them down in order.
pub struct Supervisor {
    shutdown: ShutdownFlag,
    animator: Option<JoinHandle<()>>,
    poller: Option<JoinHandle<()>>,
    transports: Vec<TransportHandle>,
}

impl Supervisor {
    pub fn new(shutdown: ShutdownFlag) -> Self {
        Self {
            shutdown,
            animator: None,
            poller: None,
            transports: Vec::new(),
        }
    }

    pub fn set_animator(&mut self, handle: JoinHandle<()>) {
        self.animator = Some(handle);
    }

    pub fn set_poller(&mut self, handle: JoinHandle<()>) {
        self.poller = Some(handle);
    }

    pub fn add_transport(&mut self, handle: TransportHandle) {
        self.transports.push(handle);
    }

    /// Ordered, best-effort teardown: LED animator, sensor poller,
    /// transports.
    pub fn shutdown(mut self) {
        info!("shutting down: LED -> sensors -> transports");
        self.shutdown.set();

        if let Some(handle) = self.animator.take() {
            join_logged("led-animator", handle);
        }
        if let Some(handle) = self.poller.take() {
            join_logged("sensor-poll", handle);
        }
        for transport in self.transports.drain(..) {
            if let Some(disconnect) = transport.disconnect {
                disconnect();
            }
            join_logged(transport.name, transport.join);
        }

        info!("shutdown complete");
    }
}

fn join_logged(name: &str, handle: JoinHandle<()>) {
    if handle.join().is_err() {
        error!("{name} thread panicked");
    }
}
