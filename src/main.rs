//! Prop controller — main entry point.
//!
//! Hexagonal architecture with supervised threads:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  gpio (pins + PWM)   udp / mqtt (transports)   OsSystem      │
//! │                                                              │
//! │  ─────────────────── Port Trait Boundary ─────────────────   │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  CommandRouter · DebouncedSensor · Breather · Flags    │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  Threads: sensor-poll · led-animator · udp-io · mqtt-*       │
//! │  Main thread: command dispatch loop                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use std::path::PathBuf;

use anyhow::Context;
use log::{debug, info};

use proprig::adapters::gpio;
use proprig::adapters::system::OsSystem;
use proprig::app::flags::SharedFlags;
use proprig::app::router::{CommandRouter, Decision};
use proprig::config::SystemConfig;
use proprig::runtime::{self, ShutdownFlag, Supervisor};
use proprig::transport::channels::{CommandBus, StatusFanout};
use proprig::transport::{mqtt, udp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("proprig v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 1. Configuration ──────────────────────────────────────
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = SystemConfig::load_or_default(config_path.as_deref());
    info!(
        "transports: UDP {} | MQTT {}",
        if config.udp_enabled { "on" } else { "off" },
        if config.mqtt_enabled { "on" } else { "off" },
    );

    // ── 2. Hardware bring-up ──────────────────────────────────
    let pins = gpio::build().context("GPIO bring-up failed")?;

    // ── 3. Shared state and channels ──────────────────────────
    let shutdown = ShutdownFlag::new();
    let flags = SharedFlags::new();
    let bus = CommandBus::new();
    let mut fanout = StatusFanout::new();
    let mut supervisor = Supervisor::new(shutdown.clone());

    // ── 4. Transports ─────────────────────────────────────────
    if config.udp_enabled {
        let lane = fanout.open_lane("udp");
        let handle = udp::spawn(&config, bus.clone(), lane, shutdown.clone())
            .context("UDP bring-up failed")?;
        supervisor.add_transport(handle);
    }
    if config.mqtt_enabled {
        let lane = fanout.open_lane("mqtt");
        let handles = mqtt::spawn(&config, bus.clone(), lane, shutdown.clone())
            .context("MQTT bring-up failed")?;
        for handle in handles {
            supervisor.add_transport(handle);
        }
    }
    anyhow::ensure!(
        !fanout.is_empty(),
        "no transport enabled — enable UDP or MQTT in the config"
    );

    // ── 5. Sensor poller and LED animator ─────────────────────
    supervisor.set_poller(
        runtime::spawn_sensor_poller(
            pins.button,
            pins.doorbell,
            flags.clone(),
            fanout.clone(),
            &config,
            shutdown.clone(),
        )
        .context("sensor poller spawn failed")?,
    );
    supervisor.set_animator(
        runtime::spawn_led_animator(pins.led, flags.clone(), &config, shutdown.clone())
            .context("LED animator spawn failed")?,
    );

    // ── 6. Command dispatch loop ──────────────────────────────
    let mut router = CommandRouter::new(
        &config,
        flags,
        OsSystem,
        pins.latch,
        pins.smoke,
        pins.light,
        pins.motion,
    );

    info!("system ready, dispatching commands");
    loop {
        let msg = bus.recv_blocking();
        debug!("command {:?} via {}", msg.token.as_str(), msg.source);
        if router.dispatch(&msg.token, &mut fanout) == Decision::Quit {
            break;
        }
    }

    // ── 7. Ordered shutdown ───────────────────────────────────
    supervisor.shutdown();
    Ok(())
}
