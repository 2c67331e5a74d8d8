//! System configuration parameters.
//!
//! All tunable parameters for the prop controller.  Values can be overridden
//! by a JSON config file passed on the command line; absent or unreadable
//! files fall back to the defaults below with a warning.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- UDP transport ---
    /// Enable the UDP adapter.
    pub udp_enabled: bool,
    /// Local address the inbound UDP socket binds to.
    pub udp_bind_addr: String,
    /// Inbound UDP port (commands arrive here).
    pub udp_port_in: u16,
    /// Outbound UDP port on the peer (status is sent here).
    pub udp_port_out: u16,

    // --- MQTT transport ---
    /// Enable the MQTT adapter.
    pub mqtt_enabled: bool,
    /// Broker hostname or IP.
    pub mqtt_host: String,
    /// Broker port.
    pub mqtt_port: u16,
    /// Client identifier presented to the broker.
    pub mqtt_client_id: String,
    /// Topic prefix; commands on `<prefix>/command`, status on `<prefix>/status`.
    pub mqtt_topic_prefix: String,

    // --- Timing ---
    /// Sensor poll interval (milliseconds).
    pub poll_interval_ms: u64,
    /// LED animator tick interval (milliseconds).
    pub led_tick_ms: u64,
    /// LED duty-cycle step per tick (percent).
    pub led_step_percent: u8,
    /// Latch open time during a pulse (milliseconds).
    pub pulse_open_ms: u64,
    /// Settle delay after a pulse re-closes the latch (milliseconds).
    pub pulse_settle_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // UDP
            udp_enabled: true,
            udp_bind_addr: "0.0.0.0".into(),
            udp_port_in: 1235,
            udp_port_out: 1234,

            // MQTT
            mqtt_enabled: true,
            mqtt_host: "127.0.0.1".into(),
            mqtt_port: 1883,
            mqtt_client_id: "proprig".into(),
            mqtt_topic_prefix: "proprig".into(),

            // Timing
            poll_interval_ms: 100,  // 10 Hz sensor scan
            led_tick_ms: 50,        // 20 Hz breathing ramp
            led_step_percent: 5,    // full breath in ~2 s
            pulse_open_ms: 250,     // latch open window
            pulse_settle_ms: 1000,  // safety delay before re-enabling sensors
        }
    }
}

impl SystemConfig {
    /// MQTT topic the adapter subscribes to for commands.
    pub fn mqtt_command_topic(&self) -> String {
        format!("{}/command", self.mqtt_topic_prefix)
    }

    /// MQTT topic status events are published on.
    pub fn mqtt_status_topic(&self) -> String {
        format!("{}/status", self.mqtt_topic_prefix)
    }

    /// Load configuration from a JSON file, falling back to defaults.
    ///
    /// Missing fields take their default value (`serde(default)`), so a
    /// config file only needs to name the parameters it changes.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("config parse failed ({e}), using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!("config read failed ({e}), using defaults");
                Self::default()
            }
        }
    }
}
