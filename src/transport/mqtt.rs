//! MQTT transport adapter.
//!
//! Two supervised threads share one `rumqttc` client:
//!
//! - **Connection loop** — drives the broker connection, re-subscribes to
//!   the command topic on every ConnAck (so broker reconnects keep
//!   working), and forwards inbound publishes to the command bus.
//!   Connection errors log, back off, and retry; they never take the
//!   process down.
//! - **Status pump** — drains this adapter's status lane and publishes
//!   each event to the status topic at QoS 1.
//!
//! MQTT is a continuously-subscribed transport, so the UDP wake-up
//! handshake is deliberately omitted — the broker session itself is the
//! liveness boundary.

use core::time::Duration;

use log::{debug, info, warn};
use rumqttc::{Client, Connection, Event, MqttOptions, Packet, QoS};

use crate::config::SystemConfig;
use crate::error::Error;
use crate::runtime::{ShutdownFlag, TransportHandle};
use crate::transport::channels::{CommandBus, StatusLane};

/// Keep-alive also bounds how long a quiet connection loop can sit
/// between events (ping traffic wakes the iterator).
const KEEP_ALIVE: Duration = Duration::from_secs(5);

/// Backoff between reconnect attempts after a connection error.
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Status-pump poll cadence (bounds shutdown latency).
const STATUS_POLL: Duration = Duration::from_millis(250);

/// Request queue depth for the client handle.
const REQUEST_CAP: usize = 10;

/// Start the connection loop and status pump.  Connecting happens in the
/// background; this only fails if a thread cannot be spawned.
pub fn spawn(
    config: &SystemConfig,
    bus: CommandBus,
    lane: StatusLane,
    shutdown: ShutdownFlag,
) -> crate::error::Result<Vec<TransportHandle>> {
    let mut options = MqttOptions::new(
        config.mqtt_client_id.clone(),
        config.mqtt_host.clone(),
        config.mqtt_port,
    );
    options.set_keep_alive(KEEP_ALIVE);

    let (client, connection) = Client::new(options, REQUEST_CAP);

    info!(
        "MQTT connecting to {}:{} as {:?}",
        config.mqtt_host, config.mqtt_port, config.mqtt_client_id
    );

    let command_topic = config.mqtt_command_topic();
    let status_topic = config.mqtt_status_topic();

    let conn_client = client.clone();
    let conn_shutdown = shutdown.clone();
    let conn_join = std::thread::Builder::new()
        .name("mqtt-conn".into())
        .spawn(move || run_conn_loop(connection, &conn_client, &command_topic, &bus, &conn_shutdown))
        .map_err(|_| Error::Init("MQTT connection thread spawn"))?;

    let pump_client = client.clone();
    let pump_join = std::thread::Builder::new()
        .name("mqtt-pub".into())
        .spawn(move || run_status_pump(&pump_client, &status_topic, &lane, &shutdown))
        .map_err(|_| Error::Init("MQTT status thread spawn"))?;

    // Disconnecting wakes the connection loop promptly at shutdown.
    let disconnect_client = client;
    let disconnect = Box::new(move || {
        if let Err(e) = disconnect_client.disconnect() {
            debug!("MQTT disconnect request failed: {e}");
        }
    });

    Ok(vec![
        TransportHandle {
            name: "mqtt-conn",
            join: conn_join,
            disconnect: Some(disconnect),
        },
        TransportHandle {
            name: "mqtt-pub",
            join: pump_join,
            disconnect: None,
        },
    ])
}

// ── Connection loop ──────────────────────────────────────────

fn run_conn_loop(
    mut connection: Connection,
    client: &Client,
    command_topic: &str,
    bus: &CommandBus,
    shutdown: &ShutdownFlag,
) {
    for event in connection.iter() {
        if shutdown.is_set() {
            break;
        }
        match event {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("MQTT connected, subscribing to {command_topic}");
                if let Err(e) = client.subscribe(command_topic, QoS::AtLeastOnce) {
                    warn!("MQTT subscribe to {command_topic} failed: {e}");
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                match core::str::from_utf8(&publish.payload) {
                    Ok(token) => {
                        debug!("MQTT rx {token:?} on {}", publish.topic);
                        if let Err(e) = bus.submit("mqtt", token) {
                            warn!("MQTT: command {token:?} dropped: {e}");
                        }
                    }
                    Err(_) => warn!("MQTT: non-UTF-8 payload on {}, dropped", publish.topic),
                }
            }
            Ok(_) => {}
            Err(e) => {
                if shutdown.is_set() {
                    break;
                }
                // Continuing the iterator retries the connection.
                warn!("MQTT connection error: {e}; retrying");
                std::thread::sleep(ERROR_BACKOFF);
            }
        }
    }
    info!("MQTT connection loop stopped");
}

// ── Status pump ──────────────────────────────────────────────

fn run_status_pump(client: &Client, status_topic: &str, lane: &StatusLane, shutdown: &ShutdownFlag) {
    while !shutdown.is_set() {
        let Some(event) = lane.recv_timeout(STATUS_POLL) else {
            continue;
        };
        if let Err(e) = client.publish(status_topic, QoS::AtLeastOnce, false, event.token()) {
            warn!("MQTT publish of {event} failed: {e}");
        }
    }
    info!("MQTT status pump stopped");
}
