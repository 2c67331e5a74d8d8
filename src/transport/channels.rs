//! Inter-thread command and status channels.
//!
//! Bounded `embassy-sync` MPMC channels bridge the transport I/O threads
//! with the dispatch thread:
//!
//! ```text
//! ┌──────────────┐   CommandMsg   ┌───────────────┐
//! │ UDP adapter  │───────┐        │               │
//! └──────────────┘       ├───────▶│ dispatch loop │
//! ┌──────────────┐       │        │               │
//! │ MQTT adapter │───────┘        └──────┬────────┘
//! └──────────────┘                       │ StatusEvent
//!        ▲      ▲        fan-out         │
//!        └──────┴────── one lane per ────┘
//!                       adapter
//! ```
//!
//! Commands funnel into one shared bus; status events fan out to one lane
//! per enabled adapter so a stalled adapter only ever overflows its own
//! lane.  Channel FIFO order preserves per-source emission order; nothing
//! is promised across sources.

use core::time::Duration;
use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use futures_lite::future;
use log::warn;

use crate::app::events::StatusEvent;
use crate::app::ports::StatusSink;
use crate::error::TransportError;

/// Maximum inbound token length (the vocabulary tops out well under this).
pub const TOKEN_CAP: usize = 64;

/// An inbound wire token, bounded so the hot path never reallocates.
pub type Token = heapless::String<TOKEN_CAP>;

/// Channel depth for inbound commands.
const CMD_DEPTH: usize = 8;

/// Channel depth for each outbound status lane.
const STATUS_DEPTH: usize = 16;

type CmdChannel = Channel<CriticalSectionRawMutex, CommandMsg, CMD_DEPTH>;
type StatusChannel = Channel<CriticalSectionRawMutex, StatusEvent, STATUS_DEPTH>;

/// A command delivered by a transport adapter.
#[derive(Debug, Clone)]
pub struct CommandMsg {
    /// Which adapter delivered it (for logging only — routing is uniform).
    pub source: &'static str,
    pub token: Token,
}

// ───────────────────────────────────────────────────────────────
// Command bus (adapters → dispatch loop)
// ───────────────────────────────────────────────────────────────

/// Shared inbound command bus.  `submit` is the adapters' side,
/// `recv_blocking` the dispatch loop's.
#[derive(Clone)]
pub struct CommandBus {
    ch: Arc<CmdChannel>,
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBus {
    pub fn new() -> Self {
        Self {
            ch: Arc::new(Channel::new()),
        }
    }

    /// Queue one token.  Non-blocking; a full bus drops the command.
    pub fn submit(&self, source: &'static str, token: &str) -> Result<(), TransportError> {
        let mut bounded = Token::new();
        bounded
            .push_str(token)
            .map_err(|_| TransportError::MalformedPayload)?;
        self.ch
            .try_send(CommandMsg {
                source,
                token: bounded,
            })
            .map_err(|_| TransportError::CommandQueueFull)
    }

    /// Block until the next command arrives.  This is the core's
    /// `receiveCommand` operation.
    pub fn recv_blocking(&self) -> CommandMsg {
        future::block_on(self.ch.receive())
    }

    /// Non-blocking receive, for tests and drain loops.
    pub fn try_recv(&self) -> Option<CommandMsg> {
        self.ch.try_receive().ok()
    }
}

// ───────────────────────────────────────────────────────────────
// Status lanes (dispatch loop / poller → adapters)
// ───────────────────────────────────────────────────────────────

/// One adapter's outbound status queue.
#[derive(Clone)]
pub struct StatusLane {
    name: &'static str,
    ch: Arc<StatusChannel>,
}

impl StatusLane {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Await the next status event (adapter I/O task side).
    pub async fn recv(&self) -> StatusEvent {
        self.ch.receive().await
    }

    /// Blocking receive with a timeout, for adapters that pump status from
    /// a plain thread.  Returns `None` on timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<StatusEvent> {
        future::block_on(future::or(async { Some(self.ch.receive().await) }, async {
            async_io_mini::Timer::after(timeout).await;
            None
        }))
    }

    fn try_send(&self, event: StatusEvent) -> bool {
        self.ch.try_send(event).is_ok()
    }
}

/// Fan-out of status events to every enabled adapter lane.
///
/// `emit` never blocks: each lane gets a `try_send`, and a full lane drops
/// only its own copy with a warning — one stalled adapter cannot delay or
/// starve the others.
#[derive(Clone, Default)]
pub struct StatusFanout {
    lanes: Vec<StatusLane>,
}

impl StatusFanout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lane for an adapter and return its receiving handle.
    pub fn open_lane(&mut self, name: &'static str) -> StatusLane {
        let lane = StatusLane {
            name,
            ch: Arc::new(Channel::new()),
        };
        self.lanes.push(lane.clone());
        lane
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn broadcast(&self, event: StatusEvent) {
        for lane in &self.lanes {
            if !lane.try_send(event) {
                warn!("status lane {} full, dropping {event}", lane.name);
            }
        }
    }
}

impl StatusSink for StatusFanout {
    fn emit(&mut self, event: StatusEvent) {
        self.broadcast(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_roundtrip_preserves_source_and_token() {
        let bus = CommandBus::new();
        bus.submit("udp", "light_on").unwrap();
        let msg = bus.recv_blocking();
        assert_eq!(msg.source, "udp");
        assert_eq!(msg.token.as_str(), "light_on");
    }

    #[test]
    fn bus_rejects_oversized_tokens() {
        let bus = CommandBus::new();
        let long = "x".repeat(TOKEN_CAP + 1);
        assert_eq!(
            bus.submit("udp", &long),
            Err(TransportError::MalformedPayload)
        );
    }

    #[test]
    fn full_bus_reports_queue_full() {
        let bus = CommandBus::new();
        for _ in 0..CMD_DEPTH {
            bus.submit("udp", "on").unwrap();
        }
        assert_eq!(
            bus.submit("udp", "off"),
            Err(TransportError::CommandQueueFull)
        );
    }

    #[test]
    fn fanout_reaches_every_lane() {
        let mut fanout = StatusFanout::new();
        let a = fanout.open_lane("udp");
        let b = fanout.open_lane("mqtt");
        fanout.broadcast(StatusEvent::ButtonHigh);
        assert_eq!(
            a.recv_timeout(Duration::from_millis(100)),
            Some(StatusEvent::ButtonHigh)
        );
        assert_eq!(
            b.recv_timeout(Duration::from_millis(100)),
            Some(StatusEvent::ButtonHigh)
        );
    }

    #[test]
    fn full_lane_does_not_block_others() {
        let mut fanout = StatusFanout::new();
        let stalled = fanout.open_lane("stalled");
        let healthy = fanout.open_lane("healthy");
        // Overflow the stalled lane without draining it.
        for _ in 0..=STATUS_DEPTH {
            fanout.broadcast(StatusEvent::Ok);
        }
        // The healthy lane still saw every event up to its own depth.
        let mut drained = 0;
        while healthy.recv_timeout(Duration::from_millis(10)).is_some() {
            drained += 1;
        }
        assert_eq!(drained, STATUS_DEPTH);
        drop(stalled);
    }

    #[test]
    fn lane_order_is_fifo() {
        let mut fanout = StatusFanout::new();
        let lane = fanout.open_lane("udp");
        fanout.broadcast(StatusEvent::ButtonHigh);
        fanout.broadcast(StatusEvent::ButtonLow);
        assert_eq!(
            lane.recv_timeout(Duration::from_millis(100)),
            Some(StatusEvent::ButtonHigh)
        );
        assert_eq!(
            lane.recv_timeout(Duration::from_millis(100)),
            Some(StatusEvent::ButtonLow)
        );
    }

    #[test]
    fn recv_timeout_times_out_when_idle() {
        let mut fanout = StatusFanout::new();
        let lane = fanout.open_lane("udp");
        assert_eq!(lane.recv_timeout(Duration::from_millis(10)), None);
    }
}
