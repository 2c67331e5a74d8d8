//! UDP framing and wake-up session policy.
//!
//! Both directions of the UDP wire carry the bare token behind a fixed
//! 6-character transport marker (`raspi\`, with `raspi/` accepted inbound
//! for older senders).  The marker is adapter-level plumbing — the core
//! never sees it.
//!
//! The wake-up handshake is also adapter-level: a freshly started UDP
//! session accepts only `alive`, which it acknowledges itself and uses to
//! enter the operating phase.  Every other pre-wake token is ignored
//! without side effects.  Pub/sub adapters have no equivalent session
//! concept and skip this module entirely.

/// Length of the transport marker prefix.
pub const MARKER_LEN: usize = 6;

/// Marker prepended to every outbound datagram.
pub const MARKER_OUT: &str = "raspi\\";

/// Inbound marker variants (historic senders used a forward slash).
const MARKERS_IN: [&str; 2] = ["raspi\\", "raspi/"];

/// Strip the transport marker from an inbound payload, if present.
pub fn strip_marker(raw: &str) -> &str {
    for marker in MARKERS_IN {
        if let Some(token) = raw.strip_prefix(marker) {
            return token;
        }
    }
    raw
}

/// Frame a status token for the wire.
pub fn frame_status(token: &str) -> heapless::String<72> {
    let mut framed = heapless::String::new();
    // Marker + token always fit: 6 + TOKEN_CAP < 72 is checked at the
    // channel boundary, and status tokens are static.
    let _ = framed.push_str(MARKER_OUT);
    let _ = framed.push_str(token);
    framed
}

// ───────────────────────────────────────────────────────────────
// Wake-up session
// ───────────────────────────────────────────────────────────────

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Only `alive` is accepted.
    WaitWakeup,
    /// Tokens flow to the command router.
    Operating,
}

/// What the adapter should do with an inbound token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Forward to the command bus.
    Forward,
    /// The wake-up `alive`: acknowledge locally, do not forward.
    WakeAck,
    /// Pre-wake token: drop silently.
    Ignored,
}

/// Two-phase session state machine.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::WaitWakeup,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_operating(&self) -> bool {
        self.phase == Phase::Operating
    }

    /// Classify one inbound token and advance the phase.
    pub fn accept(&mut self, token: &str) -> Verdict {
        match self.phase {
            Phase::Operating => Verdict::Forward,
            Phase::WaitWakeup if token == "alive" => {
                self.phase = Phase::Operating;
                Verdict::WakeAck
            }
            Phase::WaitWakeup => Verdict::Ignored,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
