//! Outbound status events.
//!
//! The wire vocabulary the show controller understands.  Events are emitted
//! by the command router (acknowledgments, latch-closed notifications) and
//! the sensor poller (edges), and fan out to every enabled transport
//! adapter.  There is deliberately no error token — failures are logged
//! locally, never surfaced to the peer.

/// Status events, one per wire token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// Generic acknowledgment for a processed command.
    Ok,
    /// Push button pressed (debounced rising edge).
    ButtonHigh,
    /// Push button released.
    ButtonLow,
    /// Doorbell contact closed.
    DoorbellHigh,
    /// Doorbell contact released.
    DoorbellLow,
    /// Latch re-energised (closed) — manual close or end of a pulse.
    Latch1Closed,
    /// Motion-enable relay de-energised.
    Latch2Closed,
}

impl StatusEvent {
    /// Exact wire token for this event.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::ButtonHigh => "high",
            Self::ButtonLow => "low",
            Self::DoorbellHigh => "high2",
            Self::DoorbellLow => "low2",
            Self::Latch1Closed => "latch1_closed",
            Self::Latch2Closed => "latch2_closed",
        }
    }
}

impl core::fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_match_wire_vocabulary() {
        assert_eq!(StatusEvent::Ok.token(), "ok");
        assert_eq!(StatusEvent::ButtonHigh.token(), "high");
        assert_eq!(StatusEvent::ButtonLow.token(), "low");
        assert_eq!(StatusEvent::DoorbellHigh.token(), "high2");
        assert_eq!(StatusEvent::DoorbellLow.token(), "low2");
        assert_eq!(StatusEvent::Latch1Closed.token(), "latch1_closed");
        assert_eq!(StatusEvent::Latch2Closed.token(), "latch2_closed");
    }
}
