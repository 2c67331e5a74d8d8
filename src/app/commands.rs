//! Inbound command vocabulary.
//!
//! Tokens are matched exactly and case-sensitively.  Two actuator commands
//! kept their legacy aliases when the latch protocol was renamed
//! (`magnet_on`/`magnet_off`), so both spellings map to the same action.
//! Anything else parses to [`Command::Unknown`] — logged and acknowledged,
//! never rejected.

/// Commands the router understands, one variant per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Liveness probe; also the wake-up token for session-based adapters.
    Alive,
    /// Stop the controller process cleanly.
    Quit,
    /// Start the breathing LED animation.
    LedOn,
    /// Stop the breathing LED animation.
    LedOff,
    /// Energise the latch magnet (manual close).
    LatchClose,
    /// Pulse the latch open, then auto-close.
    LatchOpen,
    SmokeOn,
    SmokeOff,
    LightOn,
    LightOff,
    /// Energise the motion-sensor enable relay.
    MotionOn,
    /// De-energise the motion-sensor enable relay.
    MotionOff,
    /// Reboot the host (fire-and-forget, delegated to the OS).
    Reboot,
    /// Power the host down (fire-and-forget, delegated to the OS).
    Shutdown,
    /// Unrecognised token — no-op with log, still acknowledged.
    Unknown,
}

impl Command {
    /// Parse a wire token. Exact match, case-sensitive.
    pub fn parse(token: &str) -> Self {
        match token {
            "alive" => Self::Alive,
            "quit" => Self::Quit,
            "on" => Self::LedOn,
            "off" => Self::LedOff,
            "latch_close" | "magnet_on" => Self::LatchClose,
            "latch_open" | "magnet_off" => Self::LatchOpen,
            "smoke_on" => Self::SmokeOn,
            "smoke_off" => Self::SmokeOff,
            "light_on" => Self::LightOn,
            "light_off" => Self::LightOff,
            "motion_on" => Self::MotionOn,
            "motion_off" => Self::MotionOff,
            "reboot" => Self::Reboot,
            "shutdown" => Self::Shutdown,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_same_command() {
        assert_eq!(Command::parse("latch_close"), Command::parse("magnet_on"));
        assert_eq!(Command::parse("latch_open"), Command::parse("magnet_off"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(Command::parse("Quit"), Command::Unknown);
        assert_eq!(Command::parse("ALIVE"), Command::Unknown);
    }

    #[test]
    fn whitespace_is_not_stripped() {
        assert_eq!(Command::parse("quit "), Command::Unknown);
        assert_eq!(Command::parse(" on"), Command::Unknown);
    }

    #[test]
    fn full_vocabulary_parses() {
        for (token, cmd) in [
            ("alive", Command::Alive),
            ("quit", Command::Quit),
            ("on", Command::LedOn),
            ("off", Command::LedOff),
            ("smoke_on", Command::SmokeOn),
            ("smoke_off", Command::SmokeOff),
            ("light_on", Command::LightOn),
            ("light_off", Command::LightOff),
            ("motion_on", Command::MotionOn),
            ("motion_off", Command::MotionOff),
            ("reboot", Command::Reboot),
            ("shutdown", Command::Shutdown),
        ] {
            assert_eq!(Command::parse(token), cmd, "token {token}");
        }
    }
}
