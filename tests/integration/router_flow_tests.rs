//! Integration tests: CommandRouter → actuators, at wire level.

use proprig::app::events::StatusEvent;
use proprig::app::flags::SharedFlags;
use proprig::app::router::{CommandRouter, Decision};
use proprig::config::SystemConfig;

use crate::mock_hw::{RecordingPin, RecordingSink, RecordingSystem};

struct Rig {
    router: CommandRouter<RecordingPin, RecordingSystem>,
    latch: RecordingPin,
    smoke: RecordingPin,
    light: RecordingPin,
    motion: RecordingPin,
    system: RecordingSystem,
    flags: SharedFlags,
    sink: RecordingSink,
}

fn rig() -> Rig {
    let config = SystemConfig {
        pulse_open_ms: 2,
        pulse_settle_ms: 2,
        ..SystemConfig::default()
    };
    let flags = SharedFlags::new();
    let latch = RecordingPin::new();
    let smoke = RecordingPin::new();
    let light = RecordingPin::new();
    let motion = RecordingPin::new();
    let system = RecordingSystem::new();
    let router = CommandRouter::new(
        &config,
        flags.clone(),
        system.clone(),
        latch.clone(),
        smoke.clone(),
        light.clone(),
        motion.clone(),
    );
    Rig {
        router,
        latch,
        smoke,
        light,
        motion,
        system,
        flags,
        sink: RecordingSink::new(),
    }
}

#[test]
fn startup_drives_rest_levels() {
    let r = rig();
    // Latch held closed, relay bank off (active-low): every output high.
    assert_eq!(r.latch.level(), Some(true));
    assert_eq!(r.smoke.level(), Some(true));
    assert_eq!(r.light.level(), Some(true));
    assert_eq!(r.motion.level(), Some(true));
}

#[test]
fn light_on_pulls_relay_low_and_acks() {
    let mut r = rig();
    r.router.dispatch("light_on", &mut r.sink);
    assert_eq!(r.light.level(), Some(false));
    assert_eq!(r.sink.tokens(), vec!["ok"]);

    r.router.dispatch("light_off", &mut r.sink);
    assert_eq!(r.light.level(), Some(true));
    assert_eq!(r.sink.tokens(), vec!["ok", "ok"]);
}

#[test]
fn smoke_commands_only_touch_smoke_relay() {
    let mut r = rig();
    r.router.dispatch("smoke_on", &mut r.sink);
    assert_eq!(r.smoke.level(), Some(false));
    assert_eq!(r.light.history(), vec![true]);
    assert_eq!(r.motion.history(), vec![true]);
    assert_eq!(r.latch.history(), vec![true]);
}

#[test]
fn latch_open_pulses_low_then_high_on_the_wire() {
    let mut r = rig();
    r.router.dispatch("latch_open", &mut r.sink);
    // Rest high, pulse low, auto-close high.
    assert_eq!(r.latch.history(), vec![true, false, true]);
    assert_eq!(r.sink.tokens(), vec!["latch1_closed"]);
    assert!(!r.flags.interlocked());
}

#[test]
fn motion_off_emits_latch2_closed_without_ok() {
    let mut r = rig();
    r.router.dispatch("motion_on", &mut r.sink);
    assert_eq!(r.motion.level(), Some(false));
    r.router.dispatch("motion_off", &mut r.sink);
    assert_eq!(r.motion.level(), Some(true));
    assert_eq!(r.sink.events, vec![StatusEvent::Ok, StatusEvent::Latch2Closed]);
}

#[test]
fn reboot_and_shutdown_delegate_to_system_port() {
    let mut r = rig();
    r.router.dispatch("reboot", &mut r.sink);
    r.router.dispatch("shutdown", &mut r.sink);
    assert_eq!(r.system.reboot_count(), 1);
    assert_eq!(r.system.shutdown_count(), 1);
    assert_eq!(r.sink.tokens(), vec!["ok", "ok"]);
}

#[test]
fn quit_returns_quit_and_silences_flashing() {
    let mut r = rig();
    r.router.dispatch("on", &mut r.sink);
    assert!(r.flags.flashing());
    assert_eq!(r.router.dispatch("quit", &mut r.sink), Decision::Quit);
    assert!(!r.flags.flashing());
    // on -> ok; quit -> nothing.
    assert_eq!(r.sink.tokens(), vec!["ok"]);
}

#[test]
fn unknown_commands_touch_nothing_but_still_ack() {
    let mut r = rig();
    r.router.dispatch("does_not_exist", &mut r.sink);
    assert_eq!(r.latch.history(), vec![true]);
    assert_eq!(r.smoke.history(), vec![true]);
    assert_eq!(r.light.history(), vec![true]);
    assert_eq!(r.motion.history(), vec![true]);
    assert_eq!(r.sink.tokens(), vec!["ok"]);
}

#[test]
fn command_sequence_produces_one_terminal_event_each() {
    let mut r = rig();
    let script = [
        "alive",
        "on",
        "magnet_off",
        "smoke_on",
        "smoke_off",
        "motion_off",
        "off",
        "nonsense",
    ];
    for token in script {
        r.router.dispatch(token, &mut r.sink);
    }
    assert_eq!(
        r.sink.tokens(),
        vec![
            "ok",            // alive
            "ok",            // on
            "latch1_closed", // magnet_off pulse
            "ok",            // smoke_on
            "ok",            // smoke_off
            "latch2_closed", // motion_off
            "ok",            // off
            "ok",            // nonsense
        ]
    );
}
