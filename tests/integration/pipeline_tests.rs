//! Integration tests: command bus → router → status fan-out, end to end.
//!
//! Drives the same channel plumbing `main` wires up, with two status
//! lanes standing in for the two transports.

use core::time::Duration;

use proprig::app::events::StatusEvent;
use proprig::app::flags::SharedFlags;
use proprig::app::router::{CommandRouter, Decision};
use proprig::config::SystemConfig;
use proprig::runtime::poll_tick;
use proprig::transport::channels::{CommandBus, StatusFanout, StatusLane};

use crate::mock_hw::{RecordingPin, RecordingSystem};

const LANE_WAIT: Duration = Duration::from_millis(100);
const LANE_IDLE: Duration = Duration::from_millis(10);

fn drain(lane: &StatusLane) -> Vec<StatusEvent> {
    let mut events = Vec::new();
    while let Some(ev) = lane.recv_timeout(LANE_IDLE) {
        events.push(ev);
    }
    events
}

fn router(
    config: &SystemConfig,
    flags: SharedFlags,
) -> CommandRouter<RecordingPin, RecordingSystem> {
    CommandRouter::new(
        config,
        flags,
        RecordingSystem::new(),
        RecordingPin::new(),
        RecordingPin::new(),
        RecordingPin::new(),
        RecordingPin::new(),
    )
}

#[test]
fn commands_from_both_transports_fan_out_to_both_lanes() {
    let config = SystemConfig {
        pulse_open_ms: 1,
        pulse_settle_ms: 1,
        ..SystemConfig::default()
    };
    let flags = SharedFlags::new();
    let bus = CommandBus::new();
    let mut fanout = StatusFanout::new();
    let udp_lane = fanout.open_lane("udp");
    let mqtt_lane = fanout.open_lane("mqtt");
    let mut router = router(&config, flags);

    // Interleaved traffic from two adapters, ending with quit.
    bus.submit("udp", "light_on").unwrap();
    bus.submit("mqtt", "motion_off").unwrap();
    bus.submit("udp", "magnet_off").unwrap();
    bus.submit("mqtt", "quit").unwrap();

    loop {
        let msg = bus.recv_blocking();
        if router.dispatch(&msg.token, &mut fanout) == Decision::Quit {
            break;
        }
    }

    let expected = vec![
        StatusEvent::Ok,           // light_on
        StatusEvent::Latch2Closed, // motion_off
        StatusEvent::Latch1Closed, // magnet_off pulse
    ];
    // Every enabled adapter sees every event, in emission order.
    assert_eq!(drain(&udp_lane), expected);
    assert_eq!(drain(&mqtt_lane), expected);
}

#[test]
fn sensor_events_share_the_same_fanout_as_acks() {
    let flags = SharedFlags::new();
    let mut fanout = StatusFanout::new();
    let lane = fanout.open_lane("udp");

    use proprig::adapters::gpio::SimInputPin;
    use proprig::drivers::debounce::{DebouncedSensor, SensorKind};

    let (mut button_pin, button_level) = SimInputPin::new(false);
    let (mut bell_pin, _bell_level) = SimInputPin::new(true);
    let mut button = DebouncedSensor::new(SensorKind::Button);
    let mut doorbell = DebouncedSensor::new(SensorKind::Doorbell);

    button_level.set_high(true);
    poll_tick(
        &mut button,
        &mut button_pin,
        &mut doorbell,
        &mut bell_pin,
        &flags,
        &fanout,
    );
    button_level.set_high(false);
    poll_tick(
        &mut button,
        &mut button_pin,
        &mut doorbell,
        &mut bell_pin,
        &flags,
        &fanout,
    );

    assert_eq!(lane.recv_timeout(LANE_WAIT), Some(StatusEvent::ButtonHigh));
    assert_eq!(lane.recv_timeout(LANE_WAIT), Some(StatusEvent::ButtonLow));
}

#[test]
fn no_sensor_event_leaks_while_pulse_runs() {
    let config = SystemConfig {
        pulse_open_ms: 1,
        pulse_settle_ms: 1,
        ..SystemConfig::default()
    };
    let flags = SharedFlags::new();
    let mut fanout = StatusFanout::new();
    let lane = fanout.open_lane("udp");
    let mut router = router(&config, flags.clone());

    use proprig::adapters::gpio::SimInputPin;
    use proprig::drivers::debounce::{DebouncedSensor, SensorKind};

    let (mut button_pin, button_level) = SimInputPin::new(false);
    let (mut bell_pin, _bell) = SimInputPin::new(true);
    let mut button = DebouncedSensor::new(SensorKind::Button);
    let mut doorbell = DebouncedSensor::new(SensorKind::Doorbell);

    // A button press lands while the interlock is held.
    let guard = flags.begin_pulse().unwrap();
    button_level.set_high(true);
    poll_tick(
        &mut button,
        &mut button_pin,
        &mut doorbell,
        &mut bell_pin,
        &flags,
        &fanout,
    );
    drop(guard);

    // The pulse command itself reports, the suppressed press does not.
    router.dispatch("magnet_off", &mut fanout);
    assert_eq!(drain(&lane), vec![StatusEvent::Latch1Closed]);

    // Once the interlock clears, the still-held level finally reports.
    poll_tick(
        &mut button,
        &mut button_pin,
        &mut doorbell,
        &mut bell_pin,
        &flags,
        &fanout,
    );
    assert_eq!(drain(&lane), vec![StatusEvent::ButtonHigh]);
}
