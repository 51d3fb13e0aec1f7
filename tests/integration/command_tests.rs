//! Remote command channel integration tests.
//!
//! Commands enter the AppService as raw payload strings, exactly as the
//! MQTT adapter would hand them over after staging them in the mailbox.

use compostech::app::commands::RemoteCommand;
use compostech::app::events::AppEvent;
use compostech::app::service::AppService;
use compostech::config::SystemConfig;
use compostech::engine::actuators::Actuator;
use compostech::error::CommandError;

use crate::mock_hw::{MockHardware, RecordingSink};

fn make_app() -> (AppService, MockHardware, RecordingSink) {
    let mut app = AppService::new(SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

// ── Scenario D: PUMP_ON schedules pump and fan ───────────────

#[test]
fn pump_on_schedules_pump_and_fan_from_receipt_time() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command("PUMP_ON", 7_000, &mut hw, &mut sink);

    for actuator in [Actuator::Pump, Actuator::Fan] {
        let state = app.actuator_state(actuator);
        assert!(state.is_on);
        assert_eq!(state.off_deadline_ms, Some(37_000));
        assert!(hw.is_on(actuator));
    }
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::CommandApplied(RemoteCommand::PumpOn)
    )));
}

#[test]
fn turner_on_schedules_the_fixed_override_window() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command("TURNER_ON", 1_000, &mut hw, &mut sink);

    let turner = app.actuator_state(Actuator::Turner);
    assert!(turner.is_on);
    assert_eq!(turner.off_deadline_ms, Some(11_000));
    assert!(hw.is_on(Actuator::Turner));
}

// ── Merge policy against existing commitments ────────────────

#[test]
fn override_cannot_shorten_a_longer_commitment() {
    let (mut app, mut hw, mut sink) = make_app();

    // Compaction rule has the turner committed for 20 s.
    hw.snapshot.fill_distance_cm = 5.0;
    app.run_cycle(0, &mut hw, &mut sink);
    assert_eq!(
        app.actuator_state(Actuator::Turner).off_deadline_ms,
        Some(20_000)
    );

    // A 10 s remote override mid-window must not cut it short.
    app.handle_command("TURNER_ON", 2_000, &mut hw, &mut sink);
    assert_eq!(
        app.actuator_state(Actuator::Turner).off_deadline_ms,
        Some(20_000)
    );
}

#[test]
fn override_extends_a_shorter_commitment() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command("TURNER_ON", 0, &mut hw, &mut sink);
    assert_eq!(
        app.actuator_state(Actuator::Turner).off_deadline_ms,
        Some(10_000)
    );

    // A second override near the end of the window pushes the deadline out.
    app.handle_command("TURNER_ON", 8_000, &mut hw, &mut sink);
    assert_eq!(
        app.actuator_state(Actuator::Turner).off_deadline_ms,
        Some(18_000)
    );
}

#[test]
fn pump_on_cannot_preempt_a_fan_hold_open() {
    let (mut app, mut hw, mut sink) = make_app();

    // Critical temperature has the fan held open.
    hw.snapshot.compost_temp_c = 70.0;
    app.run_cycle(0, &mut hw, &mut sink);
    assert!(app.actuator_state(Actuator::Fan).is_held_open());

    app.handle_command("PUMP_ON", 1_000, &mut hw, &mut sink);

    // Pump gets its window; the fan keeps its safety hold.
    assert_eq!(
        app.actuator_state(Actuator::Pump).off_deadline_ms,
        Some(31_000)
    );
    assert!(app.actuator_state(Actuator::Fan).is_held_open());
}

// ── Unknown commands ─────────────────────────────────────────

#[test]
fn unknown_commands_are_reported_and_change_nothing() {
    let (mut app, mut hw, mut sink) = make_app();
    let calls_before = hw.calls.len();

    app.handle_command("REBOOT", 0, &mut hw, &mut sink);
    app.handle_command("pump_on", 0, &mut hw, &mut sink); // case-sensitive

    assert_eq!(hw.calls.len(), calls_before);
    for actuator in Actuator::ALL {
        assert!(!app.actuator_state(actuator).is_on);
    }
    let rejections = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::CommandRejected(CommandError::Unrecognized)))
        .count();
    assert_eq!(rejections, 2);
}

// ── Command applied between cycles survives the next tick ────

#[test]
fn command_window_is_respected_by_the_following_cycle() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command("TURNER_ON", 2_000, &mut hw, &mut sink);

    // Next sampling cycle at 5 s: window still open, nothing retired.
    app.run_cycle(5_000, &mut hw, &mut sink);
    assert!(app.actuator_state(Actuator::Turner).is_on);

    // Cycle after the deadline: tick retires the turner.
    app.run_cycle(15_000, &mut hw, &mut sink);
    assert!(!app.actuator_state(Actuator::Turner).is_on);
    assert!(!hw.is_on(Actuator::Turner));
}
