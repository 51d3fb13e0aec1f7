//! End-to-end decision-engine scenarios through the AppService.
//!
//! Each test drives a full acquire → decide → apply → report cycle against
//! the mock hardware and asserts on both the actuator bank and the calls
//! that reached the (mock) relays.

use compostech::app::events::AppEvent;
use compostech::app::service::AppService;
use compostech::config::SystemConfig;
use compostech::engine::actuators::Actuator;

use crate::mock_hw::{nominal_snapshot, MockHardware, RecordingSink};

fn make_app() -> (AppService, MockHardware, RecordingSink) {
    let mut app = AppService::new(SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

// ── Scenario A: dry soil → irrigation window ─────────────────

#[test]
fn dry_soil_turns_on_pump_and_fan_for_the_irrigation_window() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.soil_moisture_pct = 30.0;
    hw.snapshot.compost_temp_c = 55.0;
    hw.snapshot.gas_raw = 500.0;
    hw.snapshot.fill_distance_cm = 50.0;

    app.run_cycle(10_000, &mut hw, &mut sink);

    let pump = app.actuator_state(Actuator::Pump);
    assert!(pump.is_on);
    assert_eq!(pump.off_deadline_ms, Some(40_000));

    let fan = app.actuator_state(Actuator::Fan);
    assert!(fan.is_on);
    assert_eq!(fan.off_deadline_ms, Some(40_000));

    assert!(!app.actuator_state(Actuator::Turner).is_on);
    assert!(hw.is_on(Actuator::Pump));
    assert!(hw.is_on(Actuator::Fan));
}

#[test]
fn moist_soil_produces_no_pump_transition() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.soil_moisture_pct = 45.0; // exactly at threshold: no fire

    app.run_cycle(0, &mut hw, &mut sink);

    assert!(!app.actuator_state(Actuator::Pump).is_on);
    assert!(!hw.is_on(Actuator::Pump));
    assert!(!hw.is_on(Actuator::Fan));
}

// ── Scenario B: critical temperature → fan hold-open ─────────

#[test]
fn critical_temp_holds_fan_open_from_off() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.compost_temp_c = 70.0;

    app.run_cycle(0, &mut hw, &mut sink);

    let fan = app.actuator_state(Actuator::Fan);
    assert!(fan.is_on);
    assert_eq!(fan.off_deadline_ms, None);
}

#[test]
fn critical_temp_overrides_a_running_irrigation_window() {
    let (mut app, mut hw, mut sink) = make_app();

    // First cycle: dry soil schedules fan for 30 s.
    hw.snapshot.soil_moisture_pct = 30.0;
    app.run_cycle(0, &mut hw, &mut sink);
    assert!(app.actuator_state(Actuator::Fan).off_deadline_ms.is_some());

    // Second cycle: compost overheats — the fan's pending shutoff is
    // replaced by a hold-open.
    hw.snapshot = nominal_snapshot();
    hw.snapshot.compost_temp_c = 70.0;
    app.run_cycle(5_000, &mut hw, &mut sink);

    let fan = app.actuator_state(Actuator::Fan);
    assert!(fan.is_on);
    assert_eq!(fan.off_deadline_ms, None);

    // Third cycle far in the future: the hold never times out.
    app.run_cycle(500_000, &mut hw, &mut sink);
    assert!(app.actuator_state(Actuator::Fan).is_on);
}

#[test]
fn fan_hold_clears_once_temperature_recovers() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.compost_temp_c = 70.0;
    app.run_cycle(0, &mut hw, &mut sink);

    hw.snapshot.compost_temp_c = 60.0;
    app.run_cycle(5_000, &mut hw, &mut sink);

    assert!(!app.actuator_state(Actuator::Fan).is_on);
    assert!(!hw.is_on(Actuator::Fan));
}

// ── Scenario C: turner rules merge longest-wins ──────────────

#[test]
fn anaerobic_and_compaction_merge_to_the_longer_turn() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.compost_temp_c = 45.0;
    hw.snapshot.gas_raw = 15_000.0;
    hw.snapshot.fill_distance_cm = 5.0;

    app.run_cycle(0, &mut hw, &mut sink);

    let turner = app.actuator_state(Actuator::Turner);
    assert!(turner.is_on);
    assert_eq!(turner.off_deadline_ms, Some(20_000)); // compaction's 20 s wins
    assert!(hw.is_on(Actuator::Turner));
}

// ── Scenario E: faulted temperature disables only its rules ──

#[test]
fn nan_temperature_disables_temp_rules_and_reports_the_fault() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.compost_temp_c = f32::NAN;
    hw.snapshot.gas_raw = 15_000.0; // would fire the anaerobic rule if it could
    hw.snapshot.soil_moisture_pct = 30.0;
    hw.snapshot.fill_distance_cm = 5.0;

    app.run_cycle(0, &mut hw, &mut sink);

    // Temperature-dependent rules stand down...
    assert!(!app.actuator_state(Actuator::Fan).is_held_open());
    // ...while moisture and compaction proceed.
    assert!(app.actuator_state(Actuator::Pump).is_on);
    assert!(app.actuator_state(Actuator::Turner).is_on);

    // The fault is reported, not silently dropped.
    assert!(sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::SensorFault(mask) if *mask != 0)));
}

// ── Expiry across cycles ─────────────────────────────────────

#[test]
fn irrigation_window_expires_on_a_later_cycle() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.soil_moisture_pct = 30.0;
    app.run_cycle(0, &mut hw, &mut sink);
    assert!(app.actuator_state(Actuator::Pump).is_on);

    // Moisture recovered; the 30 s window lapses by the 35 s cycle.
    hw.snapshot = nominal_snapshot();
    app.run_cycle(35_000, &mut hw, &mut sink);

    assert!(!app.actuator_state(Actuator::Pump).is_on);
    assert!(!app.actuator_state(Actuator::Fan).is_on);
    assert!(!hw.is_on(Actuator::Pump));
    assert!(!hw.is_on(Actuator::Fan));
}

#[test]
fn persistent_dry_soil_rearms_after_expiry() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.soil_moisture_pct = 30.0;

    app.run_cycle(0, &mut hw, &mut sink);
    assert_eq!(
        app.actuator_state(Actuator::Pump).off_deadline_ms,
        Some(30_000)
    );

    // Pump still committed mid-window: no re-arm, deadline unchanged.
    app.run_cycle(5_000, &mut hw, &mut sink);
    assert_eq!(
        app.actuator_state(Actuator::Pump).off_deadline_ms,
        Some(30_000)
    );

    // Window lapsed, soil still dry: tick retires the pump first, then the
    // moisture rule opens a fresh window in the same cycle.
    app.run_cycle(35_000, &mut hw, &mut sink);
    assert_eq!(
        app.actuator_state(Actuator::Pump).off_deadline_ms,
        Some(65_000)
    );
}

// ── Telemetry ────────────────────────────────────────────────

#[test]
fn every_cycle_emits_one_telemetry_record() {
    let (mut app, mut hw, mut sink) = make_app();

    app.run_cycle(0, &mut hw, &mut sink);
    app.run_cycle(5_000, &mut hw, &mut sink);

    let records: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(t) => Some(t),
            _ => None,
        })
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].cycle, 1);
    assert_eq!(records[1].cycle, 2);
    assert_eq!(records[1].uptime_ms, 5_000);
}

#[test]
fn telemetry_carries_applied_transitions() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.snapshot.soil_moisture_pct = 30.0;

    app.run_cycle(0, &mut hw, &mut sink);

    let record = sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::Telemetry(t) => Some(t),
            _ => None,
        })
        .expect("telemetry record");
    assert_eq!(record.transitions.len(), 2); // pump + fan on
    let json = record.to_json().unwrap();
    assert!(json.contains("\"transitions\""));
    assert!(json.contains("\"pump\""));
}
