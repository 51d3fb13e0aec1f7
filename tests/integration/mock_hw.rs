//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO, and serves a canned snapshot the
//! test can rewrite between cycles.

use compostech::app::events::AppEvent;
use compostech::app::ports::{ActuatorPort, EventSink, SensorPort};
use compostech::engine::actuators::Actuator;
use compostech::engine::snapshot::SensorSnapshot;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCall {
    Set { actuator: Actuator, on: bool },
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    /// Snapshot returned by the next `read_all`.
    pub snapshot: SensorSnapshot,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            snapshot: nominal_snapshot(),
        }
    }

    /// Effective on/off state of one actuator from the call history.
    pub fn is_on(&self, actuator: Actuator) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Set { actuator: a, on } if *a == actuator => Some(*on),
                ActuatorCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        self.snapshot
    }
}

impl ActuatorPort for MockHardware {
    fn set_actuator(&mut self, actuator: Actuator, on: bool) {
        self.calls.push(ActuatorCall::Set { actuator, on });
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── Snapshot helpers ──────────────────────────────────────────

/// Everything healthy and mid-range: no rule fires on this snapshot.
pub fn nominal_snapshot() -> SensorSnapshot {
    SensorSnapshot {
        soil_moisture_pct: 60.0,
        compost_temp_c: 55.0,
        air_temp_c: 22.0,
        air_humidity_pct: 50.0,
        ph: 7.1,
        gas_raw: 500.0,
        conductivity_raw: 1_100.0,
        load_mass_g: 3_500,
        fill_distance_cm: 50.0,
        color_rgb: (140, 100, 70),
    }
}

// ── Recording sink ────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
