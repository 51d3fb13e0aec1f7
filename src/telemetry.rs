//! Telemetry record assembly.
//!
//! One [`TelemetryRecord`] is built at the end of every sampling cycle from
//! the snapshot, the post-decision actuator bank, and the applied
//! transitions.  The record serializes to JSON for the reporting
//! collaborator; faulted sensor fields (NaN) come out as `null`, so the
//! receiving side can always distinguish "zero" from "unavailable".

use serde::Serialize;

use crate::engine::actuators::{Actuator, ActuatorBank, Transitions};
use crate::engine::snapshot::SensorSnapshot;
use crate::engine::CycleDecision;

/// Reported state of one actuator at the end of a cycle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActuatorReport {
    pub actuator: Actuator,
    pub is_on: bool,
    /// Auto-off deadline (ms uptime); `null` while held open or off.
    pub off_deadline_ms: Option<u64>,
}

/// A point-in-time telemetry record suitable for logging or transmission.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    /// Monotonic uptime (ms) at which the cycle ran.
    pub uptime_ms: u64,
    /// Cycle counter since boot.
    pub cycle: u64,
    pub sensors: SensorSnapshot,
    pub actuators: [ActuatorReport; Actuator::COUNT],
    /// Transitions applied this cycle, in application order.
    pub transitions: Transitions,
    /// `SensorFault` bitmask for this cycle (0 = all sensors healthy).
    pub sensor_faults: u8,
    /// `Rule` bitmask of rules skipped due to sensor faults.
    pub rules_skipped: u8,
}

impl TelemetryRecord {
    /// Assemble the record for one completed cycle.
    pub fn build(
        uptime_ms: u64,
        cycle: u64,
        sensors: &SensorSnapshot,
        bank: &ActuatorBank,
        decision: &CycleDecision,
    ) -> Self {
        let actuators = Actuator::ALL.map(|a| {
            let s = bank.state(a);
            ActuatorReport {
                actuator: a,
                is_on: s.is_on,
                off_deadline_ms: s.off_deadline_ms,
            }
        });
        Self {
            uptime_ms,
            cycle,
            sensors: *sensors,
            actuators,
            transitions: decision.transitions.clone(),
            sensor_faults: decision.sensor_faults,
            rules_skipped: decision.rules_skipped,
        }
    }

    /// Serialize to the wire format used on the data topic.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
