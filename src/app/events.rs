//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial, publish over MQTT, etc.

use super::commands::RemoteCommand;
use crate::engine::actuators::Transition;
use crate::error::CommandError;
use crate::telemetry::TelemetryRecord;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// End-of-cycle telemetry record (snapshot + applied transitions).
    Telemetry(TelemetryRecord),

    /// An actuator state change was applied to hardware.
    ActuatorChanged(Transition),

    /// One or more sensor fields were unavailable this cycle; the
    /// dependent rules were skipped.  Carries the `SensorFault` bitmask.
    SensorFault(u8),

    /// A remote command was accepted and applied.
    CommandApplied(RemoteCommand),

    /// A remote command was rejected (unrecognized payload etc.).
    CommandRejected(CommandError),

    /// The application service has started.
    Started,
}
