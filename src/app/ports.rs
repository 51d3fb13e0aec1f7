//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, event sinks) implement these traits.
//! The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::engine::actuators::Actuator;
use crate::engine::snapshot::SensorSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle to obtain a fully
/// populated snapshot.
///
/// Implementations MUST mark a field they could not read with the NaN fault
/// sentinel — never leave "zero reading" and "sensor fault" ambiguous.
pub trait SensorPort {
    /// Read every sensor and return a unified snapshot.
    fn read_all(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the physical relays.
///
/// Calls are idempotent — setting an already-on relay on again is harmless,
/// so the domain can replay its full transition list without read-back.
pub trait ActuatorPort {
    /// Drive one actuator's relay high or low.
    fn set_actuator(&mut self, actuator: Actuator, on: bool);

    /// Kill every actuator — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, MQTT
/// publish, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
