//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the three relay drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  This is the only module
//! in the system that touches actual actuator hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::relay::RelayDriver;
use crate::engine::actuators::Actuator;
use crate::engine::snapshot::SensorSnapshot;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    pump: RelayDriver,
    fan: RelayDriver,
    turner: RelayDriver,
}

impl HardwareAdapter {
    pub fn new(
        sensor_hub: SensorHub,
        pump: RelayDriver,
        fan: RelayDriver,
        turner: RelayDriver,
    ) -> Self {
        Self {
            sensor_hub,
            pump,
            fan,
            turner,
        }
    }

    fn relay(&mut self, actuator: Actuator) -> &mut RelayDriver {
        match actuator {
            Actuator::Pump => &mut self.pump,
            Actuator::Fan => &mut self.fan,
            Actuator::Turner => &mut self.turner,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_all(&mut self) -> SensorSnapshot {
        self.sensor_hub.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_actuator(&mut self, actuator: Actuator, on: bool) {
        self.relay(actuator).set(on);
    }

    fn all_off(&mut self) {
        self.pump.set(false);
        self.fan.set(false);
        self.turner.set(false);
    }
}
