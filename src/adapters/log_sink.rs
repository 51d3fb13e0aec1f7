//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (which goes to UART / USB-CDC in production).  The MQTT
//! adapter implements the same trait for the network side.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | cycle={} | soil={:.1}% | compost={:.1}\u{00b0}C | \
                     air={:.1}\u{00b0}C/{:.0}% | pH={:.2} | gas={:.0} | ec={:.0} | \
                     mass={}g | fill={:.1}cm | faults=0b{:08b}",
                    t.cycle,
                    t.sensors.soil_moisture_pct,
                    t.sensors.compost_temp_c,
                    t.sensors.air_temp_c,
                    t.sensors.air_humidity_pct,
                    t.sensors.ph,
                    t.sensors.gas_raw,
                    t.sensors.conductivity_raw,
                    t.sensors.load_mass_g,
                    t.sensors.fill_distance_cm,
                    t.sensor_faults,
                );
            }
            AppEvent::ActuatorChanged(t) => match t.until_ms {
                Some(until) => info!(
                    "ACT   | {} -> {} (until {}ms)",
                    t.actuator.name(),
                    if t.on { "ON" } else { "OFF" },
                    until
                ),
                None if t.on => info!("ACT   | {} -> ON (held open)", t.actuator.name()),
                None => info!("ACT   | {} -> OFF", t.actuator.name()),
            },
            AppEvent::SensorFault(mask) => {
                warn!("FAULT | sensors unavailable, mask=0b{:08b}", mask);
            }
            AppEvent::CommandApplied(cmd) => {
                info!("CMD   | applied {}", cmd.name());
            }
            AppEvent::CommandRejected(e) => {
                warn!("CMD   | rejected: {e}");
            }
            AppEvent::Started => {
                info!("START | controller up, all actuators off");
            }
        }
    }
}
