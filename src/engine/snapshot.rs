//! Point-in-time sensor snapshot.
//!
//! One `SensorSnapshot` is produced atomically per sampling cycle by the
//! acquisition side and handed to the decision engine as a whole — partial
//! reads never cross a cycle boundary.  Only the most recent snapshot is
//! relevant; there is no history buffer.
//!
//! A field that could not be read this cycle carries `f32::NAN` as its
//! fault sentinel, which is distinct from any legitimate zero reading.
//! `fault_mask()` folds the sentinels into a [`SensorFault`] bitmask for
//! telemetry.

use serde::Serialize;

use crate::error::SensorFault;

/// A point-in-time snapshot of every sensor in the system.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SensorSnapshot {
    /// Soil moisture, linearly mapped and clamped to 0–100 %.
    pub soil_moisture_pct: f32,
    /// Compost core temperature (°C) from the DS18B20 probe.  NaN on fault.
    pub compost_temp_c: f32,
    /// Ambient air temperature (°C) from the DHT11.  NaN on fault.
    pub air_temp_c: f32,
    /// Ambient relative humidity (%) from the DHT11.  NaN on fault.
    pub air_humidity_pct: f32,
    /// pH, linearized from the probe's analog output.
    pub ph: f32,
    /// MQ-135 gas channel, raw ADC counts.  Monitoring only.
    pub gas_raw: f32,
    /// Conductivity channel, raw ADC counts.  Monitoring only.
    pub conductivity_raw: f32,
    /// Cumulative load-cell mass (g).
    pub load_mass_g: i32,
    /// Distance from the ultrasonic sensor to the pile surface (cm).
    /// Smaller = fuller / more compacted.  NaN on echo timeout.
    pub fill_distance_cm: f32,
    /// Colour sensor channels (R, G, B).  Reserved — unused by the
    /// current ruleset.
    pub color_rgb: (u16, u16, u16),
}

impl SensorSnapshot {
    /// Fold the NaN fault sentinels into a [`SensorFault`] bitmask.
    ///
    /// A set bit means the field was unavailable this cycle and every
    /// decision rule depending on it was skipped.
    pub fn fault_mask(&self) -> u8 {
        let mut mask = 0;
        if !self.soil_moisture_pct.is_finite() {
            mask |= SensorFault::SoilMoisture.mask();
        }
        if !self.compost_temp_c.is_finite() {
            mask |= SensorFault::CompostTemp.mask();
        }
        if !self.air_temp_c.is_finite() || !self.air_humidity_pct.is_finite() {
            mask |= SensorFault::AirClimate.mask();
        }
        if !self.gas_raw.is_finite() {
            mask |= SensorFault::Gas.mask();
        }
        if !self.fill_distance_cm.is_finite() {
            mask |= SensorFault::FillLevel.mask();
        }
        if !self.ph.is_finite() {
            mask |= SensorFault::Ph.mask();
        }
        mask
    }

    /// True if every field the ruleset depends on was read successfully.
    pub fn is_clean(&self) -> bool {
        self.fault_mask() == 0
    }
}
