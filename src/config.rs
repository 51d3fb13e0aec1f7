//! System configuration parameters
//!
//! All tunable parameters for the CompostTech controller.  Defaults match
//! the reference deployment; individual values can be overridden at build
//! time or through a provisioning channel.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Decision thresholds ---
    /// Soil moisture (%) below which irrigation is triggered.
    pub moisture_threshold_pct: f32,
    /// Compost temperature (°C) above which the fan is held open.
    pub critical_temp_c: f32,
    /// Lower bound (°C, exclusive) of the anaerobic-risk temperature band.
    pub anaerobic_temp_low_c: f32,
    /// Upper bound (°C, exclusive) of the anaerobic-risk temperature band.
    pub anaerobic_temp_high_c: f32,
    /// MQ-135 raw counts above which gas build-up is assumed.
    pub gas_alert_raw: f32,
    /// Fill distance (cm) below which the pile is considered compacted.
    pub compaction_distance_cm: f32,

    // --- Actuation durations ---
    /// Pump + fan run time for a moisture-triggered irrigation (ms).
    pub irrigation_duration_ms: u64,
    /// Turner run time for a remote TURNER_ON override (ms).
    pub remote_turn_duration_ms: u64,
    /// Turner run time for the anaerobic-risk rule (ms).
    pub anaerobic_turn_duration_ms: u64,
    /// Turner run time for the compaction rule (ms).
    pub compaction_turn_duration_ms: u64,

    // --- Timing ---
    /// Sampling cycle interval (ms): acquire → decide → apply → report.
    pub sample_interval_ms: u64,

    // --- Network ---
    /// MQTT broker host or IP.
    pub mqtt_broker: heapless::String<48>,
    /// MQTT broker port.
    pub mqtt_port: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Thresholds
            moisture_threshold_pct: 45.0,
            critical_temp_c: 65.0,
            anaerobic_temp_low_c: 40.0,
            anaerobic_temp_high_c: 50.0,
            gas_alert_raw: 10_000.0,
            compaction_distance_cm: 10.0,

            // Durations
            irrigation_duration_ms: 30_000,
            remote_turn_duration_ms: 10_000,
            anaerobic_turn_duration_ms: 15_000,
            compaction_turn_duration_ms: 20_000,

            // Timing
            sample_interval_ms: 5_000,

            // Network
            mqtt_broker: heapless::String::new(),
            mqtt_port: 1883,
        }
    }
}
