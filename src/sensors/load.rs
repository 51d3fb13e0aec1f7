//! HX711 load-cell amplifier — cumulative pile mass.
//!
//! 24-bit sigma-delta ADC clocked out serially.  Each cycle averages five
//! samples (the raw output is noisy at the single-digit-gram level), then
//! applies the tare offset and scale factor from the bench calibration.
//! The reading is monitoring-only in the current ruleset.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-banged serial read via hw_init.
//! On host/test: reads raw counts from a static atomic.

use core::sync::atomic::{AtomicI32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

static SIM_LOAD_RAW: AtomicI32 = AtomicI32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_load_raw(raw: i32) {
    SIM_LOAD_RAW.store(raw, Ordering::Relaxed);
}

/// Samples averaged per reading.
const SAMPLES: u32 = 5;

pub struct LoadCellSensor {
    _dt_gpio: i32,
    _sck_gpio: i32,
    /// Raw counts at zero load (bench tare).
    tare_offset: i32,
    /// Raw counts per gram.
    scale: f32,
}

impl LoadCellSensor {
    pub fn new(dt_gpio: i32, sck_gpio: i32) -> Self {
        Self {
            _dt_gpio: dt_gpio,
            _sck_gpio: sck_gpio,
            tare_offset: 0,
            scale: 420.0,
        }
    }

    /// Override the bench calibration (tare counts, counts per gram).
    pub fn set_calibration(&mut self, tare_offset: i32, scale: f32) {
        self.tare_offset = tare_offset;
        self.scale = if scale.abs() < f32::EPSILON { 1.0 } else { scale };
    }

    /// Averaged mass in grams.
    pub fn read_grams(&mut self) -> i32 {
        let mut sum: i64 = 0;
        for _ in 0..SAMPLES {
            sum += i64::from(self.read_raw());
        }
        let avg = (sum / i64::from(SAMPLES)) as i32;
        ((avg - self.tare_offset) as f32 / self.scale) as i32
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&self) -> i32 {
        hw_init::hx711_read_raw(self._dt_gpio, self._sck_gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&self) -> i32 {
        SIM_LOAD_RAW.load(Ordering::Relaxed)
    }
}
