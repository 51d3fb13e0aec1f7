//! HC-SR04 ultrasonic fill-level sensor.
//!
//! Mounted in the enclosure lid pointing down at the pile: a 10 µs trigger
//! pulse starts a measurement and the echo pulse width encodes the
//! round-trip time.  Distance = pulse_µs × 0.0343 / 2 (speed of sound,
//! there and back).  Smaller distance = fuller / more compacted pile.
//! An echo timeout yields the NaN sentinel — the compaction rule stands
//! down rather than acting on a phantom reading.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: trigger + pulse-width measurement via hw_init.
//! On host/test: reads the echo width (µs) from a static atomic; 0 = timeout.

use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

static SIM_ECHO_US: AtomicU32 = AtomicU32::new(2_915); // ≈ 50 cm

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_echo_us(us: u32) {
    SIM_ECHO_US.store(us, Ordering::Relaxed);
}

/// Speed of sound at ~20 °C, cm per µs, halved for the round trip.
const CM_PER_US_ROUND_TRIP: f32 = 0.0343 / 2.0;

pub struct FillLevelSensor {
    _trig_gpio: i32,
    _echo_gpio: i32,
}

impl FillLevelSensor {
    pub fn new(trig_gpio: i32, echo_gpio: i32) -> Self {
        Self {
            _trig_gpio: trig_gpio,
            _echo_gpio: echo_gpio,
        }
    }

    /// Distance to the pile surface in cm, or NaN on echo timeout.
    pub fn read_cm(&mut self) -> f32 {
        match self.echo_us() {
            Some(us) => us as f32 * CM_PER_US_ROUND_TRIP,
            None => f32::NAN,
        }
    }

    #[cfg(target_os = "espidf")]
    fn echo_us(&self) -> Option<u32> {
        hw_init::ultrasonic_echo_us(self._trig_gpio, self._echo_gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn echo_us(&self) -> Option<u32> {
        match SIM_ECHO_US.load(Ordering::Relaxed) {
            0 => None,
            us => Some(us),
        }
    }
}
