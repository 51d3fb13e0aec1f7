//! DS18B20 compost core temperature probe (1-Wire).
//!
//! The probe sits in the middle of the pile and is the input to both the
//! critical-temperature and anaerobic-risk rules.  A disconnected probe
//! answers with the bus power-on value, which the shim reports as a read
//! failure; the driver converts that to the NaN fault sentinel so the
//! dependent rules stand down for the cycle.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-banged 1-Wire transaction via hw_init.
//! On host/test: reads centi-degrees from a static atomic for injection.

use core::sync::atomic::{AtomicI32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// Simulated reading in centi-degrees; `SIM_FAULT` marks a probe fault.
static SIM_TEMP_CENTI: AtomicI32 = AtomicI32::new(2_500);

pub const SIM_FAULT: i32 = i32::MIN;

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_centi(centi: i32) {
    SIM_TEMP_CENTI.store(centi, Ordering::Relaxed);
}

pub struct CompostTempSensor {
    _gpio: i32,
}

impl CompostTempSensor {
    pub fn new(gpio: i32) -> Self {
        Self { _gpio: gpio }
    }

    /// Latest probe temperature in °C, or NaN when the probe faulted.
    pub fn read(&mut self) -> f32 {
        match self.read_centi() {
            Some(centi) => centi as f32 / 100.0,
            None => f32::NAN,
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_centi(&self) -> Option<i32> {
        hw_init::ds18b20_read_centi(self._gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_centi(&self) -> Option<i32> {
        let centi = SIM_TEMP_CENTI.load(Ordering::Relaxed);
        if centi == SIM_FAULT {
            None
        } else {
            Some(centi)
        }
    }
}
