//! TCS34725 colour sensor — compost maturity indicator.
//!
//! Reads raw R/G/B channel counts over I²C.  The channels are reported in
//! telemetry (dark, even colouring correlates with finished compost) but
//! are reserved as far as the decision engine is concerned — no rule uses
//! them in the current ruleset.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: register reads via the hw_init I²C helpers.
//! On host/test: reads packed channels from a static atomic.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU64, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

// Low 48 bits: R | G<<16 | B<<32.  64-bit atomics are host-only, which is
// fine — the target build reads the real bus instead.
#[cfg(not(target_os = "espidf"))]
static SIM_RGB: AtomicU64 = AtomicU64::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_rgb(r: u16, g: u16, b: u16) {
    let packed = u64::from(r) | (u64::from(g) << 16) | (u64::from(b) << 32);
    SIM_RGB.store(packed, Ordering::Relaxed);
}

pub struct ColorSensor {
    _i2c_addr: u8,
}

impl ColorSensor {
    pub fn new(i2c_addr: u8) -> Self {
        Self { _i2c_addr: i2c_addr }
    }

    /// Raw (R, G, B) channel counts.  A failed bus read yields zeros —
    /// acceptable for a reserved, monitoring-only channel.
    pub fn read(&mut self) -> (u16, u16, u16) {
        self.read_rgb()
    }

    #[cfg(target_os = "espidf")]
    fn read_rgb(&self) -> (u16, u16, u16) {
        hw_init::tcs34725_read_rgb(self._i2c_addr).unwrap_or((0, 0, 0))
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_rgb(&self) -> (u16, u16, u16) {
        let packed = SIM_RGB.load(Ordering::Relaxed);
        (
            packed as u16,
            (packed >> 16) as u16,
            (packed >> 32) as u16,
        )
    }
}
