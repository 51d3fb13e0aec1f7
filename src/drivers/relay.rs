//! Relay driver for the pump, fan, and turner motor.
//!
//! Plain on/off GPIO switching — all three actuators sit behind identical
//! active-HIGH relay channels.  This driver is a dumb actuator: when each
//! one runs and for how long is decided entirely by the decision engine
//! and the timed-shutoff bank.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the relay GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Open,
    Closed,
}

pub struct RelayDriver {
    gpio: i32,
    state: RelayState,
}

impl RelayDriver {
    /// New driver with the relay open (actuator off).
    pub fn new(gpio: i32) -> Self {
        let driver = Self {
            gpio,
            state: RelayState::Open,
        };
        hw_init::gpio_write(gpio, false);
        driver
    }

    /// Close (energise) or open the relay.
    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(self.gpio, on);
        self.state = if on { RelayState::Closed } else { RelayState::Open };
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        self.state == RelayState::Closed
    }
}
