//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the CompostTech controller:
//! per-cycle orchestration of the decision engine, the timed actuator bank,
//! and the remote command channel.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
