//! Unified error types for the CompostTech firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling
//! uniform.  All variants are `Copy` so they can be cheaply passed through
//! the control loop without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned an unusable value.
    Sensor(SensorFault),
    /// An inbound remote command was rejected.
    Command(CommandError),
    /// A communication subsystem failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// Per-field sensor faults, accumulated in a bitmask per sampling cycle.
///
/// A fault disables every decision rule that depends on the affected field
/// for that cycle only, and is reported through telemetry — the engine keeps
/// running for all other rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SensorFault {
    /// Soil moisture reading missing or out of range.
    SoilMoisture = 0b0000_0001,
    /// DS18B20 compost temperature probe disconnected or faulted.
    CompostTemp  = 0b0000_0010,
    /// DHT11 air temperature / humidity read failed.
    AirClimate   = 0b0000_0100,
    /// MQ-135 gas channel read failed.
    Gas          = 0b0000_1000,
    /// HC-SR04 echo timeout — no fill-level reading.
    FillLevel    = 0b0001_0000,
    /// pH channel read failed.
    Ph           = 0b0010_0000,
}

impl SensorFault {
    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SoilMoisture => write!(f, "soil moisture unavailable"),
            Self::CompostTemp => write!(f, "compost temperature unavailable"),
            Self::AirClimate => write!(f, "air climate unavailable"),
            Self::Gas => write!(f, "gas reading unavailable"),
            Self::FillLevel => write!(f, "fill level unavailable"),
            Self::Ph => write!(f, "pH reading unavailable"),
        }
    }
}

impl From<SensorFault> for Error {
    fn from(e: SensorFault) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Errors from the remote command channel.  Never fatal — the offending
/// command is dropped and the rejection is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Payload did not match any known command string.
    Unrecognized,
    /// Payload was not valid UTF-8 or exceeded the staging buffer.
    Malformed,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized => write!(f, "unrecognized command"),
            Self::Malformed => write!(f, "malformed command payload"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    WifiConnectFailed,
    WifiDisconnected,
    MqttConnectFailed,
    MqttPublishFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WifiConnectFailed => write!(f, "WiFi connect failed"),
            Self::WifiDisconnected => write!(f, "WiFi disconnected"),
            Self::MqttConnectFailed => write!(f, "MQTT connect failed"),
            Self::MqttPublishFailed => write!(f, "MQTT publish failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
