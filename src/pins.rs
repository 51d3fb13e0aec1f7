//! GPIO / peripheral pin assignments for the CompostTech main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Actuator relays (active HIGH)
// ---------------------------------------------------------------------------

/// Water pump relay.
pub const PUMP_GPIO: i32 = 25;
/// Aeration fan relay.
pub const FAN_GPIO: i32 = 26;
/// Compost turner motor relay.
pub const TURNER_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Sensors — 1-Wire / single-pin digital
// ---------------------------------------------------------------------------

/// DS18B20 compost temperature probe (1-Wire bus).
pub const DS18B20_GPIO: i32 = 4;
/// DHT11 air temperature / humidity sensor.
pub const DHT11_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Sensors — HC-SR04 ultrasonic fill level
// ---------------------------------------------------------------------------

/// Trigger output: 10 µs pulse starts a measurement.
pub const ULTRASONIC_TRIG_GPIO: i32 = 18;
/// Echo input: pulse width encodes round-trip time.
pub const ULTRASONIC_ECHO_GPIO: i32 = 19;

// ---------------------------------------------------------------------------
// Sensors — HX711 load cell amplifier
// ---------------------------------------------------------------------------

/// HX711 serial data out.
pub const HX711_DT_GPIO: i32 = 5;
/// HX711 serial clock.
pub const HX711_SCK_GPIO: i32 = 17;

// ---------------------------------------------------------------------------
// I²C bus — ADS1115 analog front end + TCS34725 colour sensor
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;

/// ADS1115 I²C address (ADDR pin to GND).
pub const ADS1115_ADDR: u8 = 0x48;
/// TCS34725 I²C address (fixed).
pub const TCS34725_ADDR: u8 = 0x29;

// ---------------------------------------------------------------------------
// ADS1115 channel map
// ---------------------------------------------------------------------------

/// Capacitive soil-moisture probe.
pub const ADS_CH_MOISTURE: u8 = 0;
/// pH probe (analog board output).
pub const ADS_CH_PH: u8 = 1;
/// MQ-135 gas sensor.
pub const ADS_CH_GAS: u8 = 2;
/// Conductivity (EC) probe.
pub const ADS_CH_EC: u8 = 3;
