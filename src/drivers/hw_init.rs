//! One-shot hardware peripheral initialization and raw bus helpers.
//!
//! Configures GPIO directions and the I²C master, and provides the
//! low-level read/write shims the sensor and relay drivers call.  Uses raw
//! ESP-IDF sys calls; invoked once from `main()` before the control loop
//! starts.  On non-espidf targets every shim is a no-op fallback — the
//! drivers use their simulation atomics instead.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    I2cInitFailed(i32),
    I2cProbeFailed(u8),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::I2cInitFailed(rc) => write!(f, "I2C driver install failed (rc={})", rc),
            Self::I2cProbeFailed(addr) => write!(f, "I2C device 0x{:02x} not responding", addr),
        }
    }
}

// ── Init ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio()?;
        init_i2c()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio() -> Result<(), HwInitError> {
    let outputs = [
        pins::PUMP_GPIO,
        pins::FAN_GPIO,
        pins::TURNER_GPIO,
        pins::ULTRASONIC_TRIG_GPIO,
        pins::HX711_SCK_GPIO,
    ];
    for pin in outputs {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        // Relays are active HIGH — everything off at boot.
        let _ = unsafe { gpio_set_level(pin, 0) };
    }

    let inputs = [pins::ULTRASONIC_ECHO_GPIO, pins::HX711_DT_GPIO];
    for pin in inputs {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO configured (3 relays, trig/echo, HX711)");
    Ok(())
}

#[cfg(target_os = "espidf")]
const I2C_PORT: i32 = 0;
#[cfg(target_os = "espidf")]
const I2C_TIMEOUT_TICKS: u32 = 100;

#[cfg(target_os = "espidf")]
unsafe fn init_i2c() -> Result<(), HwInitError> {
    let mut cfg: i2c_config_t = unsafe { core::mem::zeroed() };
    cfg.mode = i2c_mode_t_I2C_MODE_MASTER;
    cfg.sda_io_num = pins::I2C_SDA_GPIO;
    cfg.scl_io_num = pins::I2C_SCL_GPIO;
    cfg.sda_pullup_en = true;
    cfg.scl_pullup_en = true;
    cfg.__bindgen_anon_1.master.clk_speed = 100_000;

    let ret = unsafe { i2c_param_config(I2C_PORT, &cfg) };
    if ret != ESP_OK {
        return Err(HwInitError::I2cInitFailed(ret));
    }
    let ret = unsafe { i2c_driver_install(I2C_PORT, i2c_mode_t_I2C_MODE_MASTER, 0, 0, 0) };
    if ret != ESP_OK {
        return Err(HwInitError::I2cInitFailed(ret));
    }

    // TCS34725: power on + enable RGBC (ENABLE register 0x00, command bit 0x80).
    if i2c_write(pins::TCS34725_ADDR, &[0x80, 0x03]).is_err() {
        return Err(HwInitError::I2cProbeFailed(pins::TCS34725_ADDR));
    }

    info!("hw_init: I2C master up (ADS1115 + TCS34725)");
    Ok(())
}

// ── GPIO shims ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    unsafe {
        let _ = gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    unsafe { gpio_get_level(pin) != 0 }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

#[cfg(target_os = "espidf")]
fn delay_us(us: u32) {
    unsafe { esp_rom_delay_us(us) }
}

#[cfg(target_os = "espidf")]
fn now_us() -> i64 {
    unsafe { esp_timer_get_time() }
}

// ── I²C shims ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn i2c_write(addr: u8, data: &[u8]) -> Result<(), i32> {
    let ret = unsafe {
        i2c_master_write_to_device(I2C_PORT, addr, data.as_ptr(), data.len(), I2C_TIMEOUT_TICKS)
    };
    if ret == ESP_OK { Ok(()) } else { Err(ret) }
}

#[cfg(target_os = "espidf")]
fn i2c_write_read(addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), i32> {
    let ret = unsafe {
        i2c_master_write_read_device(
            I2C_PORT,
            addr,
            &reg,
            1,
            buf.as_mut_ptr(),
            buf.len(),
            I2C_TIMEOUT_TICKS,
        )
    };
    if ret == ESP_OK { Ok(()) } else { Err(ret) }
}

// ── ADS1115 ───────────────────────────────────────────────────

/// Single-ended conversion on one ADS1115 channel.
///
/// Config: single-shot, MUX = AINx vs GND, gain 1 (±4.096 V), 128 SPS.
#[cfg(target_os = "espidf")]
pub fn ads1115_read(channel: u8) -> Option<i16> {
    let mux = 0b100 + u16::from(channel & 0x03);
    let config: u16 = 0x8000          // start single conversion
        | (mux << 12)
        | (0b001 << 9)                // PGA ±4.096 V
        | (1 << 8)                    // single-shot mode
        | (0b100 << 5)                // 128 SPS
        | 0x0003;                     // comparator disabled
    let cfg_bytes = [0x01, (config >> 8) as u8, config as u8];
    if i2c_write(pins::ADS1115_ADDR, &cfg_bytes).is_err() {
        return None;
    }

    // 128 SPS → one conversion takes ~8 ms.
    delay_us(9_000);

    let mut out = [0u8; 2];
    if i2c_write_read(pins::ADS1115_ADDR, 0x00, &mut out).is_err() {
        return None;
    }
    Some(i16::from_be_bytes(out))
}

#[cfg(not(target_os = "espidf"))]
pub fn ads1115_read(_channel: u8) -> Option<i16> {
    None
}

// ── TCS34725 ──────────────────────────────────────────────────

/// Raw R/G/B channel counts (command bit 0x80, auto-increment 0x20).
#[cfg(target_os = "espidf")]
pub fn tcs34725_read_rgb(addr: u8) -> Option<(u16, u16, u16)> {
    // RDATAL..BDATAH = 0x16..0x1B, read in one burst.
    let mut buf = [0u8; 6];
    if i2c_write_read(addr, 0x80 | 0x20 | 0x16, &mut buf).is_err() {
        return None;
    }
    Some((
        u16::from_le_bytes([buf[0], buf[1]]),
        u16::from_le_bytes([buf[2], buf[3]]),
        u16::from_le_bytes([buf[4], buf[5]]),
    ))
}

#[cfg(not(target_os = "espidf"))]
pub fn tcs34725_read_rgb(_addr: u8) -> Option<(u16, u16, u16)> {
    None
}

// ── DS18B20 (1-Wire, bit-banged) ──────────────────────────────

#[cfg(target_os = "espidf")]
fn onewire_reset(pin: i32) -> bool {
    unsafe {
        let _ = gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT_OD);
        let _ = gpio_set_level(pin, 0);
        delay_us(480);
        let _ = gpio_set_level(pin, 1);
        delay_us(70);
        let presence = gpio_get_level(pin) == 0;
        delay_us(410);
        presence
    }
}

#[cfg(target_os = "espidf")]
fn onewire_write_byte(pin: i32, mut byte: u8) {
    unsafe {
        for _ in 0..8 {
            let bit = byte & 1;
            let _ = gpio_set_level(pin, 0);
            if bit != 0 {
                delay_us(6);
                let _ = gpio_set_level(pin, 1);
                delay_us(64);
            } else {
                delay_us(60);
                let _ = gpio_set_level(pin, 1);
                delay_us(10);
            }
            byte >>= 1;
        }
    }
}

#[cfg(target_os = "espidf")]
fn onewire_read_byte(pin: i32) -> u8 {
    let mut byte = 0u8;
    unsafe {
        for i in 0..8 {
            let _ = gpio_set_level(pin, 0);
            delay_us(6);
            let _ = gpio_set_level(pin, 1);
            delay_us(9);
            if gpio_get_level(pin) != 0 {
                byte |= 1 << i;
            }
            delay_us(55);
        }
    }
    byte
}

/// One full DS18B20 conversion, result in centi-°C.
///
/// Blocks for the 750 ms conversion — acceptable inside a 5 s sampling
/// cycle.  `None` when no probe answers the bus reset or the scratchpad
/// reads as the power-on value.
#[cfg(target_os = "espidf")]
pub fn ds18b20_read_centi(pin: i32) -> Option<i32> {
    if !onewire_reset(pin) {
        return None;
    }
    onewire_write_byte(pin, 0xCC); // skip ROM
    onewire_write_byte(pin, 0x44); // convert T
    delay_us(750_000); // 12-bit conversion time

    if !onewire_reset(pin) {
        return None;
    }
    onewire_write_byte(pin, 0xCC);
    onewire_write_byte(pin, 0xBE); // read scratchpad
    let lsb = onewire_read_byte(pin);
    let msb = onewire_read_byte(pin);

    let raw = i16::from_le_bytes([lsb, msb]);
    if raw == 0x0550 {
        // Power-on reset value (85.00 °C) — conversion never ran.
        return None;
    }
    // 12-bit resolution: 1/16 °C per count.
    Some(i32::from(raw) * 100 / 16)
}

#[cfg(not(target_os = "espidf"))]
pub fn ds18b20_read_centi(_pin: i32) -> Option<i32> {
    None
}

// ── DHT11 (single-wire, bit-banged) ───────────────────────────

/// One DHT11 transaction: (air temp °C, relative humidity %).
/// `None` on a missing response or checksum mismatch.
#[cfg(target_os = "espidf")]
pub fn dht11_read(pin: i32) -> Option<(f32, f32)> {
    unsafe {
        // Host start signal: ≥18 ms low, then release.
        let _ = gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT_OD);
        let _ = gpio_set_level(pin, 0);
        delay_us(18_000);
        let _ = gpio_set_level(pin, 1);
        delay_us(30);

        // Sensor response: 80 µs low + 80 µs high.
        if !wait_level(pin, false, 100) || !wait_level(pin, true, 100) || !wait_level(pin, false, 100)
        {
            return None;
        }

        // 40 data bits: 50 µs low, then 26–28 µs high = 0, ~70 µs high = 1.
        let mut bytes = [0u8; 5];
        for bit in 0..40 {
            if !wait_level(pin, true, 80) {
                return None;
            }
            let start = now_us();
            if !wait_level(pin, false, 100) {
                return None;
            }
            if now_us() - start > 40 {
                bytes[bit / 8] |= 1 << (7 - bit % 8);
            }
        }

        let sum = bytes[0]
            .wrapping_add(bytes[1])
            .wrapping_add(bytes[2])
            .wrapping_add(bytes[3]);
        if sum != bytes[4] {
            return None;
        }
        Some((f32::from(bytes[2]), f32::from(bytes[0])))
    }
}

/// Busy-wait until the pin reaches `level`, bounded by `timeout_us`.
#[cfg(target_os = "espidf")]
fn wait_level(pin: i32, level: bool, timeout_us: i64) -> bool {
    let start = now_us();
    while gpio_read(pin) != level {
        if now_us() - start > timeout_us {
            return false;
        }
    }
    true
}

#[cfg(not(target_os = "espidf"))]
pub fn dht11_read(_pin: i32) -> Option<(f32, f32)> {
    None
}

// ── HX711 (serial, bit-banged) ────────────────────────────────

/// Clock out one 24-bit sample (channel A, gain 128).
#[cfg(target_os = "espidf")]
pub fn hx711_read_raw(dt_pin: i32, sck_pin: i32) -> i32 {
    // DT goes low when a conversion is ready.
    let start = now_us();
    while gpio_read(dt_pin) {
        if now_us() - start > 100_000 {
            return 0; // Chip not responding — report zero counts.
        }
    }

    let mut value: u32 = 0;
    for _ in 0..24 {
        gpio_write(sck_pin, true);
        delay_us(1);
        value = (value << 1) | u32::from(gpio_read(dt_pin));
        gpio_write(sck_pin, false);
        delay_us(1);
    }
    // One extra pulse selects channel A / gain 128 for the next sample.
    gpio_write(sck_pin, true);
    delay_us(1);
    gpio_write(sck_pin, false);

    // Sign-extend the 24-bit two's-complement result.
    if value & 0x0080_0000 != 0 {
        (value | 0xFF00_0000) as i32
    } else {
        value as i32
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn hx711_read_raw(_dt_pin: i32, _sck_pin: i32) -> i32 {
    0
}

// ── HC-SR04 (trigger + pulse width) ───────────────────────────

/// Fire one trigger pulse and measure the echo width in µs.
/// `None` when no echo arrives within 30 ms (open enclosure, no surface).
#[cfg(target_os = "espidf")]
pub fn ultrasonic_echo_us(trig_pin: i32, echo_pin: i32) -> Option<u32> {
    gpio_write(trig_pin, false);
    delay_us(2);
    gpio_write(trig_pin, true);
    delay_us(10);
    gpio_write(trig_pin, false);

    if !wait_level(echo_pin, true, 30_000) {
        return None;
    }
    let start = now_us();
    if !wait_level(echo_pin, false, 30_000) {
        return None;
    }
    Some((now_us() - start) as u32)
}

#[cfg(not(target_os = "espidf"))]
pub fn ultrasonic_echo_us(_trig_pin: i32, _echo_pin: i32) -> Option<u32> {
    None
}
