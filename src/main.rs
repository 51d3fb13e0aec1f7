//! CompostTech Firmware — Main Entry Point
//!
//! Hexagonal architecture with an event-driven control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     LogEventSink     MqttAdapter              │
//! │  (Sensor+Actuator)   (EventSink)      (EventSink + commands)   │
//! │  WifiAdapter         TimeAdapter                               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  DecisionEngine · ActuatorBank · Command channel       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use compostech::adapters::hardware::HardwareAdapter;
use compostech::adapters::log_sink::LogEventSink;
use compostech::adapters::mqtt::MqttAdapter;
use compostech::adapters::time::TimeAdapter;
use compostech::adapters::wifi::WifiAdapter;
use compostech::app::events::AppEvent;
use compostech::app::ports::EventSink;
use compostech::app::service::AppService;
use compostech::config::SystemConfig;
use compostech::drivers::relay::RelayDriver;
use compostech::drivers::watchdog::Watchdog;
use compostech::drivers::hw_init;
use compostech::events::{self, push_event, Event};
use compostech::pins;
use compostech::sensors;

// ── Compile-time deployment settings ──────────────────────────
//
// Network credentials are injected at build time; an empty SSID keeps the
// controller in offline (serial-log-only) mode.

const WIFI_SSID: &str = match option_env!("COMPOSTECH_WIFI_SSID") {
    Some(s) => s,
    None => "",
};
const WIFI_PASS: &str = match option_env!("COMPOSTECH_WIFI_PASS") {
    Some(s) => s,
    None => "",
};
const MQTT_BROKER: &str = match option_env!("COMPOSTECH_MQTT_BROKER") {
    Some(s) => s,
    None => "",
};

/// Inner poll period — commands are handled at this latency while the
/// sampling cycle keeps its own, longer cadence.
const POLL_MS: u64 = 100;

// ── Event fan-out ─────────────────────────────────────────────
//
// The service emits once; the serial log and the broker both listen.

struct DualSink {
    log: LogEventSink,
    mqtt: MqttAdapter,
}

impl EventSink for DualSink {
    fn emit(&mut self, event: &AppEvent) {
        self.log.emit(event);
        self.mqtt.emit(event);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  CompostTech v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new();

    let mut config = SystemConfig::default();
    let _ = config.mqtt_broker.push_str(MQTT_BROKER);

    // ── 3. Construct adapters ─────────────────────────────────
    let sensor_hub = sensors::SensorHub::new(
        sensors::analog::AnalogFrontEnd::new(pins::ADS1115_ADDR),
        sensors::compost_temp::CompostTempSensor::new(pins::DS18B20_GPIO),
        sensors::climate::ClimateSensor::new(pins::DHT11_GPIO),
        sensors::load::LoadCellSensor::new(pins::HX711_DT_GPIO, pins::HX711_SCK_GPIO),
        sensors::fill::FillLevelSensor::new(
            pins::ULTRASONIC_TRIG_GPIO,
            pins::ULTRASONIC_ECHO_GPIO,
        ),
        sensors::color::ColorSensor::new(pins::TCS34725_ADDR),
    );

    let mut hw = HardwareAdapter::new(
        sensor_hub,
        RelayDriver::new(pins::PUMP_GPIO),
        RelayDriver::new(pins::FAN_GPIO),
        RelayDriver::new(pins::TURNER_GPIO),
    );

    let time = TimeAdapter::new();

    // ── 4. Connectivity ───────────────────────────────────────
    let mut wifi = WifiAdapter::new(WIFI_SSID, WIFI_PASS);
    let mut mqtt = MqttAdapter::new();
    if wifi.connect().is_ok() {
        if let Err(e) = mqtt.start(config.mqtt_broker.as_str(), config.mqtt_port) {
            warn!("MQTT start failed ({}), telemetry stays on serial only", e);
        }
    }

    let mut sink = DualSink {
        log: LogEventSink::new(),
        mqtt,
    };

    // ── 5. Construct app service ──────────────────────────────
    let mut app = AppService::new(config.clone());
    app.start(&mut hw, &mut sink);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    let mut since_cycle_ms: u64 = 0;
    let mut since_wifi_poll_ms: u64 = 0;

    loop {
        esp_idf_hal::delay::FreeRtos::delay_ms(POLL_MS as u32);

        since_cycle_ms += POLL_MS;
        if since_cycle_ms >= config.sample_interval_ms {
            since_cycle_ms = 0;
            push_event(Event::ControlTick);
        }

        events::drain_events(|event| match event {
            Event::ControlTick => {
                app.run_cycle(time.uptime_ms(), &mut hw, &mut sink);
            }
            Event::CommandReceived => {
                while let Some(raw) = events::take_command() {
                    app.handle_command(raw.as_str(), time.uptime_ms(), &mut hw, &mut sink);
                }
            }
            Event::WatchdogTick => {}
        });

        // WiFi reconnection poll (exponential backoff), once per second.
        since_wifi_poll_ms += POLL_MS;
        if since_wifi_poll_ms >= 1_000 {
            since_wifi_poll_ms = 0;
            wifi.poll(1);
        }

        // Feed watchdog on every iteration.
        watchdog.feed();
    }
}
