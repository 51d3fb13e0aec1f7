//! MQTT transport adapter — telemetry out, remote commands in.
//!
//! Publishes one JSON telemetry record per cycle on [`DATA_TOPIC`] and
//! subscribes to [`CMD_TOPIC`] for remote overrides.  The broker callback
//! runs on the MQTT task, **not** the control loop: received payloads are
//! staged in the command mailbox and announced through the event queue,
//! so actuator state is only ever touched by the loop.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc` MQTT client.
//! - **all other targets**: in-memory stub that counts publishes.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::error::CommsError;

/// Telemetry topic, one JSON record per sampling cycle.
pub const DATA_TOPIC: &str = "compostech/data";
/// Command topic, plain-text payloads (`TURNER_ON`, `PUMP_ON`).
pub const CMD_TOPIC: &str = "compostech/cmd";

pub struct MqttAdapter {
    #[cfg(target_os = "espidf")]
    client: Option<esp_idf_svc::mqtt::client::EspMqttClient<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim_published: usize,
}

impl MqttAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            sim_published: 0,
        }
    }

    /// Connect to the broker and subscribe to the command topic.
    #[cfg(target_os = "espidf")]
    pub fn start(&mut self, broker: &str, port: u16) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};

        use crate::error::CommandError;
        use crate::events::{push_command, push_event, Event};

        let url = format!("mqtt://{broker}:{port}");
        let conf = MqttClientConfiguration {
            client_id: Some("compostech"),
            ..Default::default()
        };

        let mut client = EspMqttClient::new_cb(&url, &conf, |event| match event.payload() {
            EventPayload::Received { topic, data, .. } => {
                if topic != Some(CMD_TOPIC) {
                    return;
                }
                match core::str::from_utf8(data) {
                    Ok(payload) => {
                        if push_command(payload) {
                            push_event(Event::CommandReceived);
                        } else {
                            warn!("MQTT: command mailbox full, payload dropped");
                        }
                    }
                    Err(_) => warn!("MQTT: {}", CommandError::Malformed),
                }
            }
            EventPayload::Connected(_) => info!("MQTT: connected to broker"),
            EventPayload::Disconnected => warn!("MQTT: disconnected from broker"),
            _ => {}
        })
        .map_err(|_| CommsError::MqttConnectFailed)?;

        client
            .subscribe(CMD_TOPIC, QoS::AtLeastOnce)
            .map_err(|_| CommsError::MqttConnectFailed)?;

        info!("MQTT: subscribed to {}", CMD_TOPIC);
        self.client = Some(client);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn start(&mut self, broker: &str, port: u16) -> Result<(), CommsError> {
        info!("MQTT(sim): would connect to {broker}:{port}");
        Ok(())
    }

    /// Publish one telemetry record on the data topic.
    #[cfg(target_os = "espidf")]
    pub fn publish_telemetry(&mut self, json: &str) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::QoS;

        let client = self.client.as_mut().ok_or(CommsError::MqttPublishFailed)?;
        client
            .enqueue(DATA_TOPIC, QoS::AtMostOnce, false, json.as_bytes())
            .map(|_| ())
            .map_err(|_| CommsError::MqttPublishFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn publish_telemetry(&mut self, _json: &str) -> Result<(), CommsError> {
        self.sim_published += 1;
        Ok(())
    }

    /// Number of telemetry records published (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_published(&self) -> usize {
        self.sim_published
    }
}

// ── EventSink: the network half of reporting ──────────────────
//
// Telemetry records go to the broker; everything else is already on the
// serial log via LogEventSink, so non-telemetry events are ignored here.

impl EventSink for MqttAdapter {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::Telemetry(record) = event {
            match record.to_json() {
                Ok(json) => {
                    if let Err(e) = self.publish_telemetry(&json) {
                        warn!("MQTT: telemetry publish failed — {e}");
                    }
                }
                Err(e) => warn!("MQTT: telemetry serialization failed — {e}"),
            }
        }
    }
}
