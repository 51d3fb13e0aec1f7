//! WiFi station-mode adapter.
//!
//! Thin connectivity collaborator: the core never sees it beyond "is the
//! reporting channel up".  Holds credentials, connects once at boot, and
//! retries with exponential backoff (2 s → 4 s → 8 s … capped at 60 s)
//! when the link drops.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: raw ESP-IDF sys calls (STA mode).
//! - **all other targets**: simulation stub that always connects.

use core::fmt;

use log::{error, info, warn};

use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connected,
    Reconnecting { attempt: u32 },
}

impl fmt::Display for WifiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connected => write!(f, "connected"),
            Self::Reconnecting { attempt } => write!(f, "reconnecting (attempt {attempt})"),
        }
    }
}

const MAX_BACKOFF_SECS: u32 = 60;

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    backoff_secs: u32,
    /// Seconds of backoff already waited (advanced by `poll`).
    backoff_elapsed_secs: u32,
}

impl WifiAdapter {
    pub fn new(ssid: &str, password: &str) -> Self {
        let mut adapter = Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_secs: 2,
            backoff_elapsed_secs: 0,
        };
        let _ = adapter.ssid.push_str(ssid);
        let _ = adapter.password.push_str(password);
        adapter
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }

    /// Initial connection attempt at boot.
    pub fn connect(&mut self) -> Result<(), CommsError> {
        if self.ssid.is_empty() {
            warn!("WiFi: no credentials configured, staying offline");
            return Err(CommsError::WifiConnectFailed);
        }
        info!("WiFi: connecting to '{}'", self.ssid);
        match self.platform_connect() {
            Ok(()) => {
                self.state = WifiState::Connected;
                self.backoff_secs = 2;
                info!("WiFi: connected");
                Ok(())
            }
            Err(e) => {
                error!("WiFi: connection failed — {}", e);
                self.state = WifiState::Reconnecting { attempt: 0 };
                Err(e)
            }
        }
    }

    /// Advance the reconnect state machine.  Call once per control-loop
    /// iteration with the loop period in seconds.
    pub fn poll(&mut self, elapsed_secs: u32) {
        match self.state {
            WifiState::Reconnecting { attempt } => {
                self.backoff_elapsed_secs += elapsed_secs;
                if self.backoff_elapsed_secs < self.backoff_secs {
                    return;
                }
                self.backoff_elapsed_secs = 0;
                info!("WiFi: reconnect attempt {}", attempt);
                match self.platform_connect() {
                    Ok(()) => {
                        self.state = WifiState::Connected;
                        self.backoff_secs = 2;
                        info!("WiFi: reconnected");
                    }
                    Err(_) => {
                        self.backoff_secs = (self.backoff_secs * 2).min(MAX_BACKOFF_SECS);
                        self.state = WifiState::Reconnecting { attempt: attempt + 1 };
                    }
                }
            }
            WifiState::Connected => {
                if !self.platform_is_connected() {
                    warn!("WiFi: connection lost, entering reconnect");
                    self.state = WifiState::Reconnecting { attempt: 0 };
                    self.backoff_elapsed_secs = 0;
                }
            }
            WifiState::Disconnected => {}
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::sys::*;

        // One-time netif/event-loop/driver bring-up; subsequent calls only
        // re-issue esp_wifi_connect().
        static mut WIFI_STARTED: bool = false;

        unsafe {
            if !WIFI_STARTED {
                esp_netif_init();
                esp_event_loop_create_default();
                esp_netif_create_default_wifi_sta();

                let init_cfg = wifi_init_config_t::default();
                if esp_wifi_init(&init_cfg) != ESP_OK {
                    return Err(CommsError::WifiConnectFailed);
                }

                let mut cfg: wifi_config_t = core::mem::zeroed();
                let ssid = self.ssid.as_bytes();
                let pass = self.password.as_bytes();
                cfg.sta.ssid[..ssid.len()].copy_from_slice(ssid);
                cfg.sta.password[..pass.len()].copy_from_slice(pass);

                if esp_wifi_set_mode(wifi_mode_t_WIFI_MODE_STA) != ESP_OK
                    || esp_wifi_set_config(wifi_interface_t_WIFI_IF_STA, &mut cfg) != ESP_OK
                    || esp_wifi_start() != ESP_OK
                {
                    return Err(CommsError::WifiConnectFailed);
                }
                WIFI_STARTED = true;
            }

            if esp_wifi_connect() != ESP_OK {
                return Err(CommsError::WifiConnectFailed);
            }
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        info!("WiFi(sim): connected to '{}'", self.ssid);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        use esp_idf_svc::sys::*;
        let mut ap_info: wifi_ap_record_t = unsafe { core::mem::zeroed() };
        unsafe { esp_wifi_sta_get_ap_info(&mut ap_info) == ESP_OK }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }
}
