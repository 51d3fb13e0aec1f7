//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the decision engine and the actuator bank and runs
//! the acquire → decide → apply → report cycle.  All I/O flows through
//! port traits injected at call sites, making the entire service testable
//! with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                 │         AppService          │
//! ActuatorPort ◀──│  DecisionEngine · Actuators │
//!                 └────────────────────────────┘
//! ```
//!
//! The service is the single logical owner of the [`ActuatorBank`]: both
//! the per-cycle engine run and remote command handling go through `&mut
//! self` on the control loop, so engine evaluation and command processing
//! can never interleave partial writes to the same actuator.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::engine::actuators::{Actuator, ActuatorBank, ActuatorState, Transition};
use crate::engine::DecisionEngine;
use crate::telemetry::TelemetryRecord;

use super::commands::RemoteCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    engine: DecisionEngine,
    bank: ActuatorBank,
    config: SystemConfig,
    cycle_count: u64,
}

impl AppService {
    /// Construct the service from configuration.  All actuators start off.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            engine: DecisionEngine::new(&config),
            bank: ActuatorBank::new(),
            config,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce startup and force every relay into the known-off state.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        sink.emit(&AppEvent::Started);
        info!("AppService started, all actuators off");
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full sampling cycle: acquire → decide → apply → report.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn run_cycle(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        self.cycle_count += 1;

        // 1. Acquire a fully-populated snapshot via SensorPort
        let snapshot = hw.read_all();

        // 2. Decide — tick retirements + rule evaluation + merge
        let decision = self.engine.run(&snapshot, &mut self.bank, now_ms);

        // 3. Surface per-field sensor faults (never silently dropped)
        if decision.sensor_faults != 0 {
            warn!(
                "sensor faults this cycle: 0b{:08b}, rules skipped: 0b{:04b}",
                decision.sensor_faults, decision.rules_skipped
            );
            sink.emit(&AppEvent::SensorFault(decision.sensor_faults));
        }

        // 4. Apply transitions to hardware
        for t in &decision.transitions {
            self.drive(hw, sink, *t);
        }

        // 5. Report
        let record = TelemetryRecord::build(
            now_ms,
            self.cycle_count,
            &snapshot,
            &self.bank,
            &decision,
        );
        sink.emit(&AppEvent::Telemetry(record));
    }

    // ── Command handling ──────────────────────────────────────

    /// Process one remote command payload (from the MQTT mailbox).
    ///
    /// Known commands schedule actuators through the same deadline-merge
    /// policy the engine uses; unknown payloads are rejected and reported.
    pub fn handle_command(
        &mut self,
        raw: &str,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let cmd = match RemoteCommand::parse(raw) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!("remote command rejected ({e}): {raw:?}");
                sink.emit(&AppEvent::CommandRejected(e));
                return;
            }
        };

        info!("remote command: {}", cmd.name());
        match cmd {
            RemoteCommand::TurnerOn => {
                let d = self.config.remote_turn_duration_ms;
                if let Some(t) = self.bank.schedule_on(Actuator::Turner, now_ms, d) {
                    self.drive(hw, sink, t);
                }
            }
            RemoteCommand::PumpOn => {
                let d = self.config.irrigation_duration_ms;
                for actuator in [Actuator::Pump, Actuator::Fan] {
                    if let Some(t) = self.bank.schedule_on(actuator, now_ms, d) {
                        self.drive(hw, sink, t);
                    }
                }
            }
        }
        sink.emit(&AppEvent::CommandApplied(cmd));
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current state of one actuator.
    pub fn actuator_state(&self, actuator: Actuator) -> ActuatorState {
        self.bank.state(actuator)
    }

    /// Total sampling cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> SystemConfig {
        self.config.clone()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Push one transition out to the relay and the event sink.
    fn drive(&self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink, t: Transition) {
        hw.set_actuator(t.actuator, t.on);
        sink.emit(&AppEvent::ActuatorChanged(t));
    }
}
