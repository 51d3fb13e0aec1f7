//! Automation decision engine.
//!
//! Runs once per sampling cycle, after expired actuators have been retired.
//! Each rule is a pure check over the latest [`SensorSnapshot`] and the
//! post-retirement [`ActuatorBank`]; rules emit *intents* which a merge
//! step resolves per actuator, so no rule depends on another rule's
//! side effects within the cycle.
//!
//! ```text
//!   SensorSnapshot ─┐
//!                   ├─▶ rules ─▶ intents ─▶ merge ─▶ ActuatorBank ─▶ Transitions
//!   ActuatorBank ───┘
//! ```
//!
//! ## Merge policy (per actuator)
//!
//! 1. A hold-open request dominates everything.
//! 2. Otherwise a release (of an existing hold-open only) applies first,
//!    then timed requests merge longest-wins via
//!    [`ActuatorBank::schedule_on`].
//!
//! The engine is a total function: a rule whose inputs carry the NaN fault
//! sentinel is skipped for the cycle and the skip is reported through
//! [`CycleDecision`] — unreliable data never actuates anything, and the
//! condition is never silently dropped.

pub mod actuators;
pub mod snapshot;

use actuators::{Actuator, ActuatorBank, Transitions};
use snapshot::SensorSnapshot;

use crate::config::SystemConfig;

// ---------------------------------------------------------------------------
// Rule identity
// ---------------------------------------------------------------------------

/// The four automation rules, as bits of the `rules_skipped` mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Rule {
    /// Low soil moisture → pump + fan for the irrigation window.
    Moisture      = 0b0000_0001,
    /// Compost above the critical temperature → fan held open.
    CriticalTemp  = 0b0000_0010,
    /// Falling temperature band with high gas → turner.
    AnaerobicRisk = 0b0000_0100,
    /// Pile surface too close to the sensor → turner.
    Compaction    = 0b0000_1000,
}

impl Rule {
    /// Return the bitmask for this rule.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

// ---------------------------------------------------------------------------
// Cycle output
// ---------------------------------------------------------------------------

/// Everything one engine run produced: the applied transitions (including
/// tick retirements), plus what was skipped and why.
#[derive(Debug, Clone, Default)]
pub struct CycleDecision {
    /// Actuator state changes applied this cycle, in application order.
    pub transitions: Transitions,
    /// [`crate::error::SensorFault`] bitmask derived from the snapshot.
    pub sensor_faults: u8,
    /// [`Rule`] bitmask of rules disabled by a sensor fault this cycle.
    pub rules_skipped: u8,
}

impl CycleDecision {
    /// True if nothing changed and nothing was skipped.
    pub fn is_quiet(&self) -> bool {
        self.transitions.is_empty() && self.sensor_faults == 0
    }
}

// ---------------------------------------------------------------------------
// Intent accumulator
// ---------------------------------------------------------------------------

/// Per-actuator accumulator the rules write into before the merge step.
#[derive(Debug, Clone, Copy, Default)]
struct Pending {
    /// Hold the actuator open indefinitely.
    hold: bool,
    /// Clear an existing hold-open.
    release: bool,
    /// Longest timed request so far (ms).
    duration_ms: Option<u64>,
}

impl Pending {
    fn request(&mut self, duration_ms: u64) {
        self.duration_ms = Some(match self.duration_ms {
            Some(existing) => existing.max(duration_ms),
            None => duration_ms,
        });
    }
}

// ---------------------------------------------------------------------------
// DecisionEngine
// ---------------------------------------------------------------------------

/// Converts raw multi-sensor readings into actuator state transitions.
pub struct DecisionEngine {
    moisture_threshold_pct: f32,
    critical_temp_c: f32,
    anaerobic_temp_low_c: f32,
    anaerobic_temp_high_c: f32,
    gas_alert_raw: f32,
    compaction_distance_cm: f32,
    irrigation_duration_ms: u64,
    anaerobic_turn_duration_ms: u64,
    compaction_turn_duration_ms: u64,
}

impl DecisionEngine {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            moisture_threshold_pct: config.moisture_threshold_pct,
            critical_temp_c: config.critical_temp_c,
            anaerobic_temp_low_c: config.anaerobic_temp_low_c,
            anaerobic_temp_high_c: config.anaerobic_temp_high_c,
            gas_alert_raw: config.gas_alert_raw,
            compaction_distance_cm: config.compaction_distance_cm,
            irrigation_duration_ms: config.irrigation_duration_ms,
            anaerobic_turn_duration_ms: config.anaerobic_turn_duration_ms,
            compaction_turn_duration_ms: config.compaction_turn_duration_ms,
        }
    }

    /// Run one full decision cycle.
    ///
    /// Retires expired actuators first, then evaluates every rule against
    /// the snapshot and the retired state, merges the intents, and applies
    /// them to `bank`.  Total over all inputs — an all-NaN snapshot yields
    /// no actuation.
    pub fn run(
        &self,
        snap: &SensorSnapshot,
        bank: &mut ActuatorBank,
        now_ms: u64,
    ) -> CycleDecision {
        let mut transitions = bank.tick(now_ms);
        let mut pending = [Pending::default(); Actuator::COUNT];
        let mut skipped = 0u8;

        self.moisture_rule(snap, bank, &mut pending, &mut skipped);
        self.critical_temp_rule(snap, bank, &mut pending, &mut skipped);
        self.anaerobic_rule(snap, bank, &mut pending, &mut skipped);
        self.compaction_rule(snap, bank, &mut pending, &mut skipped);

        self.apply(bank, &pending, now_ms, &mut transitions);

        CycleDecision {
            transitions,
            sensor_faults: snap.fault_mask(),
            rules_skipped: skipped,
        }
    }

    // ── Rules ─────────────────────────────────────────────────

    /// Rule 1: dry soil triggers an irrigation window on pump and fan.
    /// No action while the pump is already running — re-arming is left to
    /// the deadline merge when the window has expired.
    fn moisture_rule(
        &self,
        snap: &SensorSnapshot,
        bank: &ActuatorBank,
        pending: &mut [Pending; Actuator::COUNT],
        skipped: &mut u8,
    ) {
        if !snap.soil_moisture_pct.is_finite() {
            *skipped |= Rule::Moisture.mask();
            return;
        }
        if snap.soil_moisture_pct < self.moisture_threshold_pct && !bank.is_on(Actuator::Pump) {
            pending[Actuator::Pump.index()].request(self.irrigation_duration_ms);
            pending[Actuator::Fan.index()].request(self.irrigation_duration_ms);
        }
    }

    /// Rule 2: critical temperature forces the fan into hold-open; once the
    /// temperature is back at or below the threshold the hold is released
    /// on that same cycle (single-cycle clearing, no hysteresis band).
    fn critical_temp_rule(
        &self,
        snap: &SensorSnapshot,
        bank: &ActuatorBank,
        pending: &mut [Pending; Actuator::COUNT],
        skipped: &mut u8,
    ) {
        if !snap.compost_temp_c.is_finite() {
            *skipped |= Rule::CriticalTemp.mask();
            return;
        }
        if snap.compost_temp_c > self.critical_temp_c {
            pending[Actuator::Fan.index()].hold = true;
        } else if bank.state(Actuator::Fan).is_held_open() {
            pending[Actuator::Fan.index()].release = true;
        }
    }

    /// Rule 3: falling-temperature band plus high gas reads as anaerobic
    /// pockets forming — turn the pile.
    fn anaerobic_rule(
        &self,
        snap: &SensorSnapshot,
        bank: &ActuatorBank,
        pending: &mut [Pending; Actuator::COUNT],
        skipped: &mut u8,
    ) {
        if !snap.compost_temp_c.is_finite() || !snap.gas_raw.is_finite() {
            *skipped |= Rule::AnaerobicRisk.mask();
            return;
        }
        let in_band = snap.compost_temp_c > self.anaerobic_temp_low_c
            && snap.compost_temp_c < self.anaerobic_temp_high_c;
        if in_band && snap.gas_raw > self.gas_alert_raw && !bank.is_on(Actuator::Turner) {
            pending[Actuator::Turner.index()].request(self.anaerobic_turn_duration_ms);
        }
    }

    /// Rule 4: pile surface too close to the sensor means the enclosure is
    /// full or the material has compacted — turn the pile.
    fn compaction_rule(
        &self,
        snap: &SensorSnapshot,
        bank: &ActuatorBank,
        pending: &mut [Pending; Actuator::COUNT],
        skipped: &mut u8,
    ) {
        if !snap.fill_distance_cm.is_finite() {
            *skipped |= Rule::Compaction.mask();
            return;
        }
        if snap.fill_distance_cm < self.compaction_distance_cm && !bank.is_on(Actuator::Turner) {
            pending[Actuator::Turner.index()].request(self.compaction_turn_duration_ms);
        }
    }

    // ── Merge ─────────────────────────────────────────────────

    /// Resolve accumulated intents per actuator and apply them to the bank.
    fn apply(
        &self,
        bank: &mut ActuatorBank,
        pending: &[Pending; Actuator::COUNT],
        now_ms: u64,
        transitions: &mut Transitions,
    ) {
        for actuator in Actuator::ALL {
            let p = pending[actuator.index()];
            if p.hold {
                if let Some(t) = bank.hold_open(actuator) {
                    let _ = transitions.push(t);
                }
                continue;
            }
            if p.release {
                if let Some(t) = bank.release_hold(actuator) {
                    let _ = transitions.push(t);
                }
            }
            if let Some(duration_ms) = p.duration_ms {
                if let Some(t) = bank.schedule_on(actuator, now_ms, duration_ms) {
                    let _ = transitions.push(t);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal() -> SensorSnapshot {
        SensorSnapshot {
            soil_moisture_pct: 60.0,
            compost_temp_c: 55.0,
            air_temp_c: 22.0,
            air_humidity_pct: 50.0,
            ph: 7.0,
            gas_raw: 500.0,
            conductivity_raw: 1_200.0,
            load_mass_g: 4_000,
            fill_distance_cm: 50.0,
            color_rgb: (120, 90, 60),
        }
    }

    fn engine() -> DecisionEngine {
        DecisionEngine::new(&SystemConfig::default())
    }

    #[test]
    fn nominal_snapshot_is_quiet() {
        let mut bank = ActuatorBank::new();
        let decision = engine().run(&nominal(), &mut bank, 0);
        assert!(decision.is_quiet());
        for a in Actuator::ALL {
            assert!(!bank.is_on(a));
        }
    }

    #[test]
    fn moisture_at_threshold_does_not_fire() {
        let mut bank = ActuatorBank::new();
        let snap = SensorSnapshot {
            soil_moisture_pct: 45.0,
            ..nominal()
        };
        let decision = engine().run(&snap, &mut bank, 0);
        assert!(decision.transitions.is_empty());
        assert!(!bank.is_on(Actuator::Pump));
    }

    #[test]
    fn moisture_rule_skips_while_pump_running() {
        let mut bank = ActuatorBank::new();
        bank.schedule_on(Actuator::Pump, 0, 30_000);
        let snap = SensorSnapshot {
            soil_moisture_pct: 20.0,
            ..nominal()
        };
        let decision = engine().run(&snap, &mut bank, 1_000);
        // Pump already committed — no re-arm, fan untouched.
        assert!(decision.transitions.is_empty());
        assert_eq!(bank.state(Actuator::Pump).off_deadline_ms, Some(30_000));
    }

    #[test]
    fn critical_temp_holds_fan_over_pending_shutoff() {
        let mut bank = ActuatorBank::new();
        bank.schedule_on(Actuator::Fan, 0, 30_000);
        let snap = SensorSnapshot {
            compost_temp_c: 70.0,
            ..nominal()
        };
        engine().run(&snap, &mut bank, 1_000);
        assert!(bank.state(Actuator::Fan).is_held_open());
    }

    #[test]
    fn hold_released_on_single_cooled_cycle() {
        let mut bank = ActuatorBank::new();
        bank.hold_open(Actuator::Fan);
        let snap = SensorSnapshot {
            compost_temp_c: 65.0,
            ..nominal()
        };
        let decision = engine().run(&snap, &mut bank, 0);
        assert!(!bank.is_on(Actuator::Fan));
        assert_eq!(decision.transitions.len(), 1);
    }

    #[test]
    fn release_yields_to_concurrent_irrigation() {
        // Fan held from a hot cycle; temperature drops while the soil is
        // dry.  The hold clears but irrigation immediately claims the fan
        // for a timed window.
        let mut bank = ActuatorBank::new();
        bank.hold_open(Actuator::Fan);
        let snap = SensorSnapshot {
            soil_moisture_pct: 30.0,
            compost_temp_c: 60.0,
            ..nominal()
        };
        engine().run(&snap, &mut bank, 10_000);
        let fan = bank.state(Actuator::Fan);
        assert!(fan.is_on);
        assert_eq!(fan.off_deadline_ms, Some(40_000));
    }

    #[test]
    fn turner_rules_merge_longest_wins() {
        let mut bank = ActuatorBank::new();
        let snap = SensorSnapshot {
            compost_temp_c: 45.0,
            gas_raw: 15_000.0,
            fill_distance_cm: 5.0,
            ..nominal()
        };
        engine().run(&snap, &mut bank, 0);
        assert_eq!(bank.state(Actuator::Turner).off_deadline_ms, Some(20_000));
    }

    #[test]
    fn all_nan_snapshot_actuates_nothing() {
        let mut bank = ActuatorBank::new();
        let snap = SensorSnapshot {
            soil_moisture_pct: f32::NAN,
            compost_temp_c: f32::NAN,
            air_temp_c: f32::NAN,
            air_humidity_pct: f32::NAN,
            ph: f32::NAN,
            gas_raw: f32::NAN,
            conductivity_raw: f32::NAN,
            fill_distance_cm: f32::NAN,
            ..nominal()
        };
        let decision = engine().run(&snap, &mut bank, 0);
        assert!(decision.transitions.is_empty());
        assert_ne!(decision.sensor_faults, 0);
        assert_eq!(
            decision.rules_skipped,
            Rule::Moisture.mask()
                | Rule::CriticalTemp.mask()
                | Rule::AnaerobicRisk.mask()
                | Rule::Compaction.mask()
        );
    }

    #[test]
    fn nan_temp_leaves_other_rules_armed() {
        let mut bank = ActuatorBank::new();
        let snap = SensorSnapshot {
            compost_temp_c: f32::NAN,
            soil_moisture_pct: 30.0,
            fill_distance_cm: 5.0,
            ..nominal()
        };
        let decision = engine().run(&snap, &mut bank, 0);
        assert_eq!(
            decision.rules_skipped,
            Rule::CriticalTemp.mask() | Rule::AnaerobicRisk.mask()
        );
        assert!(bank.is_on(Actuator::Pump));
        assert!(bank.is_on(Actuator::Turner));
        assert!(!bank.state(Actuator::Fan).is_held_open());
    }
}
