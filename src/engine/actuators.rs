//! Actuator records and the timed-shutoff model.
//!
//! Each actuator carries its own on/off status and auto-off deadline, so no
//! second sensor reading is needed to decide when it turns off.  The
//! original board shared one global shutoff timer across all three relays;
//! here every actuator owns an independent deadline and concurrent requests
//! merge longest-wins.
//!
//! ## Deadline rules
//!
//! - `schedule_on` never shortens a pending later deadline and never
//!   preempts a hold-open.
//! - A hold-open (`is_on == true`, `off_deadline_ms == None`) has no expiry
//!   and is cleared only by an explicit [`ActuatorBank::release_hold`].
//! - `tick` retires every actuator whose deadline has passed; it runs once
//!   per cycle before rule evaluation and is idempotent.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Actuator identity
// ---------------------------------------------------------------------------

/// The three physical actuators on the enclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Actuator {
    /// Water pump for irrigation.
    Pump,
    /// Aeration fan.
    Fan,
    /// Turner motor for mixing the pile.
    Turner,
}

impl Actuator {
    /// Total number of actuators — used to size state arrays.
    pub const COUNT: usize = 3;

    /// All actuators in fixed evaluation order.
    pub const ALL: [Self; Self::COUNT] = [Self::Pump, Self::Fan, Self::Turner];

    /// Index into per-actuator state arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name for logs and telemetry.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::Fan => "fan",
            Self::Turner => "turner",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-actuator state
// ---------------------------------------------------------------------------

/// On/off status plus the scheduled auto-off deadline for one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorState {
    /// Whether the relay is currently commanded on.
    pub is_on: bool,
    /// Monotonic timestamp (ms) at which the actuator auto-offs.
    /// `None` while on means held open indefinitely.
    pub off_deadline_ms: Option<u64>,
}

impl ActuatorState {
    /// True if the actuator is on with no expiry.
    pub fn is_held_open(&self) -> bool {
        self.is_on && self.off_deadline_ms.is_none()
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// One applied actuator state change, reported to the caller so it can
/// drive the physical output and log/transmit what happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub actuator: Actuator,
    /// New on/off status.
    pub on: bool,
    /// New auto-off deadline.  `None` with `on == true` is a hold-open.
    pub until_ms: Option<u64>,
}

/// Transitions applied in one cycle.  Capacity covers the worst case:
/// three tick retirements plus a change for every actuator from the rules.
pub type Transitions = heapless::Vec<Transition, 12>;

// ---------------------------------------------------------------------------
// ActuatorBank
// ---------------------------------------------------------------------------

/// Owns the state of every actuator for the process lifetime.
///
/// Mutated only by the decision engine and the command channel; both run on
/// the control loop, which is the single logical owner (commands arriving
/// from other execution contexts are staged in a mailbox and drained here).
#[derive(Debug, Clone, Default)]
pub struct ActuatorBank {
    states: [ActuatorState; Actuator::COUNT],
}

impl ActuatorBank {
    /// All actuators off, no deadlines — the startup state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of one actuator.
    pub fn state(&self, actuator: Actuator) -> ActuatorState {
        self.states[actuator.index()]
    }

    /// Whether one actuator is currently on.
    pub fn is_on(&self, actuator: Actuator) -> bool {
        self.states[actuator.index()].is_on
    }

    /// Retire every actuator whose deadline has passed.
    ///
    /// Runs once per cycle before rule evaluation so stale actuators are
    /// off before new decisions are made.  Calling twice at the same `now`
    /// is a no-op the second time.
    pub fn tick(&mut self, now_ms: u64) -> Transitions {
        let mut retired = Transitions::new();
        for actuator in Actuator::ALL {
            let state = &mut self.states[actuator.index()];
            if let Some(deadline) = state.off_deadline_ms {
                if now_ms >= deadline {
                    *state = ActuatorState::default();
                    let _ = retired.push(Transition {
                        actuator,
                        on: false,
                        until_ms: None,
                    });
                }
            }
        }
        retired
    }

    /// Turn an actuator on until `now_ms + duration_ms`, merging with any
    /// existing commitment longest-wins.
    ///
    /// Returns the applied transition, or `None` when the request would
    /// shorten a later pending deadline or preempt a hold-open — existing
    /// longer commitments are never cut short.
    pub fn schedule_on(
        &mut self,
        actuator: Actuator,
        now_ms: u64,
        duration_ms: u64,
    ) -> Option<Transition> {
        let state = &mut self.states[actuator.index()];
        if state.is_held_open() {
            return None;
        }
        let requested = now_ms.saturating_add(duration_ms);
        match state.off_deadline_ms {
            Some(existing) if state.is_on && existing >= requested => None,
            _ => {
                state.is_on = true;
                state.off_deadline_ms = Some(requested);
                Some(Transition {
                    actuator,
                    on: true,
                    until_ms: Some(requested),
                })
            }
        }
    }

    /// Hold an actuator on indefinitely, overriding any pending shutoff.
    /// Returns `None` if it is already held open.
    pub fn hold_open(&mut self, actuator: Actuator) -> Option<Transition> {
        let state = &mut self.states[actuator.index()];
        if state.is_held_open() {
            return None;
        }
        *state = ActuatorState {
            is_on: true,
            off_deadline_ms: None,
        };
        Some(Transition {
            actuator,
            on: true,
            until_ms: None,
        })
    }

    /// Clear a hold-open, turning the actuator off.
    ///
    /// Only acts on a held-open actuator; a timed commitment is left to
    /// expire through [`tick`](Self::tick).
    pub fn release_hold(&mut self, actuator: Actuator) -> Option<Transition> {
        let state = &mut self.states[actuator.index()];
        if !state.is_held_open() {
            return None;
        }
        *state = ActuatorState::default();
        Some(Transition {
            actuator,
            on: false,
            until_ms: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_off() {
        let bank = ActuatorBank::new();
        for a in Actuator::ALL {
            assert!(!bank.is_on(a));
            assert_eq!(bank.state(a).off_deadline_ms, None);
        }
    }

    #[test]
    fn schedule_sets_deadline() {
        let mut bank = ActuatorBank::new();
        let t = bank.schedule_on(Actuator::Pump, 1_000, 30_000).unwrap();
        assert!(t.on);
        assert_eq!(t.until_ms, Some(31_000));
        assert!(bank.is_on(Actuator::Pump));
    }

    #[test]
    fn merge_keeps_later_deadline() {
        let mut bank = ActuatorBank::new();
        bank.schedule_on(Actuator::Turner, 0, 20_000).unwrap();
        // Shorter re-arm must not cut the existing commitment short.
        assert!(bank.schedule_on(Actuator::Turner, 0, 15_000).is_none());
        assert_eq!(bank.state(Actuator::Turner).off_deadline_ms, Some(20_000));
    }

    #[test]
    fn merge_is_commutative() {
        let mut ab = ActuatorBank::new();
        ab.schedule_on(Actuator::Turner, 0, 15_000);
        ab.schedule_on(Actuator::Turner, 0, 20_000);

        let mut ba = ActuatorBank::new();
        ba.schedule_on(Actuator::Turner, 0, 20_000);
        ba.schedule_on(Actuator::Turner, 0, 15_000);

        assert_eq!(ab.state(Actuator::Turner), ba.state(Actuator::Turner));
        assert_eq!(ab.state(Actuator::Turner).off_deadline_ms, Some(20_000));
    }

    #[test]
    fn tick_retires_expired_and_is_idempotent() {
        let mut bank = ActuatorBank::new();
        bank.schedule_on(Actuator::Fan, 0, 5_000);

        assert!(bank.tick(4_999).is_empty());
        let retired = bank.tick(5_000);
        assert_eq!(retired.len(), 1);
        assert!(!retired[0].on);
        assert!(!bank.is_on(Actuator::Fan));

        // Second tick at the same instant changes nothing.
        assert!(bank.tick(5_000).is_empty());
    }

    #[test]
    fn hold_open_overrides_pending_shutoff() {
        let mut bank = ActuatorBank::new();
        bank.schedule_on(Actuator::Fan, 0, 5_000);
        let t = bank.hold_open(Actuator::Fan).unwrap();
        assert_eq!(t.until_ms, None);
        assert!(bank.state(Actuator::Fan).is_held_open());

        // A held actuator never expires.
        assert!(bank.tick(1_000_000).is_empty());
        assert!(bank.is_on(Actuator::Fan));
    }

    #[test]
    fn schedule_cannot_preempt_hold_open() {
        let mut bank = ActuatorBank::new();
        bank.hold_open(Actuator::Fan);
        assert!(bank.schedule_on(Actuator::Fan, 0, 30_000).is_none());
        assert!(bank.state(Actuator::Fan).is_held_open());
    }

    #[test]
    fn release_only_clears_hold_open() {
        let mut bank = ActuatorBank::new();
        bank.schedule_on(Actuator::Fan, 0, 5_000);
        // Timed commitment: release is a no-op, tick owns the shutoff.
        assert!(bank.release_hold(Actuator::Fan).is_none());
        assert!(bank.is_on(Actuator::Fan));

        bank.hold_open(Actuator::Fan);
        let t = bank.release_hold(Actuator::Fan).unwrap();
        assert!(!t.on);
        assert!(!bank.is_on(Actuator::Fan));
    }
}
