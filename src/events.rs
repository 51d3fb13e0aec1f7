//! Interrupt-safe event system.
//!
//! Events are produced by:
//! - Timer callbacks (periodic sampling-cycle tick)
//! - The MQTT subscription callback (remote command arrival)
//!
//! Events are consumed by the main control loop, which processes them one
//! at a time.  Command payloads travel out-of-band through a
//! critical-section-guarded mailbox, because the lock-free queue carries
//! only plain discriminants.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Timer ISR   │────▶│  Event Queue │────▶│  Main Loop   │
//! │ MQTT task   │────▶│  (lock-free) │     │  (consumer)  │
//! └──────┬──────┘     └──────────────┘     └──────▲───────┘
//!        │              Command Mailbox           │
//!        └──────────────(mutex-guarded)───────────┘
//! ```

use core::cell::RefCell;
use core::sync::atomic::{AtomicU8, Ordering};

use embassy_sync::blocking_mutex::CriticalSectionMutex;

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 16;

/// System event types, ordered by rough priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Sampling-cycle tick: acquire → decide → apply → report.
    ControlTick     = 20,
    /// One or more remote commands are waiting in the mailbox.
    CommandReceived = 31,
    /// Watchdog heartbeat.
    WatchdogTick    = 50,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Producers write, main loop reads (consume).  Uses atomic head/tail
// indices; the buffer lives in a static so timer callbacks can reach it.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: one producer context (timer/MQTT task pushes are serialized by
// the FreeRTOS timer service), one consumer (main loop).  The atomics
// enforce the SPSC discipline.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: single producer; slot `head` is not visible to the consumer
    // until the Release store below.
    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

// ── Command mailbox ───────────────────────────────────────────
//
// The MQTT subscription callback runs on a different execution context
// than the control loop, so raw command payloads are staged behind a
// critical-section mutex and drained by the loop.  The loop remains the
// sole mutator of actuator state.

/// Longest accepted command payload.  Anything longer is clipped and will
/// fail the exact-match parse downstream (reported as unrecognized).
pub const COMMAND_MAX_LEN: usize = 32;

const COMMAND_MAILBOX_CAP: usize = 4;

type CommandBuf = heapless::String<COMMAND_MAX_LEN>;

static COMMAND_MAILBOX: CriticalSectionMutex<
    RefCell<heapless::Deque<CommandBuf, COMMAND_MAILBOX_CAP>>,
> = CriticalSectionMutex::new(RefCell::new(heapless::Deque::new()));

/// Stage a raw command payload for the control loop.
/// Returns `false` if the mailbox is full (command dropped).
pub fn push_command(raw: &str) -> bool {
    let mut buf = CommandBuf::new();
    for ch in raw.chars() {
        if buf.push(ch).is_err() {
            break; // Clipped — parse will reject it.
        }
    }
    COMMAND_MAILBOX.lock(|q| q.borrow_mut().push_back(buf).is_ok())
}

/// Take the oldest staged command payload, if any.
pub fn take_command() -> Option<CommandBuf> {
    COMMAND_MAILBOX.lock(|q| q.borrow_mut().pop_front())
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        20 => Some(Event::ControlTick),
        31 => Some(Event::CommandReceived),
        50 => Some(Event::WatchdogTick),
        _ => None,
    }
}
