//! Fuzz the command mailbox staging path.
//!
//! Arbitrary payloads (including oversized and non-ASCII ones) must stage
//! and drain without panicking, and a drained payload never exceeds the
//! staging capacity.

#![no_main]

use compostech::events::{push_command, take_command, COMMAND_MAX_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = core::str::from_utf8(data) else {
        return;
    };
    push_command(payload);
    while let Some(staged) = take_command() {
        assert!(staged.len() <= COMMAND_MAX_LEN);
    }
});
