//! Fuzz the remote command parser with arbitrary payload bytes.
//!
//! The parser must never panic and must only accept the two exact command
//! strings — everything else is a typed rejection.

#![no_main]

use compostech::app::commands::RemoteCommand;
use compostech::error::CommandError;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = core::str::from_utf8(data) else {
        return;
    };
    match RemoteCommand::parse(payload) {
        Ok(cmd) => {
            // Acceptance implies an exact wire-name match.
            assert_eq!(payload, cmd.name());
        }
        Err(e) => assert_eq!(e, CommandError::Unrecognized),
    }
});
