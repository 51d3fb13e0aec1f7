//! Inbound remote commands.
//!
//! The command channel delivers decoded text payloads from the message-bus
//! subscription.  Matching is exact and case-sensitive; anything else is
//! rejected as unrecognized (reported, never fatal).

use crate::error::CommandError;

/// Remote override commands accepted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Run the turner for the fixed remote-override window.
    TurnerOn,
    /// Run the pump and fan for the standard irrigation window.
    PumpOn,
}

impl RemoteCommand {
    /// Parse a raw command payload.  Exact match, case-sensitive.
    pub fn parse(raw: &str) -> Result<Self, CommandError> {
        match raw {
            "TURNER_ON" => Ok(Self::TurnerOn),
            "PUMP_ON" => Ok(Self::PumpOn),
            _ => Err(CommandError::Unrecognized),
        }
    }

    /// Wire name of the command.
    pub const fn name(self) -> &'static str {
        match self {
            Self::TurnerOn => "TURNER_ON",
            Self::PumpOn => "PUMP_ON",
        }
    }
}
