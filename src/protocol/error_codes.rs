use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for transport-level failures.
///
/// Protocol misuse inside the matchmaking core is never reported; these codes
/// only cover frames the server could not accept at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidMessage,
    UnsupportedFrame,
    MessageTooLarge,
    TooManyConnections,
    InternalError,
}

impl ErrorCode {
    /// Returns a human-readable description of this error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidMessage => {
                "The message could not be parsed. Frames must be JSON objects with a known \"type\"."
            }
            Self::UnsupportedFrame => "Binary frames are not supported. Send JSON text frames.",
            Self::MessageTooLarge => {
                "The message size exceeds the maximum allowed limit. Please send a smaller message."
            }
            Self::TooManyConnections => {
                "Too many connections from your address. Close an existing connection and retry."
            }
            Self::InternalError => "An internal server error occurred. Please try again.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
