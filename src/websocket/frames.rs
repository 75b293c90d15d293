use crate::protocol::{ClientMessage, ErrorCode};
use std::fmt;

/// Decode one text frame into a client message, enforcing the size limit first.
pub(super) fn parse_client_message(
    raw_text: &str,
    max_message_size: usize,
) -> Result<ClientMessage, FrameRejection> {
    if raw_text.len() > max_message_size {
        return Err(FrameRejection::TooLarge {
            size: raw_text.len(),
            max: max_message_size,
        });
    }

    serde_json::from_str(raw_text).map_err(FrameRejection::InvalidJson)
}

/// Why an inbound frame was refused. None of these close the connection.
#[derive(Debug)]
pub(super) enum FrameRejection {
    TooLarge { size: usize, max: usize },
    InvalidJson(serde_json::Error),
    Binary { size: usize },
}

impl FrameRejection {
    pub(super) fn user_message(&self) -> String {
        match self {
            Self::TooLarge { size, max } => {
                format!("Message too large ({size} bytes, max {max} bytes)")
            }
            Self::InvalidJson(_) => "Invalid client message".to_string(),
            Self::Binary { .. } => "Binary frames are not supported".to_string(),
        }
    }

    pub(super) fn error_code(&self) -> ErrorCode {
        match self {
            Self::TooLarge { .. } => ErrorCode::MessageTooLarge,
            Self::InvalidJson(_) => ErrorCode::InvalidMessage,
            Self::Binary { .. } => ErrorCode::UnsupportedFrame,
        }
    }
}

impl fmt::Display for FrameRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { size, max } => write!(f, "frame of {size} bytes exceeds {max}"),
            Self::InvalidJson(err) => write!(f, "invalid json: {err}"),
            Self::Binary { size } => write!(f, "binary frame of {size} bytes"),
        }
    }
}
