use serde::{Deserialize, Serialize};

use super::error_codes::ErrorCode;
use super::types::{Role, RoomId, SignalPayload};

/// Status text sent when a client enters the waiting queue.
pub const STATUS_WAITING: &str = "waiting";
/// Status text sent after an explicit stop.
pub const STATUS_STOPPED: &str = "stopped";
/// Status text sent to a client that left its room without re-searching.
pub const STATUS_LEFT: &str = "left";

/// Message types sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Enter the waiting queue, or pair with whoever is already waiting
    FindPartner,
    /// Relay a negotiation or chat payload to the other member of `room`
    Signal { room: RoomId, payload: SignalPayload },
    /// Leave the current room without searching again
    LeaveRoom {
        #[serde(default)]
        room: Option<RoomId>,
    },
    /// Leave the current room (if any) and immediately search again
    Next,
    /// Leave any room or queue and go idle
    Stop,
    /// The peer-to-peer media link came up on the client side
    MediaConnected,
    /// Heartbeat to maintain connection
    Ping,
}

/// Message types sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Informational status ("waiting", "stopped", "left")
    Status { message: String },
    /// A room was formed; `role` is this client's negotiation role
    Matched { room: RoomId, role: Role },
    /// Payload forwarded from the other room member
    Signal { payload: SignalPayload },
    /// The other room member left; the receiver has been re-queued
    PeerLeft,
    /// Heartbeat response
    Pong,
    /// Transport-level error (malformed or oversized frame, connection limits)
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error_code: Option<ErrorCode>,
    },
}

impl ServerMessage {
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
        }
    }
}
