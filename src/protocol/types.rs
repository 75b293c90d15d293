use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a connected client, valid for one network connection
pub type ClientId = Uuid;
/// Unique identifier for a two-party room
pub type RoomId = Uuid;

/// Negotiation role assigned to each room member at room creation.
///
/// The initiator creates the session offer, the responder answers it. Exactly
/// one member of every room holds each role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Initiator,
    Responder,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initiator => "initiator",
            Self::Responder => "responder",
        }
    }

    /// The role held by the other member of the same room.
    #[must_use]
    pub const fn counterpart(&self) -> Self {
        match self {
            Self::Initiator => Self::Responder,
            Self::Responder => Self::Initiator,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque negotiation or chat payload relayed between room members.
///
/// Only the `type` tag is read; every other field lands in `body` and is
/// forwarded as received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalPayload {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl SignalPayload {
    #[must_use]
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self::with_field(SignalKind::SessionOffer, "sdp", Value::String(sdp.into()))
    }

    #[must_use]
    pub fn answer(sdp: impl Into<String>) -> Self {
        Self::with_field(SignalKind::SessionAnswer, "sdp", Value::String(sdp.into()))
    }

    #[must_use]
    pub fn candidate(candidate: Value) -> Self {
        Self::with_field(SignalKind::NetworkCandidate, "candidate", candidate)
    }

    #[must_use]
    pub fn chat(text: impl Into<String>) -> Self {
        Self::with_field(SignalKind::ChatText, "text", Value::String(text.into()))
    }

    fn with_field(kind: SignalKind, key: &str, value: Value) -> Self {
        let mut body = Map::new();
        body.insert(key.to_string(), value);
        Self { kind, body }
    }
}

/// Payload tag, used for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    #[serde(rename = "offer")]
    SessionOffer,
    #[serde(rename = "answer")]
    SessionAnswer,
    #[serde(rename = "ice")]
    NetworkCandidate,
    #[serde(rename = "chat")]
    ChatText,
}

impl SignalKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SessionOffer => "session-offer",
            Self::SessionAnswer => "session-answer",
            Self::NetworkCandidate => "network-candidate",
            Self::ChatText => "chat-text",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
