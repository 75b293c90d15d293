//! Per-client session state machine.
//!
//! Every request a client makes is first mapped to a [`SessionEvent`] and run
//! through [`SessionState::apply`]. Only accepted transitions mutate the
//! queue or room table; rejected ones are dropped by the caller.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Lifecycle state of a connected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Connected, not queued, no room.
    #[default]
    Idle,
    /// Waiting in the queue for a partner.
    Searching,
    /// Paired into a room, negotiation in progress.
    Matched,
    /// The client reported a working media link. Informational only.
    Connected,
}

/// Inputs that drive [`SessionState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    FindPartner,
    Matched,
    MediaConnected,
    Next,
    Stop,
    LeaveRoom,
    PeerLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot apply {event:?} while {from}")]
pub struct TransitionError {
    pub from: SessionState,
    pub event: SessionEvent,
}

impl SessionState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::Matched => "matched",
            Self::Connected => "connected",
        }
    }

    /// True while the client occupies a room.
    #[must_use]
    pub const fn in_room(&self) -> bool {
        matches!(self, Self::Matched | Self::Connected)
    }

    /// Compute the state reached by applying `event`.
    pub fn apply(self, event: SessionEvent) -> Result<Self, TransitionError> {
        use SessionEvent as E;
        use SessionState as S;

        let next = match (self, event) {
            (S::Idle | S::Searching, E::FindPartner) => S::Searching,
            (S::Searching, E::Matched) => S::Matched,
            (S::Matched | S::Connected, E::MediaConnected) => S::Connected,
            (_, E::Next) => S::Searching,
            (_, E::Stop) => S::Idle,
            (S::Matched | S::Connected, E::LeaveRoom) => S::Idle,
            (S::Matched | S::Connected, E::PeerLeft) => S::Searching,
            (from, event) => return Err(TransitionError { from, event }),
        };

        Ok(next)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }

    #[test]
    fn test_search_then_match_then_connect() {
        let state = SessionState::Idle
            .apply(SessionEvent::FindPartner)
            .and_then(|s| s.apply(SessionEvent::Matched))
            .and_then(|s| s.apply(SessionEvent::MediaConnected))
            .unwrap();
        assert_eq!(state, SessionState::Connected);
        assert!(state.in_room());
    }

    #[test]
    fn test_find_partner_rejected_inside_room() {
        for from in [SessionState::Matched, SessionState::Connected] {
            let err = from.apply(SessionEvent::FindPartner).unwrap_err();
            assert_eq!(err.from, from);
            assert_eq!(err.event, SessionEvent::FindPartner);
        }
    }

    #[test]
    fn test_match_requires_searching() {
        assert!(SessionState::Idle.apply(SessionEvent::Matched).is_err());
        assert!(SessionState::Matched.apply(SessionEvent::Matched).is_err());
    }

    #[test]
    fn test_stop_and_next_accepted_everywhere() {
        for from in [
            SessionState::Idle,
            SessionState::Searching,
            SessionState::Matched,
            SessionState::Connected,
        ] {
            assert_eq!(from.apply(SessionEvent::Stop), Ok(SessionState::Idle));
            assert_eq!(from.apply(SessionEvent::Next), Ok(SessionState::Searching));
        }
    }

    #[test]
    fn test_peer_left_requeues() {
        assert_eq!(
            SessionState::Connected.apply(SessionEvent::PeerLeft),
            Ok(SessionState::Searching)
        );
        assert!(SessionState::Searching.apply(SessionEvent::PeerLeft).is_err());
    }

    #[test]
    fn test_leave_room_goes_idle_only_from_room() {
        assert_eq!(
            SessionState::Matched.apply(SessionEvent::LeaveRoom),
            Ok(SessionState::Idle)
        );
        assert!(SessionState::Idle.apply(SessionEvent::LeaveRoom).is_err());
    }

    #[test]
    fn test_media_connected_ignored_outside_room() {
        assert!(SessionState::Searching
            .apply(SessionEvent::MediaConnected)
            .is_err());
    }
}
