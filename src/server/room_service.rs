use crate::protocol::{ClientId, RoomId, ServerMessage, STATUS_LEFT, STATUS_STOPPED};

use super::connection_manager::ClientConnection;
use super::room_manager::Room;
use super::session::{SessionEvent, SessionState};
use super::{MatchState, MatchmakingServer};

impl MatchmakingServer {
    /// Leave the current room without searching again.
    ///
    /// `room` is what the client believes it is in; a stale or foreign id, or
    /// no room at all, makes this a silent no-op.
    pub async fn leave_room(&self, client_id: &ClientId, room: Option<RoomId>) {
        let mut state = self.state.lock().await;
        let Some(connection) = state.registry.get(client_id) else {
            return;
        };

        if let (Some(requested), Some(current)) = (room, connection.room_id) {
            if requested != current {
                tracing::debug!(%client_id, %requested, %current, "Leave for a room the client is not in ignored");
                return;
            }
        }

        let next = match connection.state.apply(SessionEvent::LeaveRoom) {
            Ok(next) => next,
            Err(err) => {
                tracing::debug!(%client_id, error = %err, "Leave request ignored");
                return;
            }
        };

        state.close_room_of(client_id);
        state.set_session_state(client_id, next);
        state.deliver(client_id, ServerMessage::status(STATUS_LEFT));
    }

    /// Leave the current room (if any), then search for a new partner.
    pub async fn next_partner(&self, client_id: &ClientId) {
        let mut state = self.state.lock().await;
        let Some(connection) = state.registry.get(client_id) else {
            return;
        };

        if state.queue.contains(client_id) {
            tracing::debug!(%client_id, "Client already waiting, next ignored");
            return;
        }

        let next = match connection.state.apply(SessionEvent::Next) {
            Ok(next) => next,
            Err(err) => {
                tracing::debug!(%client_id, error = %err, "Next request ignored");
                return;
            }
        };

        state.close_room_of(client_id);
        state.set_session_state(client_id, next);
        state.request_partner(client_id);
    }

    /// Leave any room or queue slot and go idle.
    pub async fn stop(&self, client_id: &ClientId) {
        let mut state = self.state.lock().await;
        let Some(connection) = state.registry.get(client_id) else {
            return;
        };

        let next = match connection.state.apply(SessionEvent::Stop) {
            Ok(next) => next,
            Err(err) => {
                tracing::debug!(%client_id, error = %err, "Stop request ignored");
                return;
            }
        };

        state.queue.remove(client_id);
        state.close_room_of(client_id);
        state.set_session_state(client_id, next);
        tracing::info!(%client_id, "Client stopped searching");
        state.deliver(client_id, ServerMessage::status(STATUS_STOPPED));
    }

    /// Record that the client's media link came up. Informational only.
    pub async fn mark_media_connected(&self, client_id: &ClientId) {
        let mut state = self.state.lock().await;
        let Some(connection) = state.registry.get_mut(client_id) else {
            return;
        };

        match connection.state.apply(SessionEvent::MediaConnected) {
            Ok(next) => {
                connection.state = next;
                tracing::info!(%client_id, room_id = ?connection.room_id, "Peer media link connected");
            }
            Err(err) => {
                tracing::debug!(%client_id, error = %err, "Media connected report ignored");
            }
        }
    }
}

impl MatchState {
    pub(super) fn set_session_state(&mut self, client_id: &ClientId, next: SessionState) {
        if let Some(connection) = self.registry.get_mut(client_id) {
            connection.state = next;
        }
    }

    /// Tear down the room `client_id` occupies.
    ///
    /// The other member is told `peer-left` and sent back into the queue. The
    /// caller decides what happens to `client_id` itself. Returns the closed
    /// room, or `None` when the client had no room.
    pub(super) fn close_room_of(&mut self, client_id: &ClientId) -> Option<Room> {
        let room_id = self.registry.get_mut(client_id)?.room_id.take()?;

        let Some(room) = self.rooms.remove(&room_id) else {
            tracing::warn!(%client_id, %room_id, "Client referenced a room that no longer exists");
            return None;
        };
        self.metrics.increment_rooms_closed();

        let peer = room.other_member(client_id);
        tracing::info!(%client_id, %room_id, peer = ?peer, "Room closed");

        if let Some(peer) = peer {
            self.handle_peer_left(&peer);
        }

        Some(room)
    }

    fn handle_peer_left(&mut self, peer: &ClientId) {
        let Some(connection) = self.registry.get_mut(peer) else {
            return;
        };
        connection.room_id = None;
        connection.state = connection
            .state
            .apply(SessionEvent::PeerLeft)
            .unwrap_or(SessionState::Searching);

        self.metrics.increment_peer_left_events();
        self.deliver(peer, ServerMessage::PeerLeft);
        self.request_partner(peer);
    }

    /// Single cleanup path for a vanished connection.
    pub(super) fn unregister(&mut self, client_id: &ClientId) -> Option<ClientConnection> {
        if !self.registry.contains(client_id) {
            return None;
        }

        if self.queue.remove(client_id) {
            tracing::debug!(%client_id, "Removed disconnected client from waiting queue");
        }
        self.close_room_of(client_id);
        self.registry.remove(client_id)
    }
}
