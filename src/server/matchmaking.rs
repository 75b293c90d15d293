use crate::protocol::{ClientId, Role, ServerMessage, STATUS_WAITING};

use super::session::{SessionEvent, SessionState};
use super::{MatchState, MatchmakingServer};

impl MatchmakingServer {
    /// Enter the waiting queue, or pair with the longest-waiting client.
    ///
    /// Never blocks on a partner: the caller is either told it is waiting or
    /// receives `matched` straight away.
    pub async fn find_partner(&self, client_id: &ClientId) {
        self.state.lock().await.request_partner(client_id);
    }
}

impl MatchState {
    /// Pair `client_id` with the queue head, or enqueue it.
    ///
    /// No-op when the client is unknown, already queued, or inside a room.
    pub(super) fn request_partner(&mut self, client_id: &ClientId) {
        let Some(connection) = self.registry.get_mut(client_id) else {
            tracing::debug!(%client_id, "Partner request from unknown client ignored");
            return;
        };

        if self.queue.contains(client_id) {
            tracing::debug!(%client_id, "Client already waiting, partner request ignored");
            return;
        }

        if connection.room_id.is_some() {
            tracing::debug!(%client_id, "Client already in a room, partner request ignored");
            return;
        }

        match connection.state.apply(SessionEvent::FindPartner) {
            Ok(next) => connection.state = next,
            Err(err) => {
                tracing::debug!(%client_id, error = %err, "Partner request rejected");
                return;
            }
        }
        self.metrics.increment_partner_requests();

        loop {
            let Some(partner) = self.queue.dequeue() else {
                self.wait_in_queue(client_id);
                return;
            };

            if partner == *client_id {
                self.metrics.increment_self_pairings_prevented();
                tracing::warn!(%client_id, "Dequeued client matched itself, re-queueing");
                self.wait_in_queue(client_id);
                return;
            }

            let partner_searching = self
                .registry
                .get(&partner)
                .is_some_and(|p| p.state == SessionState::Searching && p.room_id.is_none());
            if !partner_searching {
                tracing::warn!(%partner, "Skipping stale queue entry");
                continue;
            }

            // The newcomer proposes, the longer-waiting client answers.
            self.create_room(*client_id, partner);
            return;
        }
    }

    fn wait_in_queue(&mut self, client_id: &ClientId) {
        self.queue.enqueue(*client_id);
        tracing::info!(%client_id, waiting = self.queue.len(), "Client waiting for a partner");
        self.deliver(client_id, ServerMessage::status(STATUS_WAITING));
    }

    /// Form a room and tell each member its role.
    pub(super) fn create_room(&mut self, initiator: ClientId, responder: ClientId) {
        let Some(room) = self.rooms.create(initiator, responder) else {
            self.metrics.increment_self_pairings_prevented();
            self.wait_in_queue(&initiator);
            return;
        };
        self.metrics.increment_rooms_created();

        for member in room.members() {
            if let Some(connection) = self.registry.get_mut(&member) {
                connection.room_id = Some(room.id);
                connection.state = connection
                    .state
                    .apply(SessionEvent::Matched)
                    .unwrap_or(SessionState::Matched);
            }
        }

        tracing::info!(
            room_id = %room.id,
            %initiator,
            %responder,
            "Paired clients into room"
        );

        self.deliver(
            &initiator,
            ServerMessage::Matched {
                room: room.id,
                role: Role::Initiator,
            },
        );
        self.deliver(
            &responder,
            ServerMessage::Matched {
                room: room.id,
                role: Role::Responder,
            },
        );
    }
}
