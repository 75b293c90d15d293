use crate::protocol::{ClientId, RoomId, ServerMessage, SignalPayload};

use super::MatchmakingServer;

impl MatchmakingServer {
    /// Forward `payload` to the other member of the sender's room.
    ///
    /// Dropped without a reply when the sender has no room or names a room it
    /// is not in; a signal racing a teardown lands here after the room is gone.
    pub async fn relay_signal(&self, sender: &ClientId, room: RoomId, payload: SignalPayload) {
        let kind = payload.kind;
        let state = self.state.lock().await;

        let Some(current) = state.room_of(sender) else {
            self.metrics.increment_signals_dropped();
            tracing::debug!(client_id = %sender, %room, %kind, "Signal from client without a room dropped");
            return;
        };

        if current.id != room {
            self.metrics.increment_signals_dropped();
            tracing::debug!(
                client_id = %sender,
                requested_room = %room,
                current_room = %current.id,
                %kind,
                "Signal for a foreign room dropped"
            );
            return;
        }

        let Some(recipient) = current.other_member(sender) else {
            self.metrics.increment_signals_dropped();
            return;
        };

        if state.deliver(&recipient, ServerMessage::Signal { payload }) {
            self.metrics.increment_signals_relayed();
            tracing::debug!(client_id = %sender, %recipient, %room, %kind, "Signal relayed");
        } else {
            self.metrics.increment_signals_dropped();
        }
    }
}
