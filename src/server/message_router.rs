use crate::protocol::{ClientId, ClientMessage};

use super::MatchmakingServer;

impl MatchmakingServer {
    /// Dispatch one parsed client message to the matching broker operation.
    pub async fn handle_client_message(&self, client_id: &ClientId, message: ClientMessage) {
        match message {
            ClientMessage::FindPartner => {
                self.find_partner(client_id).await;
            }
            ClientMessage::Signal { room, payload } => {
                self.relay_signal(client_id, room, payload).await;
            }
            ClientMessage::LeaveRoom { room } => {
                self.leave_room(client_id, room).await;
            }
            ClientMessage::Next => {
                self.next_partner(client_id).await;
            }
            ClientMessage::Stop => {
                self.stop(client_id).await;
            }
            ClientMessage::MediaConnected => {
                self.mark_media_connected(client_id).await;
            }
            ClientMessage::Ping => {
                self.handle_ping(client_id).await;
            }
        }
    }
}
