use super::MatchmakingServer;
use crate::protocol::{ClientId, ErrorCode, ServerMessage};

impl MatchmakingServer {
    /// Queue a message for a single client. Returns false if it was dropped.
    pub async fn send_to_client(&self, client_id: &ClientId, message: ServerMessage) -> bool {
        self.state.lock().await.deliver(client_id, message)
    }

    /// Send a transport-level error to a specific client.
    pub async fn send_error_to_client(
        &self,
        client_id: &ClientId,
        message: String,
        error_code: Option<ErrorCode>,
    ) -> bool {
        self.send_to_client(
            client_id,
            ServerMessage::Error {
                message,
                error_code,
            },
        )
        .await
    }

    /// Answer an application-level heartbeat.
    pub async fn handle_ping(&self, client_id: &ClientId) {
        self.send_to_client(client_id, ServerMessage::Pong).await;
    }
}
