use crate::protocol::{ClientId, ServerMessage};
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::SinkExt;

const SERIALIZATION_FALLBACK: &str =
    r#"{"type":"error","data":{"message":"Internal error","error_code":"INTERNAL_ERROR"}}"#;

/// Write one server message as a JSON text frame.
///
/// A message that fails to serialize is replaced by a generic internal error
/// frame. Errors only come from the socket itself.
pub(super) async fn send_server_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
    client_id: Option<&ClientId>,
) -> Result<(), axum::Error> {
    let payload = match serde_json::to_string(message) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(client_id = ?client_id, error = %err, "Failed to serialize server message");
            SERIALIZATION_FALLBACK.to_string()
        }
    };

    sender.send(Message::Text(payload.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_frame_is_a_valid_error_message() {
        let parsed: ServerMessage = serde_json::from_str(SERIALIZATION_FALLBACK).unwrap();
        assert_eq!(
            parsed,
            ServerMessage::Error {
                message: "Internal error".to_string(),
                error_code: Some(crate::protocol::ErrorCode::InternalError),
            }
        );
    }
}
