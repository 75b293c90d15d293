use crate::protocol::{ClientId, ErrorCode, ServerMessage};
use crate::server::{MatchmakingServer, RegisterClientError};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::frames::{parse_client_message, FrameRejection};
use super::sending::send_server_message;

pub(super) async fn handle_socket(
    socket: WebSocket,
    server: Arc<MatchmakingServer>,
    addr: SocketAddr,
) {
    let (mut sender, mut receiver) = socket.split();
    let queue_capacity = server.config().outbound_queue_capacity.max(1);
    let (tx, mut rx) = mpsc::channel::<Arc<ServerMessage>>(queue_capacity);

    let client_id = match server.register_client(tx, addr).await {
        Ok(client_id) => {
            tracing::info!(%client_id, client_addr = %addr, "WebSocket connection established");
            client_id
        }
        Err(err @ RegisterClientError::IpLimitExceeded { .. }) => {
            let error_message = ServerMessage::Error {
                message: err.to_string(),
                error_code: Some(ErrorCode::TooManyConnections),
            };
            if let Err(send_err) = send_server_message(&mut sender, &error_message, None).await {
                tracing::debug!(
                    client_addr = %addr,
                    error = %send_err,
                    "Failed to send IP limit error frame"
                );
            }
            let _ = sender.close().await;
            return;
        }
    };

    // Outbound: drain the client's channel onto the socket
    let server_clone = server.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(err) = send_server_message(&mut sender, &message, Some(&client_id)).await {
                tracing::debug!(%client_id, error = %err, "Failed to send message, connection closed");
                break;
            }
        }
        let _ = sender.close().await;

        server_clone.unregister_client(&client_id).await;
    });

    // Inbound: parse frames and hand them to the broker
    let server_clone = server.clone();
    let mut receive_task = tokio::spawn(async move {
        let max_message_size = server_clone.config().max_message_size;

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(%client_id, error = %e, "WebSocket error");
                    break;
                }
            };

            match msg {
                Message::Text(text) => match parse_client_message(&text, max_message_size) {
                    Ok(client_message) => {
                        server_clone
                            .handle_client_message(&client_id, client_message)
                            .await;
                    }
                    Err(rejection) => {
                        reject_frame(&server_clone, &client_id, &rejection).await;
                    }
                },
                Message::Binary(payload) => {
                    let rejection = FrameRejection::Binary {
                        size: payload.len(),
                    };
                    reject_frame(&server_clone, &client_id, &rejection).await;
                }
                Message::Close(_) => {
                    tracing::info!(%client_id, "WebSocket connection closed by client");
                    break;
                }
                // Protocol-level ping/pong is answered by the transport
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }

        server_clone.unregister_client(&client_id).await;
    });

    tokio::select! {
        _ = &mut send_task => {
            tracing::debug!(%client_id, "Send task completed");
            receive_task.abort();
        }
        _ = &mut receive_task => {
            tracing::debug!(%client_id, "Receive task completed");
            send_task.abort();
        }
    }

    server.unregister_client(&client_id).await;
}

async fn reject_frame(server: &MatchmakingServer, client_id: &ClientId, rejection: &FrameRejection) {
    match rejection {
        FrameRejection::TooLarge { .. } => server.metrics.increment_oversized_frames(),
        FrameRejection::InvalidJson(_) | FrameRejection::Binary { .. } => {
            server.metrics.increment_invalid_frames();
        }
    }

    tracing::warn!(%client_id, reason = %rejection, "Rejected client WebSocket frame");
    let _ = server
        .send_error_to_client(
            client_id,
            rejection.user_message(),
            Some(rejection.error_code()),
        )
        .await;
}
