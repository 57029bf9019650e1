//! WebSocket session driver.
//!
//! Runs one upgraded socket for its whole life:
//! 1. Attach to the room (registry + welcome frame)
//! 2. Forward queued frames to the socket
//! 3. Hand inbound text frames to the room
//! 4. Detach from the room on close or error

use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures::{SinkExt, StreamExt};

use crate::application::RoomHost;
use crate::domain::foundation::RoomId;

use super::sink::ChannelPeerSink;

/// Close code sent when the room cannot be activated.
const CLOSE_ROOM_UNAVAILABLE: u16 = 1011;

/// Handle an established WebSocket connection for `room_id`.
pub async fn handle_socket(socket: WebSocket, room_id: RoomId, host: Arc<RoomHost>) {
    let (mut sender, mut receiver) = socket.split();
    let (sink, mut outbound) = ChannelPeerSink::channel();

    let connection_id = match host.connect(&room_id, Arc::new(sink)).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(room_id = %room_id, "Rejecting socket: {}", e);
            let _ = sender
                .send(Message::Close(Some(CloseFrame {
                    code: CLOSE_ROOM_UNAVAILABLE,
                    reason: "Room unavailable".into(),
                })))
                .await;
            return;
        }
    };

    // Spawn task to drain the connection's queue into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if let Err(e) = sender.send(Message::Text(frame)).await {
                tracing::debug!(
                    connection_id = %connection_id,
                    "Send error, closing connection: {}",
                    e
                );
                break;
            }
        }
    });

    // Handle incoming frames from the peer
    let recv_host = host.clone();
    let recv_room = room_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    if let Err(e) = recv_host.message(&recv_room, &connection_id, &text).await {
                        tracing::debug!(connection_id = %connection_id, "Message dropped: {}", e);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        "Received unsupported binary message"
                    );
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Protocol-level keepalive, answered by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    let _ = recv_host
                        .error(&recv_room, &connection_id, &e.to_string())
                        .await;
                    break;
                }
            }
        }
    });

    // Wait for either side to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    host.disconnect(&room_id, &connection_id).await;
}
