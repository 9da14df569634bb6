//! WebSocket transport for the chat relay

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::events::{ClientEvent, ServerEvent};
use super::relay::ChatRelay;
use crate::state::AppState;

const CHANNEL_CAPACITY: usize = 32;

/// Upgrade `GET /socket` to a relay connection
pub async fn socket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.chat_relay))
}

async fn handle_socket(socket: WebSocket, relay: ChatRelay) {
    let connection_id = Uuid::new_v4();
    info!("New client connected: {}", connection_id);

    let (mut sink, mut stream) = socket.split();
    let (inbound_tx, inbound_rx) = mpsc::channel::<ClientEvent>(CHANNEL_CAPACITY);
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerEvent>(CHANNEL_CAPACITY);

    // Ends once every reply sender is gone or the client stops accepting frames.
    tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Failed to encode event for {}: {}", connection_id, e);
                    continue;
                }
            };
            if sink.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    let relay_task =
        tokio::spawn(async move { relay.serve(connection_id, inbound_rx, outbound_tx).await });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => {
                    if inbound_tx.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Ignoring malformed frame on {}: {}", connection_id, e),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
        }
    }

    drop(inbound_tx);
    if let Err(e) = relay_task.await {
        error!("Relay task for {} failed: {}", connection_id, e);
    }

    info!("Client disconnected: {}", connection_id);
}
