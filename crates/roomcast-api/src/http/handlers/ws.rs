//! WebSocket handler for per-room real-time messaging.
//!
//! `GET /ws/rooms/{room_id}` upgrades an HTTP connection to a WebSocket
//! scoped to one room. Unknown rooms are rejected before the upgrade.
//! Once connected, the handler:
//!
//! - **Pushes messages:** Subscribes to the room's broadcast channel and
//!   forwards every appended message to the client as a JSON text frame.
//! - **Receives commands:** Parses incoming text frames as [`WsCommand`]
//!   and processes sends and pings.
//!
//! Delivery is best-effort: a subscriber that lags past the channel buffer
//! skips the missed messages and keeps receiving (the history endpoint is
//! the backfill path). Messages appended before the subscription began are
//! never replayed.

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use crate::http::error::AppError;
use crate::state::AppState;

/// Incoming command from a WebSocket client.
///
/// Clients send JSON-encoded text frames matching one of these variants.
/// Unknown or malformed frames are logged and ignored.
#[derive(Debug, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    /// Send a message into the room this socket is attached to.
    Send { sender: String, content: String },
    /// Keep-alive ping. Server responds with `{"type":"pong"}`.
    Ping,
}

/// Upgrade an HTTP request to a room-scoped WebSocket connection.
///
/// Mounted at `/ws/rooms/{room_id}` in the router. The room must already
/// exist; subscribing never creates one.
pub async fn room_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.registry.ensure_room(&room_id).await?;
    Ok(ws.on_upgrade(move |socket| handle_room_connection(socket, state, room_id)))
}

/// Core per-connection loop.
///
/// Uses `tokio::select!` to multiplex between the room's broadcast feed
/// and incoming client frames, keeping both directions in a single task.
async fn handle_room_connection(socket: WebSocket, state: AppState, room_id: String) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Subscribe before processing any command, so a send on this very
    // connection is also delivered back to it.
    let mut feed = state.router.subscribe(&room_id);

    loop {
        tokio::select! {
            // --- Branch 1: Forward room messages to the client ---
            feed_result = feed.recv() => {
                match feed_result {
                    Ok(message) => {
                        match serde_json::to_string(&message) {
                            Ok(json) => {
                                if ws_sender.send(WsMessage::Text(json.into())).await.is_err() {
                                    // Client disconnected
                                    break;
                                }
                            }
                            Err(err) => {
                                tracing::warn!("failed to serialize room message: {err}");
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(
                            %room_id,
                            skipped = n,
                            "subscriber lagged, skipping {n} messages"
                        );
                        // Keep receiving -- the client catches up via the
                        // history endpoint.
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            // --- Branch 2: Process commands from the client ---
            frame_result = ws_receiver.next() => {
                match frame_result {
                    Some(Ok(WsMessage::Text(text))) => {
                        process_command(&text, &room_id, &state, &mut ws_sender).await;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        // Client disconnected
                        break;
                    }
                    Some(Err(err)) => {
                        tracing::debug!("websocket receive error: {err}");
                        break;
                    }
                    // Ignore binary, ping, pong protocol frames (handled by axum/tungstenite)
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!(%room_id, "websocket connection closed");
}

/// Parse and process a single command frame.
async fn process_command(
    text: &str,
    room_id: &str,
    state: &AppState,
    ws_sender: &mut (impl SinkExt<WsMessage, Error = axum::Error> + Unpin),
) {
    let cmd: WsCommand = match serde_json::from_str(text) {
        Ok(cmd) => cmd,
        Err(err) => {
            tracing::warn!(
                raw = %text,
                error = %err,
                "ignoring malformed websocket command"
            );
            return;
        }
    };

    match cmd {
        WsCommand::Send { sender, content } => {
            let sender = sender.trim();
            if sender.is_empty() {
                send_error(ws_sender, "sender must not be blank").await;
                return;
            }
            // Delivery back to this connection happens through its own
            // feed subscription, not here.
            if let Err(err) = state.router.send(room_id, sender, &content).await {
                tracing::warn!(%room_id, error = %err, "websocket send rejected");
                send_error(ws_sender, &err.to_string()).await;
            }
        }
        WsCommand::Ping => {
            let pong = r#"{"type":"pong"}"#;
            if ws_sender.send(WsMessage::Text(pong.into())).await.is_err() {
                tracing::debug!("failed to send pong (client disconnecting)");
            }
        }
    }
}

/// Push an error frame to the client without closing the connection.
async fn send_error(
    ws_sender: &mut (impl SinkExt<WsMessage, Error = axum::Error> + Unpin),
    message: &str,
) {
    let frame = serde_json::json!({
        "type": "error",
        "message": message,
    })
    .to_string();
    let _ = ws_sender.send(WsMessage::Text(frame.into())).await;
}
