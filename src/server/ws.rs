//! WebSocket subscriber boundary
//!
//! Each accepted connection is registered with the
//! [`ConnectionRegistry`](crate::broadcast::ConnectionRegistry) before any
//! broadcast can target it, then split into a writer task (its
//! registered mpsc receiver plus a periodic ping) and a reader task that
//! logs and discards inbound frames — subscribers do not send commands
//! into the engine. When either side ends the connection is unregistered.

use std::time::Duration;

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::metrics;

use super::AppState;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one subscriber connection until it closes
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (connection_id, mut rx) = state.registry.register().await;
    metrics::set_connected_clients(state.registry.count().await);
    tracing::info!(connection_id = %connection_id, "subscriber connected");

    let (mut ws_tx, mut ws_rx) = socket.split();

    // Writer task: forward broadcasts from the registry channel + periodic ping
    let writer_id = connection_id.clone();
    let writer = tokio::spawn(async move {
        let mut ping_interval = tokio::time::interval(HEARTBEAT_INTERVAL);
        ping_interval.tick().await; // consume first immediate tick

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    match msg {
                        Some(text) => {
                            if ws_tx.send(WsMessage::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ping_interval.tick() => {
                    if ws_tx.send(WsMessage::Ping(Vec::new().into())).await.is_err() {
                        break;
                    }
                    tracing::trace!(connection_id = %writer_id, "sent ping");
                }
            }
        }
    });

    // Reader task: inbound subscriber frames are not part of the protocol
    let reader_id = connection_id.clone();
    let reader = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            match msg {
                WsMessage::Text(text) => {
                    tracing::debug!(
                        connection_id = %reader_id,
                        len = text.len(),
                        "discarding inbound subscriber message"
                    );
                }
                WsMessage::Close(_) => break,
                WsMessage::Ping(_) => {} // axum answers pongs automatically
                _ => {}
            }
        }
    });

    // Whichever side finishes first ends the connection
    tokio::select! {
        _ = writer => {},
        _ = reader => {},
    }

    state.registry.unregister(&connection_id).await;
    metrics::set_connected_clients(state.registry.count().await);
    tracing::info!(connection_id = %connection_id, "subscriber disconnected");
}
