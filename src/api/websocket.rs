//! WebSocket handler for live snapshot streaming
//!
//! Forwards every published SnapshotEvent to connected clients as
//! `{"event": "servers_update"|"websites_update", "data": [...]}`.
//! Delivery is lossy: a client that falls behind skips ticks.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::StreamExt, SinkExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::state::ApiState;

/// WebSocket upgrade handler
///
/// GET /api/v1/stream
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<ApiState>) -> Response {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

async fn handle_websocket(socket: WebSocket, state: ApiState) {
    info!("WebSocket client connected");

    let (mut sender, mut receiver) = socket.split();
    let mut snapshot_rx = state.snapshot_tx.subscribe();

    // Forward snapshot events to the client
    let mut send_task = tokio::spawn(async move {
        loop {
            match snapshot_rx.recv().await {
                Ok(event) => {
                    let json = serde_json::json!({
                        "event": event.event_name(),
                        "timestamp": event.timestamp.to_rfc3339(),
                        "data": event.rows,
                    });

                    let text = match serde_json::to_string(&json) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("failed to serialize snapshot: {e}");
                            continue;
                        }
                    };

                    if sender.send(Message::Text(text)).await.is_err() {
                        debug!("WebSocket send failed, client disconnected");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // The next snapshot supersedes anything missed.
                    debug!("WebSocket client lagged, skipped {skipped} snapshots");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("snapshot channel closed");
                    break;
                }
            }
        }
    });

    // Drain incoming messages so pings and close frames are handled
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => break,
                Message::Ping(_) => {
                    debug!("received ping");
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    info!("WebSocket client disconnected");
}
