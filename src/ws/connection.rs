//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection: inbound
//! frames are decoded and handed to the relay one at a time, and events
//! queued for this connection are written back to the socket.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::{decode_client_event, encode_server_event};
use crate::relay::BroadcastRelay;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers the connection with the relay (Connected).
/// - Dispatches each text frame in arrival order.
/// - Forwards events from the connection's outbound queue to the client.
/// - On close, error, or a failed write, disconnects from the relay (Closed).
pub async fn run_connection(socket: WebSocket, relay: Arc<BroadcastRelay>) {
    let (connection_id, mut outbound) = match relay.connect().await {
        Ok(accepted) => accepted,
        Err(err) => {
            tracing::error!(kind = err.kind(), %err, "refusing connection");
            return;
        }
    };

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let outcome = match decode_client_event(&text) {
                            Ok(event) => relay.handle(connection_id, event).await,
                            Err(err) => Err(err),
                        };
                        if let Err(err) = outcome {
                            tracing::debug!(%connection_id, kind = err.kind(), %err, "inbound frame ignored");
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%connection_id, %err, "ws read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Event queued by the relay
            event = outbound.recv() => {
                let Some(event) = event else {
                    break;
                };
                match encode_server_event(&event) {
                    Ok(json) => {
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%connection_id, kind = err.kind(), %err, "dropping unencodable event");
                    }
                }
            }
        }
    }

    relay.disconnect(connection_id).await;
    tracing::debug!(%connection_id, "ws connection closed");
}
