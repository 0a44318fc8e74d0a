use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use promptcubic_core::change::{FeedMessage, FEED_CHANNEL};
use promptcubic_core::types::DbId;

use crate::middleware::auth::RealtimeAuth;
use crate::state::AppState;
use crate::ws::manager::{feed_frame, WsManager};

/// GET /api/realtime
///
/// Authenticates the caller, then upgrades the connection to WebSocket.
/// After the upgrade the connection is registered with `WsManager` under the
/// caller's id and receives that user's change notifications.
pub async fn ws_handler(
    RealtimeAuth(auth): RealtimeAuth,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager, auth.user_id))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager` and confirms the subscription.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Answers application-level pings on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user_id: DbId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, %user_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone(), user_id).await;
    ws_manager
        .send_to_conn(
            &conn_id,
            feed_frame(&FeedMessage::Subscribed {
                channel: FEED_CHANNEL.to_string(),
            }),
        )
        .await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                if let Ok(FeedMessage::Ping) = serde_json::from_str::<FeedMessage>(text.as_str()) {
                    ws_manager
                        .send_to_conn(&conn_id, feed_frame(&FeedMessage::Pong))
                        .await;
                } else {
                    tracing::debug!(conn_id = %conn_id, "Ignoring unexpected text frame");
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
