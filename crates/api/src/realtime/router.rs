//! Event-to-subscriber routing.
//!
//! [`ChangeRouter`] consumes the change bus and forwards each event to the
//! WebSocket connections of the row's owner, and to nobody else.

use std::sync::Arc;

use promptcubic_core::change::FeedMessage;
use promptcubic_events::ChangeEvent;
use tokio::sync::broadcast;

use crate::ws::manager::feed_frame;
use crate::ws::WsManager;

/// Routes change events to their owners' realtime connections.
pub struct ChangeRouter {
    ws_manager: Arc<WsManager>,
}

/// Build the wire message announced for `event`.
pub fn feed_message(event: &ChangeEvent) -> FeedMessage {
    FeedMessage::PostgresChanges {
        event: event.kind,
        table: event.table.clone(),
        id: event.record_id,
        timestamp: event.timestamp,
    }
}

impl ChangeRouter {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the main routing loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](promptcubic_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<ChangeEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.route(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Subscribers re-fetch on any change, so a skipped event
                    // only matters if nothing newer follows.
                    tracing::warn!(skipped = n, "Change router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, change router shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver one event to every connection of its owner.
    pub async fn route(&self, event: &ChangeEvent) {
        let frame = feed_frame(&feed_message(event));
        let delivered = self.ws_manager.send_to_user(event.user_id, frame).await;
        tracing::debug!(
            table = %event.table,
            kind = %event.kind,
            record_id = %event.record_id,
            user_id = %event.user_id,
            delivered,
            "Change routed"
        );
    }
}
