//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`ChangeEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use promptcubic_core::change::ChangeKind;
use promptcubic_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ChangeEvent
// ---------------------------------------------------------------------------

/// A committed insert, update, or delete on a watched table.
///
/// Carries only identifiers: subscribers re-read whatever they need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Table the row belongs to, e.g. `"prompts"`.
    pub table: String,
    pub kind: ChangeKind,
    /// Primary key of the changed row.
    pub record_id: DbId,
    /// Owner of the changed row. Only this user's subscribers are told.
    pub user_id: DbId,
    /// When the event was observed (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(table: impl Into<String>, kind: ChangeKind, record_id: DbId, user_id: DbId) -> Self {
        Self {
            table: table.into(),
            kind,
            record_id,
            user_id,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`ChangeEvent`].
///
/// # Usage
///
/// ```rust
/// use promptcubic_core::change::ChangeKind;
/// use promptcubic_events::bus::{ChangeEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// let id = uuid::Uuid::new_v4();
/// bus.publish(ChangeEvent::new("prompts", ChangeKind::Insert, id, id));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: ChangeEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
