//! Vocabulary of the live change feed.
//!
//! The database announces every committed write to `prompts` on a
//! notification channel; the API relays it to subscribed clients, which
//! re-fetch their list on receipt.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Table whose writes are announced on the feed.
pub const TABLE_PROMPTS: &str = "prompts";

/// Postgres `NOTIFY` channel written by the `notify_prompt_change` trigger.
pub const PROMPT_CHANGES_CHANNEL: &str = "prompt_changes";

/// Logical channel name announced to WebSocket subscribers.
pub const FEED_CHANNEL: &str = "prompts_changes";

/// Kind of row change, spelled the way Postgres names the trigger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text frame exchanged on the realtime WebSocket, tagged by `"type"`.
///
/// ```text
/// {"type":"subscribed","channel":"prompts_changes"}
/// {"type":"postgres_changes","event":"INSERT","table":"prompts","id":"…","timestamp":"…"}
/// {"type":"ping"} / {"type":"pong"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    /// Sent once by the server after the upgrade succeeds.
    Subscribed { channel: String },
    /// A row owned by the receiving user changed.
    PostgresChanges {
        event: ChangeKind,
        table: String,
        id: DbId,
        timestamp: Timestamp,
    },
    /// Application-level keepalive from the client.
    Ping,
    /// Reply to [`FeedMessage::Ping`].
    Pong,
}
