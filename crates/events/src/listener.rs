//! Bridge from Postgres `NOTIFY` to the in-process [`EventBus`].
//!
//! The `notify_prompt_change` trigger publishes a small JSON document on the
//! `prompt_changes` channel after every committed write to `prompts`. Because
//! the trigger fires for every writer, edits made from other sessions or
//! other server instances reach subscribers too.

use std::sync::Arc;
use std::time::Duration;

use promptcubic_core::change::{ChangeKind, PROMPT_CHANGES_CHANNEL, TABLE_PROMPTS};
use promptcubic_core::types::DbId;
use promptcubic_db::DbPool;
use serde::Deserialize;
use sqlx::postgres::PgListener;
use tokio_util::sync::CancellationToken;

use crate::bus::{ChangeEvent, EventBus};

/// Errors produced while decoding a notification.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("Malformed change payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Wire shape written by the `notify_prompt_change` trigger.
#[derive(Debug, Deserialize)]
struct NotifyPayload {
    op: ChangeKind,
    id: DbId,
    user_id: DbId,
}

/// Decode one `prompt_changes` payload into a [`ChangeEvent`].
pub fn parse_notification(payload: &str) -> Result<ChangeEvent, ListenerError> {
    let raw: NotifyPayload = serde_json::from_str(payload)?;
    Ok(ChangeEvent::new(TABLE_PROMPTS, raw.op, raw.id, raw.user_id))
}

/// Backoff parameters for (re)connecting the listener.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: u32,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2,
        }
    }
}

/// Calculate the next backoff delay, clamped to `max_delay`.
pub fn next_delay(current: Duration, config: &ListenerConfig) -> Duration {
    current
        .saturating_mul(config.multiplier)
        .min(config.max_delay)
}

/// Listens on `prompt_changes` and republishes each notification on the bus.
pub struct ChangeListener {
    pool: DbPool,
    bus: Arc<EventBus>,
    config: ListenerConfig,
}

impl ChangeListener {
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self {
            pool,
            bus,
            config: ListenerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ListenerConfig) -> Self {
        self.config = config;
        self
    }

    /// Run until `cancel` fires.
    ///
    /// Connection failures are logged and retried with exponential backoff;
    /// the delay resets after every successful `LISTEN`.
    pub async fn run(self, cancel: CancellationToken) {
        let mut delay = self.config.initial_delay;

        loop {
            match self.listen(&cancel, &mut delay).await {
                Ok(()) => {
                    tracing::info!("Change listener cancelled");
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Change listener connection failed, retrying"
                    );
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Change listener cancelled");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
            delay = next_delay(delay, &self.config);
        }
    }

    /// Connect, `LISTEN`, and pump notifications until cancelled (`Ok`) or
    /// the connection fails (`Err`).
    async fn listen(
        &self,
        cancel: &CancellationToken,
        delay: &mut Duration,
    ) -> Result<(), sqlx::Error> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(PROMPT_CHANGES_CHANNEL).await?;
        *delay = self.config.initial_delay;
        tracing::info!(channel = PROMPT_CHANGES_CHANNEL, "Change listener subscribed");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                notification = listener.recv() => {
                    let notification = notification?;
                    self.forward(notification.payload());
                }
            }
        }
    }

    fn forward(&self, payload: &str) {
        match parse_notification(payload) {
            Ok(event) => {
                tracing::debug!(
                    table = %event.table,
                    kind = %event.kind,
                    record_id = %event.record_id,
                    user_id = %event.user_id,
                    "Change received"
                );
                self.bus.publish(event);
            }
            Err(e) => {
                tracing::warn!(error = %e, payload, "Skipping malformed change notification");
            }
        }
    }
}
