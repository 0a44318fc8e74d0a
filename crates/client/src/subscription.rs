//! Realtime change-feed subscriber.
//!
//! [`RealtimeSubscription`] opens `/api/realtime` over WebSocket, turns
//! change frames into [`ChangeNotice`]s, and keeps reconnecting with
//! exponential backoff until cancelled.

use std::time::Duration;

use futures::StreamExt;
use promptcubic_core::change::{ChangeKind, FeedMessage};
use promptcubic_core::types::{DbId, Timestamp};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// One committed change to one of the caller's rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeNotice {
    pub event: ChangeKind,
    pub table: String,
    pub id: DbId,
    pub timestamp: Timestamp,
}

/// Tunable parameters for the exponential-backoff strategy.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay, clamped to [`ReconnectConfig::max_delay`].
pub fn next_delay(current: Duration, config: &ReconnectConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Build the realtime URL from an HTTP base URL.
///
/// `http` becomes `ws` and `https` becomes `wss`; the token travels in the
/// `access_token` query parameter.
pub fn realtime_url(base_url: &str, access_token: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(base_url)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(ClientError::Connection(format!(
                "Unsupported URL scheme: {other}"
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|()| ClientError::Connection(format!("Cannot use scheme {scheme}")))?;
    url.set_path("/api/realtime");
    url.query_pairs_mut()
        .clear()
        .append_pair("access_token", access_token);
    Ok(url)
}

/// Interpret one text frame. Only change frames yield a notice; anything
/// unrecognised is skipped.
pub fn parse_frame(text: &str) -> Option<ChangeNotice> {
    match serde_json::from_str::<FeedMessage>(text) {
        Ok(FeedMessage::PostgresChanges {
            event,
            table,
            id,
            timestamp,
        }) => Some(ChangeNotice {
            event,
            table,
            id,
            timestamp,
        }),
        Ok(FeedMessage::Subscribed { channel }) => {
            tracing::info!(%channel, "Realtime subscription confirmed");
            None
        }
        Ok(FeedMessage::Ping | FeedMessage::Pong) => None,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unrecognised realtime frame");
            None
        }
    }
}

/// How a live connection ended.
enum Disconnect {
    Cancelled,
    Dropped,
    ReceiverGone,
}

pub struct RealtimeSubscription {
    url: Url,
    config: ReconnectConfig,
}

impl RealtimeSubscription {
    pub fn new(base_url: &str, access_token: &str) -> Result<Self, ClientError> {
        Ok(Self {
            url: realtime_url(base_url, access_token)?,
            config: ReconnectConfig::default(),
        })
    }

    pub fn with_config(mut self, config: ReconnectConfig) -> Self {
        self.config = config;
        self
    }

    /// Open the socket once.
    async fn connect(&self) -> Result<WsStream, ClientError> {
        let (ws_stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| ClientError::Connection(format!("Failed to open realtime feed: {e}")))?;
        Ok(ws_stream)
    }

    /// Forward change notices to `tx` until `cancel` fires or `tx` is closed.
    ///
    /// A dropped or refused connection is retried after a backoff delay
    /// that resets once a connection succeeds.
    pub async fn run(self, tx: mpsc::Sender<ChangeNotice>, cancel: CancellationToken) {
        let mut delay = self.config.initial_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let connected = tokio::select! {
                _ = cancel.cancelled() => return,
                result = self.connect() => result,
            };

            match connected {
                Ok(mut ws_stream) => {
                    tracing::info!(attempt, "Connected to realtime feed");
                    attempt = 0;
                    delay = self.config.initial_delay;

                    match pump(&mut ws_stream, &tx, &cancel).await {
                        Disconnect::Cancelled => {
                            let _ = ws_stream.close(None).await;
                            return;
                        }
                        Disconnect::ReceiverGone => {
                            tracing::debug!("Notice receiver dropped, closing realtime feed");
                            let _ = ws_stream.close(None).await;
                            return;
                        }
                        Disconnect::Dropped => {
                            tracing::info!("Realtime feed dropped, reconnecting");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Realtime connect failed",
                    );
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            delay = next_delay(delay, &self.config);
        }
    }
}

/// Read frames until the connection ends.
async fn pump(
    ws_stream: &mut WsStream,
    tx: &mpsc::Sender<ChangeNotice>,
    cancel: &CancellationToken,
) -> Disconnect {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => return Disconnect::Cancelled,
            next = ws_stream.next() => next,
        };

        match next {
            Some(Ok(Message::Text(text))) => {
                if let Some(notice) = parse_frame(&text) {
                    tracing::debug!(
                        event = %notice.event,
                        id = %notice.id,
                        "Change received",
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => return Disconnect::Cancelled,
                        sent = tx.send(notice) => {
                            if sent.is_err() {
                                return Disconnect::ReceiverGone;
                            }
                        }
                    }
                }
            }
            Some(Ok(Message::Close(frame))) => {
                tracing::info!(?frame, "Realtime feed closed by server");
                return Disconnect::Dropped;
            }
            // Pings are answered by tungstenite; nothing else is expected.
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Realtime receive error");
                return Disconnect::Dropped;
            }
            None => return Disconnect::Dropped,
        }
    }
}
