use promptcubic_core::error::CoreError;

/// Errors surfaced by the client crate.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The server's `error` message, or the raw body if it had none.
        message: String,
    },

    /// A base URL could not be parsed or turned into a realtime URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The realtime socket could not be opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Local validation rejected the input before any request was made.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// HTTP status of an [`Api`](Self::Api) error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
