use booksummary_core::counter::MirrorError;

/// Errors from the REST and realtime client layers.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The caller must sign in first. Carries the server's login URL.
    #[error("login required")]
    LoginRequired { login_url: Option<String> },

    /// Failed to establish the WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Unexpected frame or closed socket on an established connection.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server refused a subscription.
    #[error("Subscription rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Mirror(#[from] MirrorError),
}
