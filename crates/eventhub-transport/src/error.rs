/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The base URL or a request path couldn't be turned into a URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request never produced a response (DNS, connect, TLS,
    /// timeout) or the response body couldn't be read or decoded.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    ///
    /// `message` is the server's own explanation when it gave one; see
    /// [`error_message`](crate::error_message).
    #[error("server returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
}

impl TransportError {
    /// The HTTP status, if the server got far enough to send one.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status(),
            Self::InvalidUrl(_) => None,
        }
    }
}
