//! Error types for the session layer.

use eventhub_protocol::ProtocolError;
use eventhub_transport::{StatusCode, TransportError};

/// Errors that can occur during session management.
///
/// None of these ever leave the session in a worse state than it was
/// in before the failing call. `Display` gives a message fit to show the
/// user as-is.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The server refused the request: wrong password, duplicate email,
    /// bad role. `message` is the server's own wording.
    #[error("{message}")]
    AuthRejected { status: StatusCode, message: String },

    /// A login succeeded at the HTTP level but the response carried no
    /// token.
    #[error("no token returned")]
    MissingToken,

    /// A credential couldn't be decoded into usable claims.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] ProtocolError),

    /// A credential decoded fine but has already expired.
    #[error("token expired")]
    Expired,

    /// The backend couldn't be reached, or answered with something
    /// unreadable.
    #[error("backend unavailable: {0}")]
    Transport(TransportError),
}

/// A non-2xx status is the server saying no; anything else is the
/// network failing us.
impl From<TransportError> for SessionError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status { status, message } => {
                Self::AuthRejected { status, message }
            }
            other => Self::Transport(other),
        }
    }
}
