//! Unified error type for the EventHub client.

use eventhub_protocol::ProtocolError;
use eventhub_session::SessionError;
use eventhub_store::StoreError;
use eventhub_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `eventhub` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum EventHubError {
    /// A configuration value couldn't be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A credential couldn't be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The token store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An HTTP request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A session operation failed (rejected login, bad token, ...).
    #[error(transparent)]
    Session(#[from] SessionError),
}
