/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading, writing, or removing the backing file failed.
    #[error("token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Something is stored, but it isn't a well-formed credential.
    #[error("stored token is corrupt: {0}")]
    Corrupt(#[source] eventhub_protocol::ProtocolError),
}
