//! Error types for the protocol layer.
//!
//! Each crate in EventHub defines its own error enum. When you see a
//! `ProtocolError`, you know the credential itself is the problem, not
//! the network or the disk.

/// Errors that can occur while parsing or decoding a credential.
///
/// Every step of [`decode`](crate::decode) has its own variant so logs
/// say exactly where a bad token fell over. Callers usually don't care
/// which one it was: any `ProtocolError` means "treat this credential as
/// unusable".
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The credential is not three non-empty, dot-separated segments.
    ///
    /// The `usize` is how many segments were found.
    #[error("malformed credential: expected 3 segments, found {0}")]
    MalformedCredential(usize),

    /// The payload segment is not valid base64url.
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload bytes are not valid UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The payload text is not a JSON object of the expected shape.
    #[error("payload is not a valid claims record: {0}")]
    Json(#[from] serde_json::Error),

    /// A claim the client depends on is absent.
    ///
    /// A token without a subject identity is as useless to the client
    /// as one that didn't decode at all.
    #[error("missing claim: {0}")]
    MissingClaim(&'static str),

    /// A claim is present but its value can't be represented.
    #[error("invalid claim: {0}")]
    InvalidClaim(&'static str),
}
