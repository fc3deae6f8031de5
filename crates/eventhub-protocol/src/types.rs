//! Core types shared by every EventHub layer.
//!
//! The bearer [`Credential`], the identity newtypes that claims decode
//! into, and the JSON bodies exchanged with the backend's `/auth`
//! endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The identity of an authenticated user, as issued by the backend.
///
/// A newtype around the backend's numeric user id. Wrapping it means a
/// subject can't be confused with an event id or a ticket count, even
/// though all three are integers on the wire.
///
/// `#[serde(transparent)]` keeps the wire form a bare number: the `id`
/// claim `42` decodes to `SubjectId(42)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub u64);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// The role a user holds.
///
/// The backend currently issues `organizer` or `participant`. Anything
/// else is kept verbatim in [`Role::Other`] rather than rejected, so a
/// newer server can add roles without breaking older clients.
///
/// Serde goes through `String` in both directions (`from`/`into`), which
/// is what lets unknown values land in `Other` instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Creates and manages events.
    Organizer,

    /// Browses events and reserves tickets.
    Participant,

    /// A role this client doesn't know about yet.
    Other(String),
}

impl Role {
    /// Returns the wire name of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Organizer => "organizer",
            Self::Participant => "participant",
            Self::Other(name) => name,
        }
    }

    /// Returns `true` for [`Role::Organizer`].
    pub fn is_organizer(&self) -> bool {
        matches!(self, Self::Organizer)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "organizer" => Self::Organizer,
            "participant" => Self::Participant,
            _ => Self::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// An opaque bearer token issued by the backend.
///
/// Structurally it's `header.payload.signature`, each segment base64url
/// encoded. Constructing a `Credential` through [`Credential::parse`]
/// guarantees exactly three non-empty segments; it says nothing about
/// whether the payload decodes (that's [`decode`](crate::decode)'s job).
///
/// `Debug` is redacted on purpose: a credential is a password-equivalent
/// and must not end up in logs. Use [`as_str`](Self::as_str) where the
/// raw value is actually needed (the `Authorization` header, the store).
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validates the segment structure and wraps the string.
    ///
    /// # Errors
    /// Returns [`ProtocolError::MalformedCredential`] unless `raw` has
    /// exactly three non-empty dot-separated segments.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ProtocolError> {
        let raw = raw.into();
        split_segments(&raw)?;
        Ok(Self(raw))
    }

    /// Returns the raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the credential and returns the raw token string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl FromStr for Credential {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Splits a token into its three segments.
///
/// Shared by [`Credential::parse`] and the decoder so both agree on what
/// "well-formed" means.
pub(crate) fn split_segments(
    raw: &str,
) -> Result<[&str; 3], ProtocolError> {
    let parts: Vec<&str> = raw.split('.').collect();
    match parts.as_slice() {
        [header, payload, signature]
            if !header.is_empty()
                && !payload.is_empty()
                && !signature.is_empty() =>
        {
            Ok([header, payload, signature])
        }
        _ => Err(ProtocolError::MalformedCredential(parts.len())),
    }
}

// ---------------------------------------------------------------------------
// Auth request/response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The account identifier (an email address).
    pub email: String,
    /// The account secret.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a successful `POST /auth/login` response.
///
/// `token` is optional because the client must cope with a 2xx that
/// carries no token at all and report it as a failed login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Body of `POST /auth/register`.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

// =========================================================================
// Tests
// =========================================================================
