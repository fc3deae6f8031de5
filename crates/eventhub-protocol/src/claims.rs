//! The token decoder: credential in, claims out.
//!
//! [`decode`] is a pure function. It does no I/O, touches no clock, and
//! never panics: every way a token can be broken maps to a
//! [`ProtocolError`] variant. That makes it trivial to unit-test and safe
//! to call on anything read back from disk.
//!
//! # Algorithm
//!
//! ```text
//! "hhh.ppp.sss"
//!      │
//!      ▼  split on '.' (exactly 3 non-empty segments)
//!     ppp
//!      │  '-' → '+', '_' → '/', pad with '=' to a multiple of 4
//!      ▼
//!  base64 (standard alphabet) → bytes → UTF-8 → JSON object
//!      │
//!      ▼
//!  Claims { subject, role, expiry }
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::split_segments;
use crate::{ProtocolError, Role, SubjectId};

/// The claim set the client reads out of a credential.
///
/// There is no public constructor: the only way to obtain
/// `Claims` is [`decode`]. Code that holds a `Claims` therefore knows it
/// came from a real token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    subject: SubjectId,
    role: Role,
    expiry: Option<DateTime<Utc>>,
}

impl Claims {
    /// Who the token was issued to (the `id` claim).
    pub fn subject(&self) -> SubjectId {
        self.subject
    }

    /// What the user is allowed to see (the `role` claim).
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// When the token stops being valid (the `exp` claim), if it says.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// Returns `true` if the token is no longer valid at `now`.
    ///
    /// A token without an expiry counts as expired: the client has no
    /// way to know how long it's good for.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry <= now,
            None => true,
        }
    }
}

/// The payload as it appears on the wire, before validation.
///
/// Everything is optional here so a missing claim produces a precise
/// [`ProtocolError::MissingClaim`] instead of a generic JSON error.
/// Unknown claims (`iat`, `iss`, ...) are ignored.
#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    id: Option<SubjectId>,
    #[serde(default)]
    role: Option<Role>,
    /// Seconds since the epoch. JWT allows fractional values, so read
    /// it as a float.
    #[serde(default)]
    exp: Option<f64>,
}

/// Decodes the claims out of a credential string.
///
/// No signature check is performed. See the crate docs.
///
/// # Errors
/// - [`ProtocolError::MalformedCredential`]: not three non-empty segments
/// - [`ProtocolError::Base64`] / [`ProtocolError::Utf8`] /
///   [`ProtocolError::Json`]: the payload segment is unreadable
/// - [`ProtocolError::MissingClaim`]: no `id` or no `role`
/// - [`ProtocolError::InvalidClaim`]: `exp` is outside the representable range
pub fn decode(credential: &str) -> Result<Claims, ProtocolError> {
    let [_, payload, _] = split_segments(credential)?;

    let bytes = STANDARD.decode(to_standard_base64(payload))?;
    let text = String::from_utf8(bytes)?;
    let raw: RawClaims = serde_json::from_str(&text)?;

    let subject = raw.id.ok_or(ProtocolError::MissingClaim("id"))?;
    let role = raw.role.ok_or(ProtocolError::MissingClaim("role"))?;
    let expiry = raw.exp.map(seconds_to_datetime).transpose()?;

    Ok(Claims {
        subject,
        role,
        expiry,
    })
}

/// Rewrites a base64url segment into padded standard base64.
fn to_standard_base64(segment: &str) -> String {
    let mut out: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while out.len() % 4 != 0 {
        out.push('=');
    }
    out
}

fn seconds_to_datetime(secs: f64) -> Result<DateTime<Utc>, ProtocolError> {
    let millis = secs * 1000.0;
    if !millis.is_finite()
        || millis < i64::MIN as f64
        || millis > i64::MAX as f64
    {
        return Err(ProtocolError::InvalidClaim("exp"));
    }
    DateTime::from_timestamp_millis(millis as i64)
        .ok_or(ProtocolError::InvalidClaim("exp"))
}

// =========================================================================
// Tests
// =========================================================================
