//! Fixture helpers for building unsigned credentials.
//!
//! Only compiled for this crate's own tests or with the `test-util`
//! feature. The tokens carry a fixed header and a dummy signature; they
//! are fine for the client (which never verifies signatures) and useless
//! against a real server.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// `{"alg":"HS256","typ":"JWT"}`, pre-encoded.
const HEADER: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";

/// Placeholder signature segment.
const SIGNATURE: &str = "c2lnbmF0dXJl";

/// Builds `header.payload.signature` around a JSON claims record.
///
/// ```rust,ignore
/// use eventhub_protocol::{decode, testing::mint, SubjectId};
///
/// let token = mint(&serde_json::json!({ "id": 42, "role": "organizer", "exp": 4102444800u64 }));
/// assert_eq!(decode(&token).unwrap().subject(), SubjectId(42));
/// ```
pub fn mint(claims: &serde_json::Value) -> String {
    mint_raw(claims.to_string().as_bytes())
}

/// Builds a token whose payload segment encodes `payload` verbatim.
///
/// Useful for payloads that aren't JSON, or aren't even UTF-8.
pub fn mint_raw(payload: &[u8]) -> String {
    format!("{HEADER}.{}.{SIGNATURE}", URL_SAFE_NO_PAD.encode(payload))
}
