//! Credential and claims handling for the EventHub client.
//!
//! This crate defines the data that the session layer reasons about:
//!
//! - **Types** ([`Credential`], [`SubjectId`], [`Role`], [`LoginRequest`],
//!   etc.): the bearer token itself and the request/response bodies of the
//!   backend's `/auth` endpoints.
//! - **Decoder** ([`decode`], [`Claims`]): turns a credential into the
//!   claims the UI gates on, without contacting the server.
//! - **Errors** ([`ProtocolError`]): what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits below storage and transport. It doesn't know
//! where a credential came from or where it will be sent; it only knows how
//! to read one.
//!
//! ```text
//! Store (persisted string) → Protocol (Credential → Claims) → Session (Active/Anonymous)
//! ```
//!
//! # Trust
//!
//! Nothing here verifies a signature. Decoded claims are good enough to
//! decide what to *show*; every authorization decision is re-enforced by
//! the server that issued the token.

mod claims;
mod error;
mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use claims::{Claims, decode};
pub use error::ProtocolError;
pub use types::{
    Credential, LoginRequest, LoginResponse, RegisterRequest, Role, SubjectId,
};
