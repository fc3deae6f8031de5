//! Authenticated request pipeline for the EventHub client.
//!
//! [`HttpClient`] wraps a `reqwest::Client` and a shared
//! [`TokenStore`](eventhub_store::TokenStore). Every request it builds
//! reads the store first and, if a credential is there, carries it as
//! `Authorization: Bearer <credential>`. Call sites never touch the
//! header themselves.
//!
//! The pipeline reads the *store*, not the session. Whatever is persisted
//! is what gets sent, even if the session layer hasn't caught up yet.
//!
//! There is no retry, no refresh, and no backoff. A 401 comes back to the
//! caller as [`TransportError::Status`] like any other non-2xx response.

mod client;
mod error;

pub use client::{HttpClient, error_message};
pub use error::TransportError;

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Re-exported so callers can name methods and status codes without
/// depending on `reqwest` directly.
pub use reqwest::{Method, StatusCode};
