//! # EventHub
//!
//! Client session core for the EventHub events and reservations API.
//!
//! EventHub keeps track of who the user is. It persists the bearer
//! credential the server hands out at login, derives a [`Session`] from it
//! on every start, and attaches it to every API request, so application
//! code only ever asks "who is logged in?" and calls the API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eventhub::prelude::*;
//!
//! # async fn run() -> Result<(), EventHubError> {
//! let client = EventHubClient::from_config(ClientConfig::from_env()?)?;
//! client.spawn_expiry_watch();
//!
//! if !client.session().is_active() {
//!     client.login("organizer@example.com", "secret").await?;
//! }
//! let events: serde_json::Value = client.http().get_json("/events").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! | Crate | Role |
//! |-------|------|
//! | `eventhub-protocol` | credential and claims types, token decoding |
//! | `eventhub-store` | where the credential is persisted |
//! | `eventhub-transport` | HTTP pipeline that attaches the bearer header |
//! | `eventhub-session` | the session state machine |

mod client;
mod config;
mod error;
mod telemetry;

pub use client::{EventHubClient, EventHubClientBuilder};
pub use config::{
    ClientConfig, ENV_API_URL, ENV_REQUEST_TIMEOUT_SECS, ENV_TOKEN_DIR,
    ENV_TOKEN_KEY,
};
pub use error::EventHubError;
pub use telemetry::init_tracing;

pub use eventhub_protocol as protocol;
pub use eventhub_session as session;
pub use eventhub_store as store;
pub use eventhub_transport as transport;

pub use eventhub_protocol::{Claims, Credential, Role, SubjectId};
pub use eventhub_session::{Session, SessionConfig};

/// Commonly used types, for glob import.
pub mod prelude {
    pub use crate::{
        Claims, ClientConfig, Credential, EventHubClient, EventHubError, Role,
        Session, SessionConfig, SubjectId,
    };
    pub use eventhub_store::{FileTokenStore, MemoryTokenStore, TokenStore};
}
