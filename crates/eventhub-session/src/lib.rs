//! Client session management for EventHub.
//!
//! This crate decides who the user is:
//!
//! 1. **Bootstrap**: derive the initial session from the stored
//!    credential ([`SessionManager::bootstrap`])
//! 2. **Authentication**: log in, register, log out through an
//!    [`AuthBackend`]
//! 3. **Expiry**: demote an active session once its credential runs out
//!    ([`SessionManager::check_expiry`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Application (above)  ← reads Session, calls login/logout
//!     ↕
//! Session Layer (this crate)  ← owns the Session and the credential lifecycle
//!     ↕
//! Transport / Store / Protocol (below)  ← HTTP, persistence, decoding
//! ```

#![allow(async_fn_in_trait)]

mod backend;
mod error;
mod manager;
mod session;

pub use backend::{AuthBackend, LOGIN_PATH, REGISTER_PATH};
pub use error::SessionError;
pub use manager::{SessionManager, register_account};
pub use session::{Session, SessionConfig, SessionEvent};
