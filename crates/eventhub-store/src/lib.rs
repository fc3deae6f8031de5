//! Credential storage for the EventHub client.
//!
//! Provides the [`TokenStore`] trait: durable persistence of exactly one
//! named [`Credential`] across restarts of the client. Two implementations
//! ship with the crate:
//!
//! - [`FileTokenStore`]: one file per key inside a directory (feature
//!   `file`, on by default)
//! - [`MemoryTokenStore`]: process-local, for tests and embedding
//!
//! # Failure policy
//!
//! Store methods return `Result` so the cause of a failure can be logged.
//! An unreadable store ([`StoreError::Io`]) means "no credential stored":
//! a broken disk must never be worse than being logged out. A stored value
//! that isn't a credential ([`StoreError::Corrupt`]) is also never sent,
//! and the session layer clears it at start-up.

mod error;
#[cfg(feature = "file")]
mod file;
mod memory;

pub use error::StoreError;
#[cfg(feature = "file")]
pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use std::sync::Arc;

use eventhub_protocol::Credential;

/// The default name of the persisted entry.
pub const DEFAULT_TOKEN_KEY: &str = "jwtToken";

/// Persists a single credential.
///
/// Methods take `&self`: implementations use interior mutability so one
/// store can be shared (via `Arc`) between the session manager, which
/// writes it, and the request pipeline, which only reads it.
pub trait TokenStore: Send + Sync + 'static {
    /// Returns the stored credential, or `Ok(None)` if nothing is stored.
    fn load(&self) -> Result<Option<Credential>, StoreError>;

    /// Stores `credential`, replacing whatever was there.
    fn save(&self, credential: &Credential) -> Result<(), StoreError>;

    /// Removes the stored credential. Clearing an empty store is `Ok`.
    fn clear(&self) -> Result<(), StoreError>;
}

impl<S: TokenStore + ?Sized> TokenStore for Arc<S> {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        (**self).load()
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        (**self).save(credential)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// Loads a credential, folding every error into "absent".
///
/// This is how both the session layer and the request pipeline read the
/// store. The error is logged and dropped.
pub fn load_or_absent<S: TokenStore + ?Sized>(store: &S) -> Option<Credential> {
    match store.load() {
        Ok(credential) => credential,
        Err(e) => {
            tracing::warn!(error = %e, "token store unavailable, treating as empty");
            None
        }
    }
}
