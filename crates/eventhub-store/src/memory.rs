//! In-process token store.

use eventhub_protocol::Credential;
use parking_lot::RwLock;

use crate::{StoreError, TokenStore};

/// A [`TokenStore`] that keeps the credential in memory.
///
/// Nothing survives the process, so this is for tests and for hosts that
/// manage persistence themselves. It never fails.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<Credential>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `credential`.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: RwLock::new(Some(credential)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.slot.read().clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        *self.slot.write() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.write() = None;
        Ok(())
    }
}
