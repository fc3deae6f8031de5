//! File-backed token store.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use eventhub_protocol::Credential;

use crate::{DEFAULT_TOKEN_KEY, StoreError, TokenStore};

/// A [`TokenStore`] that keeps the credential in `<dir>/<key>`.
///
/// Writes go to `<key>.tmp` first and are renamed into place, so a crash
/// mid-write leaves either the old credential or the new one, never half
/// of each. On Unix the file is created with mode `0600`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
    key: String,
}

impl FileTokenStore {
    /// Creates a store for entry `key` inside `dir`.
    ///
    /// Nothing touches the filesystem until the first `save`.
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
        }
    }

    /// Creates a store using [`DEFAULT_TOKEN_KEY`].
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, DEFAULT_TOKEN_KEY)
    }

    /// The full path of the persisted entry.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.key)
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!("{}.tmp", self.key))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        let text = match fs::read_to_string(self.path()) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let raw = text.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        Credential::parse(raw).map(Some).map_err(StoreError::Corrupt)
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let tmp = self.temp_path();
        {
            let mut file = open_private(&tmp)?;
            file.write_all(credential.as_str().as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, self.path())?;

        tracing::debug!(path = %self.path().display(), "credential saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(self.path()) {
            Ok(()) => {
                tracing::debug!(path = %self.path().display(), "credential removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
