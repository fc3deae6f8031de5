//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use eventhub_session::SessionConfig;
use eventhub_store::DEFAULT_TOKEN_KEY;
use eventhub_transport::DEFAULT_API_URL;

use crate::EventHubError;

/// Environment variable overriding [`ClientConfig::api_url`].
pub const ENV_API_URL: &str = "EVENTHUB_API_URL";
/// Environment variable overriding [`ClientConfig::token_dir`].
pub const ENV_TOKEN_DIR: &str = "EVENTHUB_TOKEN_DIR";
/// Environment variable overriding [`ClientConfig::token_key`].
pub const ENV_TOKEN_KEY: &str = "EVENTHUB_TOKEN_KEY";
/// Environment variable setting [`ClientConfig::request_timeout`], in seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "EVENTHUB_REQUEST_TIMEOUT_SECS";

/// Everything needed to build an [`EventHubClient`](crate::EventHubClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `http://localhost:8080/api/v1`.
    pub api_url: String,

    /// Directory holding the persisted credential.
    pub token_dir: PathBuf,

    /// Name of the persisted credential entry inside `token_dir`.
    pub token_key: String,

    /// Per-request timeout handed to the HTTP client. `None` leaves it to
    /// the transport's defaults.
    pub request_timeout: Option<Duration>,

    /// Session behavior (expiry re-check interval).
    pub session: SessionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_dir: default_token_dir(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            request_timeout: None,
            session: SessionConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults, overridden by any `EVENTHUB_*` variables that are set.
    ///
    /// # Errors
    /// Returns [`EventHubError::Config`] if
    /// `EVENTHUB_REQUEST_TIMEOUT_SECS` isn't a whole number of seconds.
    pub fn from_env() -> Result<Self, EventHubError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through
    /// `lookup` instead of the process environment.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, EventHubError> {
        let mut config = Self::default();
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(dir) = lookup(ENV_TOKEN_DIR) {
            config.token_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup(ENV_TOKEN_KEY) {
            config.token_key = key;
        }
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                EventHubError::Config(format!(
                    "{ENV_REQUEST_TIMEOUT_SECS} must be a number of seconds, got {secs:?}"
                ))
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

/// `$HOME/.eventhub`, or `./.eventhub` when there is no home directory.
fn default_token_dir() -> PathBuf {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".eventhub")
}
