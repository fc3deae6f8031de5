//! `EventHubClient` builder and the shared client handle.
//!
//! This is the entry point for an application talking to EventHub. It ties
//! together all the layers: store → transport → session.

use std::sync::{Arc, Weak};
use std::time::Duration;

use eventhub_protocol::{Claims, Role};
use eventhub_session::{
    Session, SessionConfig, SessionManager, register_account,
};
use eventhub_store::{FileTokenStore, TokenStore};
use eventhub_transport::HttpClient;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::{ClientConfig, EventHubError};

type Manager<S> = SessionManager<S, HttpClient<S>>;

/// Builder for configuring and starting an EventHub client.
///
/// # Example
///
/// ```rust,no_run
/// use eventhub::prelude::*;
///
/// # fn main() -> Result<(), EventHubError> {
/// let client = EventHubClient::builder()
///     .api_url("https://events.example.com/api/v1")
///     .build()?;
/// println!("{:?}", client.session());
/// # Ok(())
/// # }
/// ```
pub struct EventHubClientBuilder {
    config: ClientConfig,
}

impl EventHubClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Starts from an existing configuration, e.g. [`ClientConfig::from_env`].
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Sets the API base URL.
    pub fn api_url(mut self, url: &str) -> Self {
        self.config.api_url = url.to_string();
        self
    }

    /// Sets the directory the credential file lives in.
    pub fn token_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.config.token_dir = dir.into();
        self
    }

    /// Sets the name of the credential entry.
    pub fn token_key(mut self, key: &str) -> Self {
        self.config.token_key = key.to_string();
        self
    }

    /// Sets a per-request timeout on the HTTP client.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    /// Builds a client backed by a [`FileTokenStore`] and bootstraps its
    /// session from whatever credential is on disk.
    pub fn build(self) -> Result<EventHubClient<FileTokenStore>, EventHubError> {
        let store = FileTokenStore::new(
            self.config.token_dir.clone(),
            self.config.token_key.clone(),
        );
        self.build_with_store(Arc::new(store))
    }

    /// Builds a client around a caller-supplied store and bootstraps.
    pub fn build_with_store<S: TokenStore>(
        self,
        store: Arc<S>,
    ) -> Result<EventHubClient<S>, EventHubError> {
        let mut http_builder = reqwest::Client::builder();
        if let Some(timeout) = self.config.request_timeout {
            http_builder = http_builder.timeout(timeout);
        }
        let http_client = http_builder.build().map_err(|e| {
            EventHubError::Config(format!("cannot build HTTP client: {e}"))
        })?;

        let http =
            HttpClient::with_client(&self.config.api_url, http_client, store.clone())?;

        let mut manager =
            SessionManager::new(store, http.clone(), self.config.session.clone());
        let session = manager.bootstrap();
        let watch = manager.subscribe();

        tracing::info!(
            api = %http.base_url(),
            ?session,
            "EventHub client ready"
        );

        Ok(EventHubClient {
            http,
            manager: Arc::new(Mutex::new(manager)),
            watch,
            expiry_check_interval: self.config.session.expiry_check_interval,
        })
    }
}

impl Default for EventHubClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A ready EventHub client.
///
/// Cheap to clone; clones share the same session and store. Reads
/// ([`session`](Self::session), [`subscribe`](Self::subscribe)) never wait
/// on an in-flight login.
pub struct EventHubClient<S: TokenStore = FileTokenStore> {
    http: HttpClient<S>,
    manager: Arc<Mutex<Manager<S>>>,
    watch: watch::Receiver<Session>,
    expiry_check_interval: Option<Duration>,
}

impl<S: TokenStore> Clone for EventHubClient<S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            manager: Arc::clone(&self.manager),
            watch: self.watch.clone(),
            expiry_check_interval: self.expiry_check_interval,
        }
    }
}

impl EventHubClient<FileTokenStore> {
    /// Creates a new builder.
    pub fn builder() -> EventHubClientBuilder {
        EventHubClientBuilder::new()
    }

    /// Builds a file-backed client straight from a configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self, EventHubError> {
        EventHubClientBuilder::from_config(config).build()
    }
}

impl<S: TokenStore> EventHubClient<S> {
    /// Builds a client around `store` from a configuration.
    pub fn with_store(
        config: ClientConfig,
        store: Arc<S>,
    ) -> Result<Self, EventHubError> {
        EventHubClientBuilder::from_config(config).build_with_store(store)
    }

    /// The current session.
    pub fn session(&self) -> Session {
        self.watch.borrow().clone()
    }

    /// A receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.watch.clone()
    }

    /// The authenticated request pipeline, for calling the rest of the API.
    pub fn http(&self) -> &HttpClient<S> {
        &self.http
    }

    /// Logs in. See [`SessionManager::login`].
    pub async fn login(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Claims, EventHubError> {
        let mut manager = self.manager.lock().await;
        Ok(manager.login(identifier, secret).await?)
    }

    /// Creates an account without logging in.
    pub async fn register(
        &self,
        identifier: &str,
        secret: &str,
        role: Role,
    ) -> Result<(), EventHubError> {
        // Doesn't touch the session; no lock.
        Ok(register_account(&self.http, identifier, secret, role).await?)
    }

    /// Clears the credential and goes anonymous.
    pub async fn logout(&self) {
        self.manager.lock().await.logout();
    }

    /// Demotes the session if its credential has expired. Returns `true`
    /// if it did.
    pub async fn check_expiry(&self) -> bool {
        self.manager.lock().await.check_expiry()
    }

    /// Claims behind the active session, if any.
    pub async fn claims(&self) -> Option<Claims> {
        self.manager.lock().await.claims().cloned()
    }

    /// Starts a background task that calls
    /// [`check_expiry`](Self::check_expiry) every
    /// `expiry_check_interval`.
    ///
    /// Returns `None` when the interval is disabled (`None` or zero). The
    /// task holds only a weak reference and ends by itself once every
    /// clone of the client has been dropped. Must be called from within a tokio runtime.
    pub fn spawn_expiry_watch(&self) -> Option<JoinHandle<()>> {
        let period = self.expiry_check_interval.filter(|d| !d.is_zero())?;
        let manager = Arc::downgrade(&self.manager);
        Some(tokio::spawn(expiry_watch(manager, period)))
    }
}

async fn expiry_watch<S: TokenStore>(manager: Weak<Mutex<Manager<S>>>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately; bootstrap just checked.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(manager) = manager.upgrade() else {
            tracing::debug!("client dropped, stopping expiry watch");
            return;
        };
        let expired = manager.lock().await.check_expiry();
        if expired {
            tracing::debug!("expiry watch demoted the session");
        }
    }
}
