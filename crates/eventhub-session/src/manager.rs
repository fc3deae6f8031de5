//! The session manager: the single owner of the client's session.
//!
//! It's responsible for:
//! - Deriving the initial session from the stored credential (bootstrap)
//! - Logging in, registering, and logging out through an [`AuthBackend`]
//! - Clearing the store whenever the credential turns out to be unusable
//! - Publishing every session change to subscribers
//!
//! # Concurrency note
//!
//! Mutating methods take `&mut self`, so there is exactly one writer at a
//! time by construction. A host that shares the manager between tasks
//! wraps it in a `tokio::sync::Mutex`. Readers don't need the lock: they
//! hold a `watch::Receiver` from [`SessionManager::subscribe`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use eventhub_protocol::{
    Claims, Credential, LoginRequest, RegisterRequest, Role, decode,
};
use eventhub_store::{StoreError, TokenStore};
use tokio::sync::watch;

use crate::{
    AuthBackend, Session, SessionConfig, SessionError, SessionEvent,
};

/// Owns the [`Session`] value and the credential's lifecycle.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ [Pending] ──bootstrap()──→ [Active] or [Anonymous]
///                                          │  ↑          │  ↑
///                          logout() / check_expiry()      │  │
///                                          ↓  │          │  │
///                                     [Anonymous] ──login()──┘
/// ```
///
/// `register()` never changes the session; call `login()` afterwards.
pub struct SessionManager<S: TokenStore, B: AuthBackend> {
    store: Arc<S>,
    backend: B,
    /// Claims behind the current `Active` session, kept for expiry
    /// re-checks. `None` whenever the session isn't active.
    claims: Option<Claims>,
    /// Holds the current session. Subscribers get cheap read-only views.
    tx: watch::Sender<Session>,
    config: SessionConfig,
}

impl<S: TokenStore, B: AuthBackend> SessionManager<S, B> {
    /// Creates a manager in the `Pending` state.
    ///
    /// Nothing is read from the store until [`bootstrap`](Self::bootstrap).
    pub fn new(store: Arc<S>, backend: B, config: SessionConfig) -> Self {
        let (tx, _) = watch::channel(Session::Pending);
        Self {
            store,
            backend,
            claims: None,
            tx,
            config,
        }
    }

    /// Resolves the session from the stored credential, as of now.
    pub fn bootstrap(&mut self) -> Session {
        self.bootstrap_at(Utc::now())
    }

    /// Resolves the session from the stored credential, as of `now`.
    ///
    /// - no credential → `Anonymous`
    /// - undecodable or expired credential → store cleared, `Anonymous`
    /// - otherwise → `Active`
    ///
    /// Never fails: a store that can't be read counts as empty.
    pub fn bootstrap_at(&mut self, now: DateTime<Utc>) -> Session {
        match self.restore(now) {
            Ok(claims) => {
                tracing::info!(
                    subject = %claims.subject(),
                    role = %claims.role(),
                    "session restored"
                );
                self.apply(SessionEvent::Restored(claims));
            }
            Err(SessionError::MissingToken) => {
                tracing::debug!("no stored credential");
                self.apply(SessionEvent::Invalidated);
            }
            Err(e) => {
                tracing::info!(reason = %e, "discarding stored credential");
                self.clear_store();
                self.apply(SessionEvent::Invalidated);
            }
        }
        self.session()
    }

    /// Reads and validates the stored credential.
    ///
    /// A stored value that isn't a credential at all is an invalid token,
    /// so bootstrap clears it. An unreadable store counts as empty.
    fn restore(&self, now: DateTime<Utc>) -> Result<Claims, SessionError> {
        let credential = match self.store.load() {
            Ok(Some(credential)) => credential,
            Ok(None) => return Err(SessionError::MissingToken),
            Err(StoreError::Corrupt(e)) => return Err(SessionError::InvalidToken(e)),
            Err(e) => {
                tracing::warn!(error = %e, "token store unavailable, treating as empty");
                return Err(SessionError::MissingToken);
            }
        };
        let claims = decode(credential.as_str())?;
        if claims.is_expired_at(now) {
            return Err(SessionError::Expired);
        }
        Ok(claims)
    }

    /// Logs in and, on success, makes the new identity the active one.
    ///
    /// On success the returned credential is persisted and the session
    /// becomes `Active`, replacing any previous identity.
    ///
    /// # Errors
    /// - [`SessionError::AuthRejected`]: the server refused; nothing changes
    /// - [`SessionError::Transport`]: the server couldn't be reached;
    ///   nothing changes
    /// - [`SessionError::MissingToken`] / [`SessionError::InvalidToken`]:
    ///   the server answered with no usable token; the store is cleared
    ///   and the session is left as it was
    pub async fn login(
        &mut self,
        identifier: &str,
        secret: &str,
    ) -> Result<Claims, SessionError> {
        let request = LoginRequest {
            email: identifier.to_string(),
            password: secret.to_string(),
        };

        let response = match self.backend.login(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!(error = %e, "login failed");
                return Err(e);
            }
        };

        let (credential, claims) = match accept_token(response.token) {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "login returned an unusable token");
                self.clear_store();
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&credential) {
            // The session still works for this run; it just won't
            // survive a restart.
            tracing::warn!(error = %e, "failed to persist credential");
        }

        tracing::info!(
            subject = %claims.subject(),
            role = %claims.role(),
            "logged in"
        );
        self.apply(SessionEvent::Authenticated(claims.clone()));
        Ok(claims)
    }

    /// Creates an account. The session is not touched.
    ///
    /// # Errors
    /// [`SessionError::AuthRejected`] with the server's message, or
    /// [`SessionError::Transport`].
    pub async fn register(
        &self,
        identifier: &str,
        secret: &str,
        role: Role,
    ) -> Result<(), SessionError> {
        register_account(&self.backend, identifier, secret, role).await
    }

    /// Clears the stored credential and goes `Anonymous`.
    ///
    /// Unconditional: logging out while already anonymous still clears
    /// the store.
    pub fn logout(&mut self) {
        self.clear_store();
        self.apply(SessionEvent::LoggedOut);
        tracing::info!("logged out");
    }

    /// Demotes an active session whose credential has expired, as of now.
    ///
    /// Returns `true` if the session was demoted.
    pub fn check_expiry(&mut self) -> bool {
        self.check_expiry_at(Utc::now())
    }

    /// Demotes an active session whose credential has expired at `now`.
    ///
    /// Clears the store and goes `Anonymous`, exactly as bootstrap would
    /// have done. Does nothing unless the session is `Active`.
    pub fn check_expiry_at(&mut self, now: DateTime<Utc>) -> bool {
        let expired = self
            .claims
            .as_ref()
            .is_some_and(|claims| claims.is_expired_at(now));
        if !expired {
            return false;
        }

        tracing::info!("active credential expired");
        self.clear_store();
        self.apply(SessionEvent::Invalidated);
        true
    }

    /// A snapshot of the current session.
    pub fn session(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// The claims behind the current session, if it's active.
    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    /// A read-only view that is notified of every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// The shared token store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The backend logins go through.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The single place the session changes.
    fn apply(&mut self, event: SessionEvent) {
        self.claims = match &event {
            SessionEvent::Restored(claims)
            | SessionEvent::Authenticated(claims) => Some(claims.clone()),
            SessionEvent::Invalidated | SessionEvent::LoggedOut => None,
        };
        let next = self.tx.borrow().next(&event);
        self.tx.send_replace(next);
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear token store");
        }
    }
}

/// Creates an account through `backend` without touching any session.
///
/// [`SessionManager::register`] delegates here. A host that shares the
/// manager behind a lock can call this directly with its own backend
/// handle, so a slow registration doesn't hold the lock.
pub async fn register_account<B: AuthBackend>(
    backend: &B,
    identifier: &str,
    secret: &str,
    role: Role,
) -> Result<(), SessionError> {
    let request = RegisterRequest {
        email: identifier.to_string(),
        password: secret.to_string(),
        role,
    };

    match backend.register(&request).await {
        Ok(()) => {
            tracing::info!(role = %request.role, "account registered");
            Ok(())
        }
        Err(e) => {
            tracing::info!(error = %e, "registration failed");
            Err(e)
        }
    }
}

/// Validates the token a login response carried.
fn accept_token(
    token: Option<String>,
) -> Result<(Credential, Claims), SessionError> {
    let raw = token
        .filter(|t| !t.trim().is_empty())
        .ok_or(SessionError::MissingToken)?;
    let credential = Credential::parse(raw)?;
    let claims = decode(credential.as_str())?;
    Ok((credential, claims))
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionManager`.
    //!
    //! Naming convention: `test_{function}_{scenario}_{expected}`.
    //!
    //! The backend is a stub that hands out queued responses, and the
    //! store is in memory. Time-dependent checks use the `_at` variants
    //! with explicit instants instead of sleeping.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Duration;
    use eventhub_protocol::testing::mint;
    use eventhub_protocol::{LoginResponse, ProtocolError, SubjectId};
    use eventhub_store::MemoryTokenStore;
    use eventhub_transport::StatusCode;
    use serde_json::json;

    use super::*;

    // -- Helpers ----------------------------------------------------------

    /// Answers logins from a queue; registrations with a fixed result.
    #[derive(Default)]
    struct StubBackend {
        logins: Mutex<VecDeque<Result<LoginResponse, SessionError>>>,
        reject_register: Option<String>,
    }

    impl StubBackend {
        fn with_logins(
            logins: Vec<Result<LoginResponse, SessionError>>,
        ) -> Self {
            Self {
                logins: Mutex::new(logins.into()),
                reject_register: None,
            }
        }
    }

    impl AuthBackend for StubBackend {
        async fn login(
            &self,
            _request: &LoginRequest,
        ) -> Result<LoginResponse, SessionError> {
            self.logins
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected login call")
        }

        async fn register(
            &self,
            _request: &RegisterRequest,
        ) -> Result<(), SessionError> {
            match &self.reject_register {
                Some(msg) => Err(rejected(StatusCode::BAD_REQUEST, msg)),
                None => Ok(()),
            }
        }
    }

    /// A store whose `load` fails with `error` until it's cleared.
    struct FailingStore {
        error: fn() -> StoreError,
        clears: AtomicUsize,
    }

    impl FailingStore {
        fn new(error: fn() -> StoreError) -> Self {
            Self {
                error,
                clears: AtomicUsize::new(0),
            }
        }

        fn clears(&self) -> usize {
            self.clears.load(Ordering::SeqCst)
        }
    }

    impl TokenStore for FailingStore {
        fn load(&self) -> Result<Option<Credential>, StoreError> {
            if self.clears() > 0 {
                return Ok(None);
            }
            Err((self.error)())
        }

        fn save(&self, _credential: &Credential) -> Result<(), StoreError> {
            Ok(())
        }

        fn clear(&self) -> Result<(), StoreError> {
            self.clears.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn rejected(status: StatusCode, message: &str) -> SessionError {
        SessionError::AuthRejected {
            status,
            message: message.to_string(),
        }
    }

    fn token(id: u64, role: &str, exp: DateTime<Utc>) -> String {
        mint(&json!({ "id": id, "role": role, "exp": exp.timestamp() }))
    }

    fn valid_token(id: u64, role: &str) -> String {
        token(id, role, Utc::now() + Duration::hours(1))
    }

    fn ok_login(token: String) -> Result<LoginResponse, SessionError> {
        Ok(LoginResponse { token: Some(token) })
    }

    fn manager_with(
        store: MemoryTokenStore,
        backend: StubBackend,
    ) -> SessionManager<MemoryTokenStore, StubBackend> {
        SessionManager::new(Arc::new(store), backend, SessionConfig::default())
    }

    fn stored(raw: &str) -> MemoryTokenStore {
        MemoryTokenStore::with_credential(Credential::parse(raw).unwrap())
    }

    fn stored_raw(mgr: &SessionManager<MemoryTokenStore, StubBackend>) -> Option<String> {
        mgr.store()
            .load()
            .unwrap()
            .map(|c| c.as_str().to_string())
    }

    fn active(id: u64, role: Role) -> Session {
        Session::Active {
            subject: SubjectId(id),
            role,
        }
    }

    // =====================================================================
    // new() / bootstrap()
    // =====================================================================

    #[test]
    fn test_new_starts_pending() {
        let mgr = manager_with(MemoryTokenStore::new(), StubBackend::default());
        assert!(mgr.session().is_pending());
        assert!(mgr.claims().is_none());
    }

    #[test]
    fn test_bootstrap_empty_store_is_anonymous() {
        let mut mgr =
            manager_with(MemoryTokenStore::new(), StubBackend::default());

        assert_eq!(mgr.bootstrap(), Session::Anonymous);
    }

    #[test]
    fn test_bootstrap_valid_token_is_active() {
        let raw = valid_token(42, "organizer");
        let mut mgr = manager_with(stored(&raw), StubBackend::default());

        assert_eq!(mgr.bootstrap(), active(42, Role::Organizer));
        assert_eq!(stored_raw(&mgr), Some(raw), "store should be kept");
    }

    #[test]
    fn test_bootstrap_expired_token_is_anonymous_and_clears_store() {
        let raw = token(42, "organizer", Utc::now() - Duration::seconds(1));
        let mut mgr = manager_with(stored(&raw), StubBackend::default());

        assert_eq!(mgr.bootstrap(), Session::Anonymous);
        assert_eq!(stored_raw(&mgr), None);
    }

    #[test]
    fn test_bootstrap_expiry_equal_to_now_is_expired() {
        let now = Utc::now();
        let exp = DateTime::from_timestamp(now.timestamp(), 0).unwrap();
        let raw = token(1, "participant", exp);
        let mut mgr = manager_with(stored(&raw), StubBackend::default());

        assert_eq!(mgr.bootstrap_at(exp), Session::Anonymous);
    }

    #[test]
    fn test_bootstrap_undecodable_token_is_anonymous_and_clears_store() {
        // Three segments, but the payload isn't base64 of JSON.
        let mut mgr = manager_with(stored("aaa.bbb.ccc"), StubBackend::default());

        assert_eq!(mgr.bootstrap(), Session::Anonymous);
        assert_eq!(stored_raw(&mgr), None);
    }

    #[test]
    fn test_bootstrap_corrupt_stored_value_is_anonymous_and_clears_store() {
        let store = Arc::new(FailingStore::new(|| {
            StoreError::Corrupt(ProtocolError::MalformedCredential(1))
        }));
        let mut mgr = SessionManager::new(
            Arc::clone(&store),
            StubBackend::default(),
            SessionConfig::default(),
        );

        assert_eq!(mgr.bootstrap(), Session::Anonymous);
        assert_eq!(store.clears(), 1);
    }

    #[test]
    fn test_bootstrap_unreadable_store_is_anonymous_and_keeps_store() {
        let store = Arc::new(FailingStore::new(|| {
            StoreError::Io(std::io::Error::other("permission denied"))
        }));
        let mut mgr = SessionManager::new(
            Arc::clone(&store),
            StubBackend::default(),
            SessionConfig::default(),
        );

        assert_eq!(mgr.bootstrap(), Session::Anonymous);
        assert_eq!(store.clears(), 0);
    }

    #[test]
    fn test_bootstrap_token_without_subject_clears_store() {
        let raw = mint(&json!({ "role": "organizer", "exp": 4_102_444_800u64 }));
        let mut mgr = manager_with(stored(&raw), StubBackend::default());

        assert_eq!(mgr.bootstrap(), Session::Anonymous);
        assert_eq!(stored_raw(&mgr), None);
    }

    #[test]
    fn test_bootstrap_token_without_expiry_is_anonymous() {
        let raw = mint(&json!({ "id": 1, "role": "organizer" }));
        let mut mgr = manager_with(stored(&raw), StubBackend::default());

        assert_eq!(mgr.bootstrap(), Session::Anonymous);
    }

    // =====================================================================
    // login()
    // =====================================================================

    #[tokio::test]
    async fn test_login_success_activates_and_persists() {
        let raw = valid_token(42, "organizer");
        let mut mgr = manager_with(
            MemoryTokenStore::new(),
            StubBackend::with_logins(vec![ok_login(raw.clone())]),
        );
        mgr.bootstrap();

        let claims = mgr.login("a@b.com", "pw").await.expect("should log in");

        assert_eq!(claims.subject(), SubjectId(42));
        assert_eq!(mgr.session(), active(42, Role::Organizer));
        assert_eq!(stored_raw(&mgr), Some(raw));
    }

    #[tokio::test]
    async fn test_login_rejected_keeps_anonymous_and_reports_message() {
        let mut mgr = manager_with(
            MemoryTokenStore::new(),
            StubBackend::with_logins(vec![Err(rejected(
                StatusCode::UNAUTHORIZED,
                "Invalid credentials",
            ))]),
        );
        mgr.bootstrap();

        let err = mgr.login("a@b.com", "bad").await.expect_err("should fail");

        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(mgr.session(), Session::Anonymous);
    }

    #[tokio::test]
    async fn test_login_rejected_keeps_previous_active_session() {
        let raw = valid_token(1, "participant");
        let mut mgr = manager_with(
            stored(&raw),
            StubBackend::with_logins(vec![Err(rejected(
                StatusCode::UNAUTHORIZED,
                "Invalid credentials",
            ))]),
        );
        mgr.bootstrap();

        assert!(mgr.login("a@b.com", "bad").await.is_err());

        assert_eq!(mgr.session(), active(1, Role::Participant));
        assert_eq!(stored_raw(&mgr), Some(raw));
    }

    #[tokio::test]
    async fn test_login_without_token_fails_and_clears_store() {
        let mut mgr = manager_with(
            MemoryTokenStore::new(),
            StubBackend::with_logins(vec![Ok(LoginResponse::default())]),
        );
        mgr.bootstrap();

        let err = mgr.login("a@b.com", "pw").await.expect_err("should fail");

        assert!(matches!(err, SessionError::MissingToken));
        assert_eq!(mgr.session(), Session::Anonymous);
        assert_eq!(stored_raw(&mgr), None);
    }

    #[tokio::test]
    async fn test_login_malformed_token_fails_and_clears_store() {
        let mut mgr = manager_with(
            MemoryTokenStore::new(),
            StubBackend::with_logins(vec![ok_login("not-a-jwt".into())]),
        );
        mgr.bootstrap();

        let err = mgr.login("a@b.com", "pw").await.expect_err("should fail");

        assert!(matches!(err, SessionError::InvalidToken(_)));
        assert_eq!(mgr.session(), Session::Anonymous);
        assert_eq!(stored_raw(&mgr), None);
    }

    #[tokio::test]
    async fn test_login_malformed_token_while_active_keeps_session_and_clears_store() {
        let mut mgr = manager_with(
            stored(&valid_token(1, "participant")),
            StubBackend::with_logins(vec![ok_login("not-a-jwt".into())]),
        );
        assert_eq!(mgr.bootstrap(), active(1, Role::Participant));

        let err = mgr.login("a@b.com", "pw").await.expect_err("should fail");

        assert!(matches!(err, SessionError::InvalidToken(_)));
        assert_eq!(mgr.session(), active(1, Role::Participant));
        assert_eq!(stored_raw(&mgr), None);
    }

    #[tokio::test]
    async fn test_login_token_without_subject_fails() {
        let raw = mint(&json!({ "role": "organizer", "exp": 4_102_444_800u64 }));
        let mut mgr = manager_with(
            MemoryTokenStore::new(),
            StubBackend::with_logins(vec![ok_login(raw)]),
        );
        mgr.bootstrap();

        let err = mgr.login("a@b.com", "pw").await.expect_err("should fail");

        assert!(matches!(err, SessionError::InvalidToken(_)));
        assert_eq!(mgr.session(), Session::Anonymous);
        assert_eq!(stored_raw(&mgr), None);
    }

    #[tokio::test]
    async fn test_sequential_logins_last_one_wins() {
        let first = valid_token(1, "participant");
        let second = valid_token(2, "organizer");
        let mut mgr = manager_with(
            MemoryTokenStore::new(),
            StubBackend::with_logins(vec![
                ok_login(first),
                ok_login(second.clone()),
            ]),
        );
        mgr.bootstrap();

        mgr.login("one@b.com", "pw").await.unwrap();
        mgr.login("two@b.com", "pw").await.unwrap();

        assert_eq!(mgr.session(), active(2, Role::Organizer));
        assert_eq!(stored_raw(&mgr), Some(second));
    }

    // =====================================================================
    // register()
    // =====================================================================

    #[tokio::test]
    async fn test_register_success_does_not_change_session() {
        let mut mgr =
            manager_with(MemoryTokenStore::new(), StubBackend::default());
        mgr.bootstrap();

        mgr.register("new@b.com", "pw", Role::Participant)
            .await
            .expect("should register");

        assert_eq!(mgr.session(), Session::Anonymous);
        assert_eq!(stored_raw(&mgr), None);
    }

    #[tokio::test]
    async fn test_register_rejected_reports_message() {
        let backend = StubBackend {
            reject_register: Some("email already registered".into()),
            ..StubBackend::default()
        };
        let mut mgr = manager_with(MemoryTokenStore::new(), backend);
        mgr.bootstrap();

        let err = mgr
            .register("dup@b.com", "pw", Role::Organizer)
            .await
            .expect_err("should fail");

        assert_eq!(err.to_string(), "email already registered");
        assert_eq!(mgr.session(), Session::Anonymous);
    }

    // =====================================================================
    // logout()
    // =====================================================================

    #[test]
    fn test_logout_active_clears_store_and_goes_anonymous() {
        let mut mgr = manager_with(
            stored(&valid_token(1, "organizer")),
            StubBackend::default(),
        );
        mgr.bootstrap();

        mgr.logout();

        assert_eq!(mgr.session(), Session::Anonymous);
        assert_eq!(stored_raw(&mgr), None);
        assert!(mgr.claims().is_none());
    }

    #[test]
    fn test_logout_before_bootstrap_clears_store_and_goes_anonymous() {
        let mut mgr = manager_with(
            stored(&valid_token(1, "organizer")),
            StubBackend::default(),
        );

        mgr.logout();
        mgr.logout();

        assert_eq!(mgr.session(), Session::Anonymous);
        assert_eq!(stored_raw(&mgr), None);
    }

    #[test]
    fn test_logout_when_already_anonymous_still_clears_store() {
        let mut mgr =
            manager_with(MemoryTokenStore::new(), StubBackend::default());
        assert_eq!(mgr.bootstrap(), Session::Anonymous);
        // Written behind the manager's back, e.g. by another process.
        let raw = valid_token(3, "participant");
        mgr.store().save(&Credential::parse(raw).unwrap()).unwrap();

        mgr.logout();

        assert_eq!(mgr.session(), Session::Anonymous);
        assert_eq!(stored_raw(&mgr), None);
    }

    // =====================================================================
    // check_expiry()
    // =====================================================================

    #[test]
    fn test_check_expiry_before_expiry_keeps_session() {
        let exp = Utc::now() + Duration::hours(1);
        let mut mgr = manager_with(
            stored(&token(1, "organizer", exp)),
            StubBackend::default(),
        );
        mgr.bootstrap();

        assert!(!mgr.check_expiry_at(exp - Duration::seconds(1)));
        assert!(mgr.session().is_active());
    }

    #[test]
    fn test_check_expiry_after_expiry_demotes_and_clears() {
        let exp = Utc::now() + Duration::hours(1);
        let mut mgr = manager_with(
            stored(&token(1, "organizer", exp)),
            StubBackend::default(),
        );
        mgr.bootstrap();

        assert!(mgr.check_expiry_at(exp + Duration::seconds(1)));
        assert_eq!(mgr.session(), Session::Anonymous);
        assert_eq!(stored_raw(&mgr), None);
    }

    #[test]
    fn test_check_expiry_when_anonymous_is_noop() {
        let mut mgr =
            manager_with(MemoryTokenStore::new(), StubBackend::default());
        mgr.bootstrap();

        assert!(!mgr.check_expiry());
        assert_eq!(mgr.session(), Session::Anonymous);
    }

    // =====================================================================
    // subscribe()
    // =====================================================================

    #[tokio::test]
    async fn test_subscriber_sees_each_transition() {
        let raw = valid_token(7, "participant");
        let mut mgr = manager_with(
            MemoryTokenStore::new(),
            StubBackend::with_logins(vec![ok_login(raw)]),
        );
        let mut rx = mgr.subscribe();
        assert!(rx.borrow_and_update().is_pending());

        mgr.bootstrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Session::Anonymous);

        mgr.login("a@b.com", "pw").await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), active(7, Role::Participant));

        mgr.logout();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Session::Anonymous);
    }

    #[tokio::test]
    async fn test_failed_login_does_not_notify_subscribers() {
        let mut mgr = manager_with(
            MemoryTokenStore::new(),
            StubBackend::with_logins(vec![Err(rejected(
                StatusCode::UNAUTHORIZED,
                "nope",
            ))]),
        );
        mgr.bootstrap();
        let mut rx = mgr.subscribe();
        rx.borrow_and_update();

        let _ = mgr.login("a@b.com", "bad").await;

        assert!(!rx.has_changed().unwrap());
    }
}
