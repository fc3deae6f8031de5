//! The authentication backend the session manager talks to.
//!
//! [`SessionManager`](crate::SessionManager) doesn't speak HTTP itself.
//! It calls an [`AuthBackend`], and [`HttpClient`] is the production
//! implementation. Tests plug in a stub that returns canned responses,
//! without changing any manager code.

use eventhub_protocol::{LoginRequest, LoginResponse, RegisterRequest};
use eventhub_store::TokenStore;
use eventhub_transport::HttpClient;

use crate::SessionError;

/// Path of the login endpoint, relative to the API base.
pub const LOGIN_PATH: &str = "/auth/login";

/// Path of the registration endpoint, relative to the API base.
pub const REGISTER_PATH: &str = "/auth/register";

/// Issues credentials and creates accounts.
///
/// # Trait bounds
///
/// - `Send + Sync` → the backend can be shared with a background task.
/// - `'static` → it lives as long as the session manager that owns it.
pub trait AuthBackend: Send + Sync + 'static {
    /// Exchanges an identifier and secret for a credential.
    ///
    /// # Returns
    /// - `Ok(LoginResponse)`: the server accepted the login. The token
    ///   inside may still be absent or garbage; the manager checks.
    /// - `Err(SessionError::AuthRejected)`: the server said no
    /// - `Err(SessionError::Transport)`: the server couldn't be reached
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl std::future::Future<Output = Result<LoginResponse, SessionError>> + Send;

    /// Creates an account. Never logs in.
    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;
}

impl<S: TokenStore> AuthBackend for HttpClient<S> {
    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<LoginResponse, SessionError> {
        let response = self.post_json(LOGIN_PATH, request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| SessionError::Transport(e.into()))?;

        // A 2xx with an empty or non-JSON body is a login without a
        // token, which the manager reports as `MissingToken`.
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<(), SessionError> {
        self.post_json(REGISTER_PATH, request).await?;
        Ok(())
    }
}
