//! The HTTP client that decorates requests with the stored credential.

use std::sync::Arc;

use eventhub_store::{TokenStore, load_or_absent};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::TransportError;

/// Sends requests to the EventHub backend with the stored credential
/// attached.
///
/// Cloning is cheap: `reqwest::Client` is reference-counted internally
/// and the store sits behind an `Arc`.
pub struct HttpClient<S: TokenStore> {
    base: Url,
    client: reqwest::Client,
    store: Arc<S>,
}

impl<S: TokenStore> Clone for HttpClient<S> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            client: self.client.clone(),
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TokenStore> HttpClient<S> {
    /// Creates a client with a default `reqwest::Client`.
    ///
    /// # Errors
    /// Returns [`TransportError::InvalidUrl`] if `base_url` doesn't parse
    /// or can't carry a path (e.g. `mailto:`).
    pub fn new(base_url: &str, store: Arc<S>) -> Result<Self, TransportError> {
        Self::with_client(base_url, reqwest::Client::new(), store)
    }

    /// Creates a client around a pre-configured `reqwest::Client`
    /// (timeouts, proxies, TLS roots).
    pub fn with_client(
        base_url: &str,
        client: reqwest::Client,
        store: Arc<S>,
    ) -> Result<Self, TransportError> {
        let mut base = Url::parse(base_url).map_err(|e| {
            TransportError::InvalidUrl(format!("{base_url}: {e}"))
        })?;
        if base.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(format!(
                "{base_url}: cannot be a base URL"
            )));
        }
        // `Url::join` replaces the last path segment unless the base
        // ends in '/', which would drop the `/api/v1` prefix.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            client,
            store,
        })
    }

    /// The base every request path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// The store credentials are read from.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Resolves `path` (with or without a leading `/`) against the base.
    pub fn url(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Starts a request, with the bearer header attached when a
    /// credential is stored.
    ///
    /// This is the single place the `Authorization` header is set.
    pub fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, TransportError> {
        let url = self.url(path)?;
        let builder = self.client.request(method, url);
        Ok(match load_or_absent(self.store.as_ref()) {
            Some(credential) => builder.bearer_auth(credential.as_str()),
            None => builder,
        })
    }

    /// Sends a built request, turning non-2xx responses into
    /// [`TransportError::Status`].
    pub async fn send(
        &self,
        builder: RequestBuilder,
    ) -> Result<Response, TransportError> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(url = %response.url(), %status, "response received");

        if status.is_success() {
            return Ok(response);
        }

        // A body we can't read still leaves us the status line.
        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status,
            message: error_message(status, &body),
        })
    }

    /// `GET path`.
    pub async fn get(&self, path: &str) -> Result<Response, TransportError> {
        self.send(self.request(Method::GET, path)?).await
    }

    /// `DELETE path`.
    pub async fn delete(
        &self,
        path: &str,
    ) -> Result<Response, TransportError> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    /// `POST path` with a JSON body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, TransportError> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    /// `PUT path` with a JSON body.
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, TransportError> {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    /// `GET path` and decode the JSON response.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, TransportError> {
        Ok(self.get(path).await?.json().await?)
    }

    /// Sends `body` as JSON with `method` and decodes the JSON response.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path)?.json(body);
        Ok(self.send(builder).await?.json().await?)
    }
}

/// Picks the most useful human-readable message out of an error body.
///
/// In order of preference:
/// 1. a JSON object's string `message` or `error` field,
/// 2. the trimmed body text,
/// 3. the status code's canonical reason.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();

    if let Ok(serde_json::Value::Object(map)) =
        serde_json::from_str::<serde_json::Value>(trimmed)
    {
        for key in ["message", "error"] {
            if let Some(serde_json::Value::String(msg)) = map.get(key) {
                if !msg.trim().is_empty() {
                    return msg.trim().to_string();
                }
            }
        }
    }

    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
