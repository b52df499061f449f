//! The API gateway client.
//!
//! ARCHITECTURE
//! ============
//! Every hub call funnels through [`ApiClient::send`], which enforces two
//! rules so call sites never repeat them:
//!
//! 1. A stored credential token is attached as `Authorization: Bearer ...`.
//! 2. A 401 response emits [`SessionInvalidated`] to registered listeners
//!    before the failure is returned. The session manager listens to clear
//!    its state; the composition root listens to navigate to the login entry.
//!
//! ERROR HANDLING
//! ==============
//! No retries and no backoff. Network failures and non-2xx statuses are
//! returned as [`ApiError`] and each caller decides what to show.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::transport::{AUTHORIZATION, ApiRequest, ApiResponse, CONTENT_TYPE, HttpTransport, JSON_MIME, Method};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::storage::TokenStore;

/// Emitted when a request is answered with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInvalidated {
    pub method: Method,
    pub path: String,
}

type UnauthorizedListener = Arc<dyn Fn(&SessionInvalidated) + Send + Sync>;

// =============================================================================
// CALL BUILDER
// =============================================================================

/// A relative request description: method, path under the base address,
/// query pairs and an optional JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<String>,
    report_unauthorized: bool,
}

impl ApiCall {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None, report_unauthorized: true }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query pair. Empty values are kept; the server treats them as
    /// "no filter".
    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let text = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Some(text);
        Ok(self)
    }

    /// Answer a 401 with an error only, without emitting
    /// [`SessionInvalidated`]. Used for credential exchanges and the startup
    /// identity check, where a 401 is a failed attempt rather than an
    /// expired session.
    #[must_use]
    pub fn quiet_unauthorized(mut self) -> Self {
        self.report_unauthorized = false;
        self
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

// =============================================================================
// CLIENT
// =============================================================================

struct ClientInner {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenStore>,
    listeners: Mutex<Vec<UnauthorizedListener>>,
}

/// Shared handle to the configured gateway. Cloning is cheap.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig, transport: Arc<dyn HttpTransport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                base_url: config.api_url.trim_end_matches('/').to_owned(),
                transport,
                tokens,
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The durable token store this client reads credentials from.
    #[must_use]
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.inner.tokens)
    }

    /// Register a listener for [`SessionInvalidated`].
    ///
    /// Listeners run synchronously, in registration order, before the failing
    /// call returns.
    pub fn on_unauthorized<F>(&self, listener: F)
    where
        F: Fn(&SessionInvalidated) + Send + Sync + 'static,
    {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    /// Absolute URL for `path` under the base address.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.inner.base_url)
        } else {
            format!("{}/{path}", self.inner.base_url)
        }
    }

    /// Dispatch `call` and return the raw 2xx response.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] if no response arrived.
    /// - [`ApiError::Unauthorized`] on 401, after listeners ran.
    /// - [`ApiError::Http`] on any other non-2xx status.
    pub async fn send(&self, call: ApiCall) -> Result<ApiResponse, ApiError> {
        let request = self.build_request(&call);

        let response = match self.inner.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(method = %call.method, path = %call.path, error = %err, "api request failed");
                return Err(err.into());
            }
        };
        tracing::debug!(method = %call.method, path = %call.path, status = response.status, "api response");

        if response.status == 401 {
            if call.report_unauthorized {
                self.emit_unauthorized(&SessionInvalidated { method: call.method, path: call.path });
            }
            return Err(ApiError::Unauthorized { body: response.body });
        }
        if !response.is_success() {
            return Err(ApiError::Http { status: response.status, body: response.body });
        }
        Ok(response)
    }

    /// Dispatch `call` and decode the JSON body as `T`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`], plus [`ApiError::Decode`] for a body that
    /// does not match `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, call: ApiCall) -> Result<T, ApiError> {
        let response = self.send(call).await?;
        decode_body(&response.body)
    }

    /// Dispatch `call` and ignore the response body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn execute(&self, call: ApiCall) -> Result<(), ApiError> {
        self.send(call).await.map(|_| ())
    }

    /// `GET path` decoded as `T`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::fetch`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(ApiCall::get(path)).await
    }

    /// `POST path` with a JSON body, decoded as `T`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::fetch`], plus [`ApiError::Encode`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(ApiCall::post(path).json(body)?).await
    }

    fn build_request(&self, call: &ApiCall) -> ApiRequest {
        let mut headers = vec![(CONTENT_TYPE.to_owned(), JSON_MIME.to_owned())];
        if let Some(token) = self.inner.tokens.load() {
            headers.push((AUTHORIZATION.to_owned(), format!("Bearer {token}")));
        }
        ApiRequest {
            method: call.method,
            url: self.endpoint(&call.path),
            query: call.query.clone(),
            headers,
            body: call.body.clone(),
        }
    }

    fn emit_unauthorized(&self, event: &SessionInvalidated) {
        tracing::warn!(method = %event.method, path = %event.path, "request unauthorized; session invalidated");
        let listeners = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(event);
        }
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    // Empty 2xx bodies decode as JSON null so `()` and `Option<T>` targets work.
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}
