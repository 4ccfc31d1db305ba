//! Authenticated API client with transparent access-token renewal.
//!
//! ARCHITECTURE
//! ============
//! Every call reads the current access token from the `SessionStore` and
//! sends it as a bearer credential. A 401 is the only failure the client
//! tries to recover from:
//!
//! ```text
//! Idle ──401──▶ RefreshInFlight ──ok──▶ replay once with new token ──▶ Idle
//!                     │
//!                     └──err──▶ logout + surface original 401 ──▶ Idle
//! ```
//!
//! CONCURRENCY
//! ===========
//! At most one refresh call is in flight. The first request to see a 401
//! spawns the refresh onto the runtime and installs a shared handle to it in
//! `refresh`; every other 401 observed while it is installed awaits that same
//! handle and reuses its outcome. The spawned task removes the handle from
//! the slot when it completes, after the session has been updated (or torn
//! down), so a later 401 sees fresh state. Cancelling every waiter does not
//! cancel the refresh: the task runs to completion on its own, and the slot
//! only holds the join handle, never the client.
//!
//! A request whose 401 arrives after a refresh already finished compares the
//! token it was sent with against the current one; if they differ it simply
//! replays with the current token.

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::transport::{FilePart, HttpResponse, OutboundRequest, RequestBody, Transport};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

/// Path of the token renewal endpoint.
pub const REFRESH_PATH: &str = "/refresh_token";

/// Invoked after a failed refresh tears down the session.
pub type LogoutHook = Arc<dyn Fn() + Send + Sync>;

/// Unreserved characters (RFC 3986) pass through; everything else is escaped.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Escape `raw` for use as a single path segment.
#[must_use]
pub fn path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

// =============================================================================
// REQUEST BUILDER
// =============================================================================

/// An API call before decoration: method, path relative to the base URL,
/// query parameters, body.
///
/// `path` is used verbatim; escape caller-supplied parts with
/// [`path_segment`]. Query values are form-encoded at dispatch.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: RequestBody::Empty }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, file: FilePart) -> Self {
        self.body = RequestBody::Multipart(file);
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Absolute URL against `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] when query parameters are present and the
    /// joined URL does not parse.
    pub fn url(&self, config: &ClientConfig) -> Result<String, ApiError> {
        let joined = config.url(&self.path);
        if self.query.is_empty() {
            return Ok(joined);
        }
        let mut url = Url::parse(&joined).map_err(|e| ApiError::Encode(format!("{joined}: {e}")))?;
        url.query_pairs_mut().extend_pairs(&self.query);
        Ok(url.into())
    }
}

// =============================================================================
// REFRESH STATE
// =============================================================================

/// Observable phase of the refresh state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    RefreshInFlight,
}

/// Why a refresh attempt did not produce a new token. Internal: callers only
/// ever see the original 401.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum RefreshFailure {
    #[error("no refresh token available")]
    MissingRefreshToken,
    #[error("refresh request failed: {0}")]
    Transport(String),
    #[error("refresh rejected with status {0}")]
    Rejected(u16),
    #[error("refresh response malformed: {0}")]
    Malformed(String),
    #[error("renewed session could not be stored: {0}")]
    Store(String),
    #[error("refresh task aborted: {0}")]
    Aborted(String),
}

type RefreshFuture = Shared<BoxFuture<'static, Result<String, RefreshFailure>>>;

#[derive(serde::Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(serde::Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

// =============================================================================
// CLIENT
// =============================================================================

/// Cheap to clone; clones share the session, transport, and refresh slot.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
    on_logout: LogoutHook,
    refresh: Mutex<Option<RefreshFuture>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.base_url)
            .field("refresh_phase", &self.refresh_phase())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    #[must_use]
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        session: Arc<SessionStore>,
        on_logout: LogoutHook,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                session,
                on_logout,
                refresh: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    #[must_use]
    pub fn refresh_phase(&self) -> RefreshPhase {
        let slot = self.inner.refresh.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() { RefreshPhase::RefreshInFlight } else { RefreshPhase::Idle }
    }

    /// Send an authenticated request, recovering once from an expired token.
    /// Must run inside a Tokio runtime; the refresh is spawned onto it.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] when no response arrived.
    /// - [`ApiError::Status`] for any non-2xx outcome after recovery, including
    ///   the original 401 when the refresh failed.
    pub async fn send(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        let request_id = uuid::Uuid::new_v4();
        let sent_with = self.inner.session.access_token();
        let response = self.dispatch(&request, sent_with.as_deref(), request_id).await?;
        if response.status != 401 {
            return response.into_result();
        }

        debug!(%request_id, path = %request.path, "access token rejected");
        match self.renewed_token(sent_with.as_deref()).await {
            Ok(token) => {
                // Single replay: a second 401 is surfaced as-is.
                self.dispatch(&request, Some(&token), request_id).await?.into_result()
            }
            Err(failure) => {
                debug!(%request_id, reason = %failure, "recovery failed; surfacing original 401");
                response.into_result()
            }
        }
    }

    /// Send a request without credentials and without 401 recovery.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::send`].
    pub async fn send_public(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        let request_id = uuid::Uuid::new_v4();
        self.dispatch(&request, None, request_id).await?.into_result()
    }

    /// `GET` a path and decode the JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; malformed bodies yield [`ApiError::Decode`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    /// Send a JSON body with `method` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; malformed bodies yield [`ApiError::Decode`].
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::new(method, path).json(body)?).await?.json()
    }

    /// `DELETE` a path, discarding the response body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::delete(path)).await.map(drop)
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        request_id: uuid::Uuid,
    ) -> Result<HttpResponse, ApiError> {
        let outbound = OutboundRequest {
            method: request.method.clone(),
            url: request.url(&self.inner.config)?,
            authorization: token.map(|t| format!("Bearer {t}")),
            body: request.body.clone(),
        };
        debug!(%request_id, method = %outbound.method, path = %request.path, authenticated = token.is_some(), "dispatch");
        let response = self.inner.transport.send(outbound).await.map_err(|e| {
            warn!(%request_id, error = %e, "request failed before a response arrived");
            ApiError::from(e)
        })?;
        debug!(%request_id, status = response.status, "response");
        Ok(response)
    }

    /// Resolve a usable access token after a 401, joining or starting the
    /// single in-flight refresh.
    async fn renewed_token(&self, sent_with: Option<&str>) -> Result<String, RefreshFailure> {
        let pending = {
            let mut slot = self.inner.refresh.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(pending) = slot.as_ref() {
                pending.clone()
            } else {
                if let Some(current) = self.inner.session.access_token() {
                    if sent_with != Some(current.as_str()) {
                        return Ok(current);
                    }
                }
                let pending = ClientInner::start_refresh(Arc::clone(&self.inner));
                *slot = Some(pending.clone());
                pending
            }
        };
        pending.await
    }
}

impl ClientInner {
    fn start_refresh(inner: Arc<Self>) -> RefreshFuture {
        let slot_owner = Arc::downgrade(&inner);
        let task = tokio::spawn(async move {
            info!("refreshing access token");
            let outcome = inner.refresh_access_token().await;
            inner.finish_refresh(&outcome);
            outcome
        });
        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let failure = RefreshFailure::Aborted(e.to_string());
                    if let Some(inner) = slot_owner.upgrade() {
                        inner.finish_refresh(&Err(failure.clone()));
                    }
                    Err(failure)
                }
            }
        }
        .boxed()
        .shared()
    }

    fn finish_refresh(&self, outcome: &Result<String, RefreshFailure>) {
        match outcome {
            Ok(_) => info!("access token renewed"),
            Err(failure) => {
                warn!(reason = %failure, "token refresh failed; ending session");
                self.force_logout();
            }
        }
        *self.refresh.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    async fn refresh_access_token(&self) -> Result<String, RefreshFailure> {
        let refresh_token = self.session.refresh_token().ok_or(RefreshFailure::MissingRefreshToken)?;
        let body = serde_json::to_value(RefreshRequest { refresh_token: &refresh_token })
            .map_err(|e| RefreshFailure::Malformed(e.to_string()))?;
        let request = OutboundRequest {
            method: Method::POST,
            url: self.config.url(REFRESH_PATH),
            authorization: None,
            body: RequestBody::Json(body),
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| RefreshFailure::Transport(e.to_string()))?;
        if !response.is_success() {
            return Err(RefreshFailure::Rejected(response.status));
        }
        let renewed: RefreshResponse =
            serde_json::from_slice(&response.body).map_err(|e| RefreshFailure::Malformed(e.to_string()))?;
        if renewed.access_token.is_empty() {
            return Err(RefreshFailure::Malformed("empty access_token".into()));
        }

        self.session
            .replace_tokens(&renewed.access_token, renewed.refresh_token.as_deref())
            .map_err(|e| RefreshFailure::Store(e.to_string()))?;
        Ok(renewed.access_token)
    }

    fn force_logout(&self) {
        if self.session.logout() {
            (self.on_logout)();
        }
    }
}
