//! Wire-level request/response types and the transport seam.
//!
//! ARCHITECTURE
//! ============
//! `ApiClient` owns the auth policy; a `Transport` only moves bytes. Keeping
//! the seam this narrow lets tests drive the refresh state machine with a
//! scripted backend instead of sockets.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;

use crate::config::Timeouts;
use crate::error::{ApiError, TransportError};

// =============================================================================
// REQUEST
// =============================================================================

/// A file carried as a multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Request payload, kept in replayable form so a request can be re-sent.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(FilePart),
}

/// A request as it leaves the client, fully decorated.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    /// Full `Authorization` header value, e.g. `Bearer <token>`.
    pub authorization: Option<String>,
    pub body: RequestBody,
}

impl OutboundRequest {
    /// The bearer token carried by this request, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.authorization.as_deref().and_then(|v| v.strip_prefix("Bearer "))
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Turn a non-2xx response into [`ApiError::Status`].
    ///
    /// # Errors
    ///
    /// Returns an error for any status outside 200..300.
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            let body = self.text();
            Err(ApiError::Status { status: self.status, body })
        }
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Sends one request and returns whatever status the server produced.
///
/// Implementations must not retry, follow auth policy, or map statuses to
/// errors; only "no response at all" is an error here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed transport used outside tests.
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the HTTP client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.http.request(request.method, &request.url);
        if let Some(auth) = &request.authorization {
            builder = builder.header(AUTHORIZATION, auth);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(file) => {
                let part = reqwest::multipart::Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.mime)
                    .map_err(|e| TransportError(e.to_string()))?;
                builder.multipart(reqwest::multipart::Form::new().part(file.field, part))
            }
        };

        let response = builder.send().await.map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| TransportError(e.to_string()))?;
        Ok(HttpResponse { status, body: body.to_vec() })
    }
}
