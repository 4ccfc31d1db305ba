//! Error taxonomy surfaced to callers of the API client.
//!
//! ERROR HANDLING
//! ==============
//! The client recovers exactly one failure class (an expired access token).
//! Everything else lands here unmodified so views can pick between
//! "not found", "validation failed" and "try again" presentations.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

// =============================================================================
// API ERRORS
// =============================================================================

/// Errors produced by API client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, reset).
    #[error("network request failed: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected schema.
    #[error("malformed response body: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("request body could not be encoded: {0}")]
    Encode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// Credentials were accepted but the session could not be stored.
    #[error("session store failed: {0}")]
    Session(#[from] StoreError),
}

impl ApiError {
    /// HTTP status carried by a [`ApiError::Status`] error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Validation and conflict rejections (400, 409, 422).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self.status(), Some(400 | 409 | 422))
    }

    /// Human-readable reason from the backend's `{"detail": ...}` body.
    ///
    /// Validation errors carry a list of objects under `detail`; the first
    /// `msg` is returned for those.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        match value.get("detail")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .map(str::to_owned),
            _ => None,
        }
    }

    /// Stable machine-readable code for logs and view-level dispatch.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Status { status: 401, .. } => "E_UNAUTHORIZED",
            Self::Status { status: 404, .. } => "E_NOT_FOUND",
            Self::Status { status: 400 | 409 | 422, .. } => "E_VALIDATION",
            Self::Status { .. } => "E_STATUS",
            Self::Decode(_) => "E_DECODE",
            Self::Encode(_) => "E_ENCODE",
            Self::ClientBuild(_) => "E_CLIENT_BUILD",
            Self::Session(_) => "E_SESSION",
        }
    }

    /// Whether a user-initiated retry is worth offering.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

/// Failure reported by a [`crate::http::Transport`] when no response arrived.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        Self::Network(err.0)
    }
}

// =============================================================================
// SESSION STORE ERRORS
// =============================================================================

/// Errors produced by the session store and its durable storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no active session")]
    NoSession,
}
