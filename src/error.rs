//! Error types for the client core.
//!
//! DESIGN
//! ======
//! One enum per concern. `ApiError` is what every HTTP call site sees;
//! `SessionError` wraps it for the session operations, which can also fail on
//! token persistence or lose a race to a newer operation.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

// =============================================================================
// CONFIG
// =============================================================================

/// Errors produced while building a [`crate::ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("API base URL is empty")]
    EmptyApiUrl,

    #[error("API base URL must start with http:// or https://: {0}")]
    InvalidApiUrl(String),
}

// =============================================================================
// API
// =============================================================================

/// Failures surfaced by [`crate::ApiClient`] calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered 401; the stored credential is no longer accepted.
    #[error("unauthorized")]
    Unauthorized { body: String },

    /// Any other non-2xx status. The body is passed through untouched.
    #[error("request failed with status {status}")]
    Http { status: u16, body: String },

    /// A 2xx body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),
}

impl ApiError {
    /// Stable machine-readable code for logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Unauthorized { .. } => "E_UNAUTHORIZED",
            Self::Http { .. } => "E_HTTP",
            Self::Decode(_) => "E_DECODE",
            Self::Encode(_) => "E_ENCODE",
        }
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Human-readable message from the server body, if any.
    ///
    /// Looks for `detail`, `message` or `error` string fields in a JSON body
    /// and falls back to the raw body text.
    #[must_use]
    pub fn server_message(&self) -> Option<String> {
        let body = match self {
            Self::Unauthorized { body } | Self::Http { body, .. } => body,
            _ => return None,
        };
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed) {
            for key in ["detail", "message", "error"] {
                if let Some(serde_json::Value::String(text)) = map.get(key) {
                    return Some(text.clone());
                }
            }
        }
        Some(trimmed.to_owned())
    }
}

/// Transport-level failure reported by an [`crate::HttpTransport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        Self::Network(err.0)
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Failures reading or writing the durable credential token.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("token storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("no configuration directory available for token storage")]
    NoConfigDir,

    #[error("token storage unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// SESSION
// =============================================================================

/// Failures from [`crate::SessionManager`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A later session operation (logout, another login) completed first and
    /// this result was discarded.
    #[error("superseded by a newer session operation")]
    Superseded,
}

