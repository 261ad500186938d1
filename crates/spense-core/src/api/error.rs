//! Structured errors for backend API calls.

use std::fmt;

use serde_json::Value;

/// Error category for an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Network unreachable, timeout, or request could not be sent
    Transport,
    /// HTTP 401 - the access token was rejected
    Auth,
    /// Any other non-2xx HTTP status
    HttpStatus,
    /// 2xx response with an undecodable body
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Auth => write!(f, "auth"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from the backend with kind and details.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates a transport error from a reqwest failure.
    pub fn transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ApiErrorKind::Transport, format!("request timed out: {err}"))
        } else {
            Self::new(ApiErrorKind::Transport, err.to_string())
        }
    }

    /// Creates an error from a non-2xx HTTP status.
    ///
    /// A 401 is classified as [`ApiErrorKind::Auth`]; everything else is
    /// [`ApiErrorKind::HttpStatus`]. The backend's `detail`/`error` JSON
    /// field is folded into the message when present.
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = if status == 401 {
            ApiErrorKind::Auth
        } else {
            ApiErrorKind::HttpStatus
        };

        let message = format!("HTTP {status}");
        let details = if body.is_empty() {
            None
        } else {
            // Try to extract a cleaner error message from JSON
            if let Ok(json) = serde_json::from_str::<Value>(body)
                && let Some(msg) = backend_detail(&json)
            {
                return Self {
                    kind,
                    message: format!("HTTP {status}: {msg}"),
                    details: Some(body.to_string()),
                };
            }
            Some(body.to_string())
        };
        Self {
            kind,
            message,
            details,
        }
    }

    /// Creates a parse error for an undecodable 2xx body.
    pub fn parse(err: &reqwest::Error) -> Self {
        Self::new(
            ApiErrorKind::Parse,
            format!("failed to decode response: {err}"),
        )
    }

    /// Returns whether this is the 401 refresh trigger.
    pub fn is_auth(&self) -> bool {
        self.kind == ApiErrorKind::Auth
    }

    /// Returns whether this is a transport-level failure.
    pub fn is_transport(&self) -> bool {
        self.kind == ApiErrorKind::Transport
    }
}

/// Extracts the human-readable error field from a backend error body.
fn backend_detail(json: &Value) -> Option<&str> {
    for key in ["detail", "error", "message"] {
        if let Some(msg) = json.get(key).and_then(Value::as_str) {
            return Some(msg);
        }
    }
    None
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
