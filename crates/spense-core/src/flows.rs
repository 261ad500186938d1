//! User-initiated auth flows (login, register, logout).
//!
//! Thin orchestration over the API client: these are the only operations
//! besides the background refresh that mutate the session store. Errors are
//! surfaced as explicit results; no retries are performed at this layer.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::api::{ApiClient, ApiError};
use crate::session::{Session, SessionStore};

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

/// Error from a user-initiated auth flow.
///
/// `message` is the fixed, display-ready summary; `detail` carries the
/// backend's own error text when it provided one.
#[derive(Debug, Clone)]
pub struct FlowError {
    pub message: String,
    pub detail: Option<String>,
}

impl FlowError {
    fn from_api(fallback: &str, err: ApiError) -> Self {
        if err.is_transport() {
            // Surface the underlying error message for transport failures.
            let message = if err.message.is_empty() {
                fallback.to_string()
            } else {
                err.message
            };
            return Self {
                message,
                detail: None,
            };
        }
        Self {
            message: fallback.to_string(),
            detail: Some(err.message),
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {detail}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for FlowError {}

/// Logs in and populates the session store with the returned token pair.
///
/// The user id is decoded from the access token's `user_id` JWT claim.
///
/// # Errors
/// Returns an error if the operation fails.
pub async fn login(
    client: &ApiClient,
    store: &SessionStore,
    username: &str,
    password: &str,
) -> Result<Session, FlowError> {
    let tokens = client
        .login(username, password)
        .await
        .map_err(|err| FlowError::from_api(LOGIN_FAILED, err))?;

    let user_id = decode_user_id(&tokens.access_token).unwrap_or(-1);
    store.login(user_id, tokens.access_token, tokens.refresh_token);
    Ok(store.snapshot())
}

/// Creates a new account. Does not touch the session.
///
/// # Errors
/// Returns an error if the operation fails.
pub async fn register(
    client: &ApiClient,
    username: &str,
    password: &str,
    firstname: &str,
    lastname: &str,
) -> Result<(), FlowError> {
    client
        .register(username, password, firstname, lastname)
        .await
        .map_err(|err| FlowError::from_api(REGISTRATION_FAILED, err))
}

/// Clears the session.
pub fn logout(store: &SessionStore) {
    store.clear();
}

/// Extracts the `user_id` claim from a JWT access token.
///
/// Decodes the payload only; no signature verification is done client-side.
fn decode_user_id(token: &str) -> Option<i64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let decoded = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    let json: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    json.get("user_id").and_then(serde_json::Value::as_i64)
}
