//! Shared session state for the current user.
//!
//! The store is an explicitly owned handle passed to every component that
//! needs it; the token triple is guarded by a mutex so login, logout, and
//! background refresh never observe a half-updated session.
//! Tokens are never logged in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Authentication state of the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Whether a user is currently logged in
    pub logged_in: bool,
    /// Backend user id, -1 when unknown
    pub user_id: i64,
    /// Short-lived bearer credential
    pub access_token: String,
    /// Long-lived credential, used only to mint a new access token
    pub refresh_token: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            logged_in: false,
            user_id: -1,
            access_token: String::new(),
            refresh_token: String::new(),
        }
    }
}

/// Shared, internally synchronized session store.
///
/// Cloning the store clones the handle, not the session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<Session>>,
}

impl SessionStore {
    /// Creates an empty store (logged out).
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    /// Returns whether a user is currently logged in.
    pub fn is_logged_in(&self) -> bool {
        self.lock().logged_in
    }

    /// Returns the current access token.
    ///
    /// Read at call time so a background refresh takes effect on the very
    /// next request.
    pub fn access_token(&self) -> String {
        self.lock().access_token.clone()
    }

    /// Stores a fresh token pair after a successful login.
    pub fn login(&self, user_id: i64, access_token: String, refresh_token: String) {
        let mut session = self.lock();
        session.logged_in = true;
        session.user_id = user_id;
        session.access_token = access_token;
        session.refresh_token = refresh_token;
    }

    /// Replaces the access token after a successful refresh.
    /// The refresh token is kept.
    pub fn apply_refresh(&self, access_token: String) {
        let mut session = self.lock();
        session.logged_in = true;
        session.access_token = access_token;
    }

    /// Clears the session (logout or fatal refresh failure).
    pub fn clear(&self) {
        *self.lock() = Session::default();
    }
}

/// Session cache filename.
const SESSION_CACHE_FILE: &str = "session.json";

/// Cached token pair persisted between CLI invocations.
///
/// Stored in `${SPENSE_HOME}/session.json` with restricted permissions
/// (0600).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSession {
    /// Backend user id
    pub user_id: i64,
    /// The access token (short-lived)
    pub access: String,
    /// The refresh token (long-lived)
    pub refresh: String,
}

impl CachedSession {
    /// Returns the path to the session cache file.
    pub fn cache_path() -> PathBuf {
        paths::session_path()
    }

    /// Captures the logged-in session from a store, if any.
    pub fn from_store(store: &SessionStore) -> Option<Self> {
        let session = store.snapshot();
        if !session.logged_in {
            return None;
        }
        Some(Self {
            user_id: session.user_id,
            access: session.access_token,
            refresh: session.refresh_token,
        })
    }

    /// Populates a store from this cached session.
    pub fn hydrate(&self, store: &SessionStore) {
        store.login(self.user_id, self.access.clone(), self.refresh.clone());
    }

    /// Loads the cached session from disk.
    /// Returns `None` if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn load() -> Result<Option<Self>> {
        let path = Self::cache_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session cache from {}", path.display()))?;

        serde_json::from_str(&contents)
            .map(Some)
            .with_context(|| format!("Failed to parse session cache from {}", path.display()))
    }

    /// Saves the cached session to disk with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn save(&self) -> Result<()> {
        let path = Self::cache_path();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize session cache")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }

    /// Removes the cached session from disk.
    /// Returns whether a cache file existed.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn clear() -> Result<bool> {
        let path = Self::cache_path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove session cache {}", path.display()))?;
        Ok(true)
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}
