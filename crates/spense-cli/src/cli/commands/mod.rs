//! CLI command handlers.

pub mod auth;
pub mod status;
pub mod tx;
pub mod watch;

use anyhow::{Result, bail};
use spense_core::session::SessionStore;

/// Fails with a hint when no user is logged in.
pub fn require_login(store: &SessionStore) -> Result<()> {
    if !store.is_logged_in() {
        bail!("Not logged in. Run 'spense login' first.");
    }
    Ok(())
}
