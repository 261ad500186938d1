//! Foreground session validation loop.

use std::time::Duration;

use anyhow::{Context, Result};
use spense_core::api::ApiClient;
use spense_core::manager::SessionManager;
use spense_core::session::{CachedSession, SessionStore};
use tokio_util::sync::CancellationToken;

/// Runs the session manager until Ctrl-C, then persists the outcome.
pub async fn run(client: ApiClient, store: SessionStore, interval: Duration) -> Result<()> {
    let manager = SessionManager::new(client, store.clone(), interval);
    let mut state = manager.state();

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(manager.run(cancel.clone()));

    eprintln!(
        "Watching session (probe every {}s). Ctrl-C to stop.",
        interval.as_secs()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("Stopping session watch.");
                cancel.cancel();
                break;
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                eprintln!("session state: {}", state.borrow_and_update().label());
            }
        }
    }

    handle.await.context("join session loop")?;

    // Keep the cache in step with the loop's outcome: a refreshed access
    // token on success, nothing after a forced logout.
    match CachedSession::from_store(&store) {
        Some(cached) => cached.save().context("cache session")?,
        None => {
            CachedSession::clear().context("clear cached session")?;
        }
    }

    Ok(())
}
