//! Background session validation and token refresh.
//!
//! A single long-lived task probes the profile endpoint on a fixed interval
//! while a user is logged in. A 401 from the probe is the only refresh
//! trigger; transport errors are treated as transient. The loop never
//! terminates on its own: it re-arms automatically after a later login and
//! stops only when its cancellation token fires.

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::session::SessionStore;

/// Session lifecycle state, observable by a UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No valid session; probes are skipped
    #[default]
    LoggedOut,
    /// Session considered valid as of the last probe
    LoggedIn,
    /// A 401 was observed; a refresh round trip is in flight
    Refreshing,
}

impl SessionState {
    /// Returns the human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::LoggedOut => "logged out",
            SessionState::LoggedIn => "logged in",
            SessionState::Refreshing => "refreshing",
        }
    }
}

/// Periodic session validator.
pub struct SessionManager {
    client: ApiClient,
    store: SessionStore,
    interval: Duration,
    state_tx: watch::Sender<SessionState>,
}

impl SessionManager {
    /// Creates a manager probing through `client` every `interval`.
    pub fn new(client: ApiClient, store: SessionStore, interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(SessionState::default());
        Self {
            client,
            store,
            interval,
            state_tx,
        }
    }

    /// Subscribes to session state changes.
    pub fn state(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Runs the validation loop until `cancel` fires.
    ///
    /// Cancellation interrupts the inter-iteration delay; an iteration that
    /// has already started (including its refresh round trip) runs to
    /// completion first.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            self.tick().await;

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// One loop iteration: probe, then refresh if the probe saw a 401.
    async fn tick(&self) {
        if !self.store.is_logged_in() {
            self.set_state(SessionState::LoggedOut);
            return;
        }
        self.set_state(SessionState::LoggedIn);

        let session = self.store.snapshot();
        match self.client.get_user_profile(session.user_id).await {
            Ok(_) => {}
            Err(err) if err.is_auth() => {
                self.set_state(SessionState::Refreshing);
                self.refresh(&session.refresh_token).await;
            }
            Err(err) => {
                // Transient: no state change, next interval retries.
                tracing::debug!("session probe failed ({}): {err}", err.kind);
            }
        }
    }

    async fn refresh(&self, refresh_token: &str) {
        match self.client.refresh(refresh_token).await {
            Ok(tokens) => {
                self.store.apply_refresh(tokens.access_token);
                self.set_state(SessionState::LoggedIn);
            }
            Err(err) => {
                tracing::warn!("session refresh failed, logging out: {err}");
                self.store.clear();
                self.set_state(SessionState::LoggedOut);
            }
        }
    }

    fn set_state(&self, state: SessionState) {
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}
