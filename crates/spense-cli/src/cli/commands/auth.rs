//! Login, registration, logout, and profile commands.

use anyhow::{Context, Result};
use spense_core::api::ApiClient;
use spense_core::flows;
use spense_core::session::{CachedSession, SessionStore, mask_token};

use super::require_login;

/// Logs in and caches the session for later invocations.
pub async fn login(
    client: &ApiClient,
    store: &SessionStore,
    username: &str,
    password: &str,
) -> Result<()> {
    let session = flows::login(client, store, username, password).await?;

    if let Some(cached) = CachedSession::from_store(store) {
        cached.save().context("cache session")?;
    }

    println!(
        "Logged in as user {} (access token {})",
        session.user_id,
        mask_token(&session.access_token)
    );
    Ok(())
}

/// Creates a new account. No session is established.
pub async fn register(
    client: &ApiClient,
    username: &str,
    password: &str,
    firstname: &str,
    lastname: &str,
) -> Result<()> {
    flows::register(client, username, password, firstname, lastname).await?;
    println!("Account created. You can now log in with 'spense login'.");
    Ok(())
}

/// Clears the in-memory session and the on-disk cache.
pub fn logout(store: &SessionStore) -> Result<()> {
    flows::logout(store);
    let had_session = CachedSession::clear().context("clear cached session")?;

    if had_session {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

/// Fetches and prints the logged-in user's profile.
pub async fn profile(client: &ApiClient, store: &SessionStore) -> Result<()> {
    require_login(store)?;

    let user_id = store.snapshot().user_id;
    let profile = client.get_user_profile(user_id).await?;

    println!("id:        {}", profile.id);
    println!("username:  {}", profile.username);
    println!("firstname: {}", profile.firstname);
    println!("lastname:  {}", profile.lastname);
    Ok(())
}
