//! Backend connection status command.

use anyhow::Result;
use spense_core::api::ApiClient;

/// Probes both named endpoints and prints one line per backend.
pub async fn run(primary: &ApiClient, secondary: &ApiClient) -> Result<()> {
    let first = primary.healthcheck().await;
    let second = secondary.healthcheck().await;

    println!(
        "primary    {}  {}  {}",
        primary.base_url(),
        first.status_code,
        first.status
    );
    println!(
        "secondary  {}  {}  {}",
        secondary.base_url(),
        second.status_code,
        second.status
    );

    Ok(())
}
