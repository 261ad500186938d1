//! Typed client for the expense-tracker backend REST API.
//!
//! The client is a pure request/response boundary: it attaches the bearer
//! token transparently but never mutates the session. Session mutation is
//! the caller's job (see [`crate::flows`] and [`crate::manager`]).

mod error;
mod types;

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::DEFAULT_PROD_URL;
use crate::session::SessionStore;

pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use types::{
    Category, CategoryBreakdown, ConnectionStatus, HealthcheckResponse, LoginResponse,
    NewTransaction, Profile, SpendingSummary, TokenRefreshResponse, TransactionRecord,
};

/// Expense-tracker API client for one backend endpoint.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    store: SessionStore,
}

impl ApiClient {
    /// Creates a new client for the given base URL.
    ///
    /// # Panics
    /// - In test builds (`#[cfg(test)]`), panics if `base_url` is the production API.
    /// - At runtime, panics if `SPENSE_BLOCK_REAL_API=1` and `base_url` is the production API.
    ///
    /// This prevents tests from accidentally making real network requests.
    /// Use `SPENSE_PROD_URL` env var or config to point to a mock server.
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        // Compile-time guard for unit tests
        #[cfg(test)]
        if base_url == DEFAULT_PROD_URL {
            panic!(
                "Tests must not use the production spense API!\n\
                 Set SPENSE_PROD_URL to a mock server (e.g., wiremock).\n\
                 Found base_url: {base_url}"
            );
        }

        // Runtime guard for integration tests (set SPENSE_BLOCK_REAL_API=1 in test harness)
        #[cfg(not(test))]
        if std::env::var("SPENSE_BLOCK_REAL_API").is_ok_and(|v| v == "1")
            && base_url == DEFAULT_PROD_URL
        {
            panic!(
                "SPENSE_BLOCK_REAL_API=1 but trying to use the production spense API!\n\
                 Set SPENSE_PROD_URL to a mock server.\n\
                 Found base_url: {base_url}"
            );
        }

        Self {
            base_url,
            http: reqwest::Client::new(),
            store,
        }
    }

    /// Returns the endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bearer header value, read from the session store at call time.
    fn bearer(&self) -> String {
        format!("Bearer {}", self.store.access_token())
    }

    /// Probes the backend's liveness endpoint.
    ///
    /// Never fails the caller: any transport error yields the
    /// `{-1, "Unknown"}` sentinel. Does not touch the session.
    pub async fn healthcheck(&self) -> ConnectionStatus {
        let url = format!("{}/healthcheck", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => {
                let status_code = i32::from(response.status().as_u16());
                let status = response
                    .json::<HealthcheckResponse>()
                    .await
                    .map_or_else(|_| "Unknown".to_string(), |body| body.status);
                ConnectionStatus {
                    status_code,
                    status,
                }
            }
            Err(err) => {
                tracing::debug!("healthcheck against {} failed: {err}", self.base_url);
                ConnectionStatus::unknown()
            }
        }
    }

    /// Authenticates with username/password and returns the token pair.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .map_err(|err| ApiError::transport(&err))?;

        decode(response).await
    }

    /// Creates a new account. No token is issued.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        firstname: &str,
        lastname: &str,
    ) -> ApiResult<()> {
        let response = self
            .http
            .post(format!("{}/auth/register", self.base_url))
            .json(&json!({
                "username": username,
                "password": password,
                "firstname": firstname,
                "lastname": lastname,
            }))
            .send()
            .await
            .map_err(|err| ApiError::transport(&err))?;

        decode_empty(response).await
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<TokenRefreshResponse> {
        let response = self
            .http
            .post(format!("{}/auth/refresh", self.base_url))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|err| ApiError::transport(&err))?;

        decode(response).await
    }

    /// Fetches a user profile. Doubles as the access-token validity probe:
    /// a 401 here is the session manager's refresh trigger.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn get_user_profile(&self, user_id: i64) -> ApiResult<Profile> {
        let response = self
            .http
            .get(format!("{}/users/{user_id}", self.base_url))
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|err| ApiError::transport(&err))?;

        decode(response).await
    }

    /// Submits a new transaction.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn add_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> ApiResult<TransactionRecord> {
        let response = self
            .http
            .post(format!("{}/transactions/", self.base_url))
            .header("Authorization", self.bearer())
            .json(transaction)
            .send()
            .await
            .map_err(|err| ApiError::transport(&err))?;

        decode(response).await
    }

    /// Lists the user's transactions, newest first.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn get_transactions(
        &self,
        skip: i64,
        limit: i64,
    ) -> ApiResult<Vec<TransactionRecord>> {
        let response = self
            .http
            .get(format!("{}/transactions/", self.base_url))
            .query(&[("skip", skip), ("limit", limit)])
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|err| ApiError::transport(&err))?;

        decode(response).await
    }

    /// Lists the available spending categories.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn get_categories(&self) -> ApiResult<Vec<Category>> {
        let response = self
            .http
            .get(format!("{}/categories/", self.base_url))
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|err| ApiError::transport(&err))?;

        decode(response).await
    }

    /// Fetches the categorized spending summary.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn get_spending_summary(&self) -> ApiResult<SpendingSummary> {
        let response = self
            .http
            .get(format!("{}/statistics/summary_spend", self.base_url))
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|err| ApiError::transport(&err))?;

        decode(response).await
    }
}

/// Decodes a JSON response body, mapping non-2xx statuses to [`ApiError`].
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::http_status(status.as_u16(), &body));
    }
    response.json().await.map_err(|err| ApiError::parse(&err))
}

/// Checks a bodyless response for success.
async fn decode_empty(response: reqwest::Response) -> ApiResult<()> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::http_status(status.as_u16(), &body));
    }
    Ok(())
}
