//! Request/response types for the expense-tracker backend.

use serde::{Deserialize, Serialize};

/// Result of a healthcheck probe against one backend instance.
///
/// Ephemeral diagnostic value; a transport failure maps to
/// [`ConnectionStatus::unknown`] rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    /// HTTP status code, -1 when the backend was unreachable
    pub status_code: i32,
    /// Backend-reported status text ("healthy"), "Unknown" otherwise
    pub status: String,
}

impl ConnectionStatus {
    /// Sentinel status for an unreachable backend.
    pub fn unknown() -> Self {
        Self {
            status_code: -1,
            status: "Unknown".to_string(),
        }
    }

    /// Returns whether the probe reached a healthy backend.
    pub fn is_healthy(&self) -> bool {
        self.status_code == 200
    }
}

/// Body of `GET /healthcheck`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthcheckResponse {
    pub status: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Body of `POST /auth/refresh`.
///
/// Only a new access token is issued; the refresh token stays valid.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
}

/// Body of `GET /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
}

/// A transaction to submit via `POST /transactions/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub amount: f64,
    pub category_id: i64,
    /// "expense" or "income"
    pub transaction_type: String,
    pub note: String,
    /// ISO-8601 timestamp
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

/// A stored transaction as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub category_id: i64,
    pub transaction_type: Option<String>,
    pub note: Option<String>,
    pub date: Option<String>,
    pub vendor: Option<String>,
}

/// A spending category.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
}

/// Per-category share of total spending.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryBreakdown {
    pub category_name: String,
    pub total_amount: f64,
    pub percentage: f64,
    pub color: Option<String>,
}

/// Body of `GET /statistics/summary_spend`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpendingSummary {
    pub total_spend: f64,
    pub category_breakdown: Vec<CategoryBreakdown>,
    #[serde(default)]
    pub transaction_history: Vec<TransactionRecord>,
}
