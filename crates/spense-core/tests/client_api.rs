//! API client tests against a wiremock backend.

use spense_core::api::{ApiClient, ApiErrorKind, NewTransaction};
use spense_core::session::SessionStore;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Base URL that refuses connections immediately.
const DEAD_URL: &str = "http://127.0.0.1:1";

#[tokio::test]
async fn test_login_returns_token_pair() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "username": "alice",
            "password": "pw",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "A1",
            "refresh_token": "R1",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri(), SessionStore::new());
    let tokens = client.login("alice", "pw").await.unwrap();

    assert_eq!(tokens.access_token, "A1");
    assert_eq!(tokens.refresh_token, "R1");
}

#[tokio::test]
async fn test_login_rejection_carries_backend_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "Invalid username or password",
        })))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri(), SessionStore::new());
    let err = client.login("alice", "wrong").await.unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Auth);
    assert_eq!(err.message, "HTTP 401: Invalid username or password");
}

#[tokio::test]
async fn test_register_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(serde_json::json!({
            "username": "alice",
            "password": "pw",
            "firstname": "Alice",
            "lastname": "Smith",
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri(), SessionStore::new());
    client
        .register("alice", "pw", "Alice", "Smith")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bearer_token_read_at_call_time() {
    let mock_server = MockServer::start().await;
    let store = SessionStore::new();
    store.login(7, "A1".to_string(), "R1".to_string());

    let profile = serde_json::json!({
        "id": 7,
        "username": "alice",
        "firstname": "Alice",
        "lastname": "Smith",
    });

    Mock::given(method("GET"))
        .and(path("/users/7"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/7"))
        .and(header("Authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri(), store.clone());
    client.get_user_profile(7).await.unwrap();

    // A refresh must take effect on the very next call, without rebuilding
    // the client.
    store.apply_refresh("A2".to_string());
    let fetched = client.get_user_profile(7).await.unwrap();
    assert_eq!(fetched.username, "alice");
}

#[tokio::test]
async fn test_profile_401_is_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/7"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Token has expired",
        })))
        .mount(&mock_server)
        .await;

    let store = SessionStore::new();
    store.login(7, "stale".to_string(), "R1".to_string());
    let client = ApiClient::new(mock_server.uri(), store);

    let err = client.get_user_profile(7).await.unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn test_healthcheck_reports_backend_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/healthcheck"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "healthy" })),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri(), SessionStore::new());
    let status = client.healthcheck().await;

    assert_eq!(status.status_code, 200);
    assert_eq!(status.status, "healthy");
    assert!(status.is_healthy());
}

#[tokio::test]
async fn test_healthcheck_unreachable_yields_sentinel() {
    let store = SessionStore::new();
    let client = ApiClient::new(DEAD_URL, store.clone());

    let status = client.healthcheck().await;

    assert_eq!(status.status_code, -1);
    assert_eq!(status.status, "Unknown");
    // Healthcheck never touches the session.
    assert!(!store.is_logged_in());
}

#[tokio::test]
async fn test_transactions_and_summary() {
    let mock_server = MockServer::start().await;
    let store = SessionStore::new();
    store.login(7, "A1".to_string(), "R1".to_string());

    Mock::given(method("POST"))
        .and(path("/transactions/"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 12,
            "user_id": 7,
            "amount": 19.99,
            "category_id": 3,
            "transaction_type": "expense",
            "note": "groceries",
            "date": "2025-03-01T12:00:00Z",
            "vendor": "Marketplace",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/transactions/"))
        .and(query_param("skip", "0"))
        .and(query_param("limit", "20"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": 12,
            "user_id": 7,
            "amount": 19.99,
            "category_id": 3,
            "transaction_type": "expense",
            "note": "groceries",
            "date": "2025-03-01T12:00:00Z",
            "vendor": null,
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/categories/"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 3, "name": "Groceries", "color": "#AABBCC" },
            { "id": 4, "name": "Transport", "color": null },
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/statistics/summary_spend"))
        .and(header("Authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_spend": 19.99,
            "category_breakdown": [{
                "category_name": "Groceries",
                "total_amount": 19.99,
                "percentage": 100.0,
                "color": "#AABBCC",
            }],
            "transaction_history": [],
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri(), store);

    let new_transaction = NewTransaction {
        amount: 19.99,
        category_id: 3,
        transaction_type: "expense".to_string(),
        note: "groceries".to_string(),
        date: "2025-03-01T12:00:00Z".to_string(),
        vendor: Some("Marketplace".to_string()),
    };
    let record = client.add_transaction(&new_transaction).await.unwrap();
    assert_eq!(record.id, 12);

    let listed = client.get_transactions(0, 20).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].note.as_deref(), Some("groceries"));

    let categories = client.get_categories().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "Groceries");

    let summary = client.get_spending_summary().await.unwrap();
    assert!((summary.total_spend - 19.99).abs() < f64::EPSILON);
    assert_eq!(summary.category_breakdown[0].category_name, "Groceries");
}
