//! Shared helpers for Campus Market integration tests.
//!
//! The tests in `tests/` require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`campus-cli migrate`)
//! - The API server running (`cargo run -p campus-market-api`)
//! - For admin scenarios: an administrator account
//!   (`campus-cli admin create`) with its credentials in
//!   `CAMPUS_ADMIN_EMAIL` / `CAMPUS_ADMIN_PASSWORD`
//!
//! All tests are `#[ignore]`d so `cargo test` stays green without the
//! server; run them with `cargo test -p campus-market-integration-tests -- --ignored`.

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CAMPUS_API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder().build().expect("Failed to create HTTP client")
}

/// Generate an email address unique to this test run.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@campus.edu", uuid::Uuid::new_v4().simple())
}

/// Register a user and return the issued bearer token.
///
/// # Panics
///
/// Panics if the registration request fails or returns no token.
pub async fn register(client: &Client, email: &str, password: &str) -> String {
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "name": "Test User",
            "password": password,
            "email": email,
            "level": 1,
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to read register response");
    body["token"]
        .as_str()
        .expect("Register response missing token")
        .to_owned()
}

/// Send a login request.
///
/// # Panics
///
/// Panics if the request cannot be sent.
pub async fn login(client: &Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request")
}

/// Fetch the active user for a token.
///
/// # Panics
///
/// Panics if the request fails or the response is not valid JSON.
pub async fn active_user(client: &Client, token: &str) -> Value {
    let resp = client
        .get(format!("{}/api/auth/active_user", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to fetch active user");

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    resp.json().await.expect("Failed to read active user")
}

/// Login as the configured administrator.
///
/// # Panics
///
/// Panics with a setup hint when `CAMPUS_ADMIN_EMAIL` /
/// `CAMPUS_ADMIN_PASSWORD` are not set or the login fails.
pub async fn admin_token(client: &Client) -> String {
    let email = std::env::var("CAMPUS_ADMIN_EMAIL")
        .expect("Set CAMPUS_ADMIN_EMAIL (create the account with `campus-cli admin create`)");
    let password = std::env::var("CAMPUS_ADMIN_PASSWORD").expect("Set CAMPUS_ADMIN_PASSWORD");

    let resp = login(client, &email, &password).await;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read admin login response");
    body["token"]
        .as_str()
        .expect("Admin login response missing token")
        .to_owned()
}

/// Create a store as admin and return its JSON record.
///
/// # Panics
///
/// Panics if the creation request fails.
pub async fn create_store(client: &Client, token: &str, name: &str) -> Value {
    let resp = client
        .post(format!("{}/api/stores", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "name": name,
            "type": "test",
            "latitude": 1.0,
            "longitude": 2.0,
        }))
        .send()
        .await
        .expect("Failed to create store");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.expect("Failed to read store response")
}
