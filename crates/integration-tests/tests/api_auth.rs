//! Integration tests for registration, login, and the authentication gate.
//!
//! These tests require a running API server and database; see the crate
//! docs for setup. Run with:
//! `cargo test -p campus-market-integration-tests -- --ignored`

use campus_market_integration_tests::{active_user, base_url, client, login, register, unique_email};
use reqwest::StatusCode;
use serde_json::{Value, json};

const PASSWORD: &str = "correct horse battery";

// ============================================================================
// Register → Login Round-Trip
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_then_login_yields_same_user() {
    let client = client();
    let email = unique_email("roundtrip");

    let register_token = register(&client, &email, PASSWORD).await;
    let registered = active_user(&client, &register_token).await;

    let resp = login(&client, &email, PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read login response");
    let login_token = body["token"].as_str().expect("Login response missing token");

    let logged_in = active_user(&client, login_token).await;
    assert_eq!(logged_in["id"], registered["id"]);
    assert_eq!(logged_in["email"], email);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_duplicate_email_conflicts() {
    let client = client();
    let email = unique_email("duplicate");

    register(&client, &email, PASSWORD).await;

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "name": "Second",
            "password": PASSWORD,
            "email": email,
            "level": 1,
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_missing_name_is_rejected() {
    let client = client();

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "password": PASSWORD,
            "email": unique_email("missing-name"),
            "level": 1,
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to read error body");
    assert_eq!(body["message"], "name is missing");
}

// ============================================================================
// Login Failures
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_unknown_email_is_404() {
    let client = client();
    let resp = login(&client, &unique_email("never-registered"), PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_wrong_password_is_401() {
    let client = client();
    let email = unique_email("wrong-password");
    register(&client, &email, PASSWORD).await;

    let resp = login(&client, &email, "definitely not it").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Authentication Gate
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_missing_token_is_403() {
    let client = client();

    let resp = client
        .get(format!("{}/api/auth/active_user", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to read error body");
    assert_eq!(body["message"], "No token provided");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_tampered_token_is_403() {
    let client = client();
    let email = unique_email("tampered");
    let mut token = register(&client, &email, PASSWORD).await;

    // Flip the last signature character
    let last = token.pop().expect("token is not empty");
    token.push(if last == 'A' { 'B' } else { 'A' });

    let resp = client
        .get(format!("{}/api/auth/active_user", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
