//! Integration tests for the favorite-store lifecycle.

use campus_market_integration_tests::{
    active_user, admin_token, base_url, client, create_store, register, unique_email,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

const PASSWORD: &str = "correct horse battery";

async fn list_favorites(client: &reqwest::Client, token: &str) -> Vec<Value> {
    let resp = client
        .get(format!("{}/api/favorite_stores", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to list favorites");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read favorites");
    body.as_array().expect("Favorites is not an array").clone()
}

// ============================================================================
// Add / Duplicate / Remove
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server, database, and admin credentials"]
async fn test_favorite_lifecycle() {
    let client = client();
    let admin = admin_token(&client).await;
    let store = create_store(&client, &admin, "Favorite Shop").await;

    let token = register(&client, &unique_email("favoriter"), PASSWORD).await;
    let add = json!({ "storeId": store["id"] });

    // Add
    let resp = client
        .post(format!("{}/api/favorite_stores", base_url()))
        .bearer_auth(&token)
        .json(&add)
        .send()
        .await
        .expect("Failed to add favorite");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let favorite: Value = resp.json().await.expect("Failed to read favorite");

    // Second identical add conflicts, exactly one row remains
    let resp = client
        .post(format!("{}/api/favorite_stores", base_url()))
        .bearer_auth(&token)
        .json(&add)
        .send()
        .await
        .expect("Failed to send duplicate add");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(list_favorites(&client, &token).await.len(), 1);

    // The favorite shows up on the active user with the store resolved
    let me = active_user(&client, &token).await;
    let resolved = me["favoriteStores"]
        .as_array()
        .expect("favoriteStores is not an array");
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0]["store"]["name"], "Favorite Shop");

    // Remove, then the listing no longer includes it
    let resp = client
        .delete(format!(
            "{}/api/favorite_stores/{}",
            base_url(),
            favorite["id"]
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to remove favorite");
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(list_favorites(&client, &token).await.len(), 0);
}

#[tokio::test]
#[ignore = "Requires running API server, database, and admin credentials"]
async fn test_user_cannot_remove_another_users_favorite() {
    let client = client();
    let admin = admin_token(&client).await;
    let store = create_store(&client, &admin, "Contested Shop").await;

    let owner = register(&client, &unique_email("owner"), PASSWORD).await;
    let intruder = register(&client, &unique_email("intruder"), PASSWORD).await;

    let resp = client
        .post(format!("{}/api/favorite_stores", base_url()))
        .bearer_auth(&owner)
        .json(&json!({ "storeId": store["id"] }))
        .send()
        .await
        .expect("Failed to add favorite");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let favorite: Value = resp.json().await.expect("Failed to read favorite");

    let resp = client
        .delete(format!(
            "{}/api/favorite_stores/{}",
            base_url(),
            favorite["id"]
        ))
        .bearer_auth(&intruder)
        .send()
        .await
        .expect("Failed to send remove request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Still present for the owner
    assert_eq!(list_favorites(&client, &owner).await.len(), 1);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_regular_user_cannot_add_favorite_for_another_user() {
    let client = client();

    let actor = register(&client, &unique_email("actor"), PASSWORD).await;
    let target_token = register(&client, &unique_email("target"), PASSWORD).await;
    let target = active_user(&client, &target_token).await;

    let resp = client
        .post(format!("{}/api/favorite_stores", base_url()))
        .bearer_auth(&actor)
        .json(&json!({ "userId": target["id"], "storeId": 1 }))
        .send()
        .await
        .expect("Failed to send add request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_remove_unknown_favorite_is_404() {
    let client = client();
    let token = register(&client, &unique_email("ghost"), PASSWORD).await;

    let resp = client
        .delete(format!("{}/api/favorite_stores/999999999", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send remove request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
