//! End-to-end tests for registration, login, and token handling.
//!
//! These tests require a migrated database and a running `bazaar-api`.

use bazaar_integration_tests::{
    TEST_PASSWORD, access_token, api_url, client, json_body, login, register, unique_email,
};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_email_is_rejected() {
    let client = client();
    let email = unique_email();
    register(&client, &email).await;

    let response = client
        .post(api_url("/auth/register"))
        .json(&json!({
            "email": email.to_uppercase(),
            "password": TEST_PASSWORD,
            "first_name": "Second",
            "last_name": "Attempt",
        }))
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_wrong_password_is_rejected() {
    let client = client();
    let email = unique_email();
    register(&client, &email).await;

    let response = client
        .post(api_url("/auth/login"))
        .json(&json!({ "email": email, "password": "not the password" }))
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert!(body.get("data").is_none());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_refresh_token_is_single_use() {
    let client = client();
    let email = unique_email();
    register(&client, &email).await;
    let auth = login(&client, &email).await;
    let refresh_token = auth["refresh_token"].as_str().unwrap().to_owned();

    let first = client
        .post(api_url("/auth/refresh"))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(first).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["data"]["refresh_token"], refresh_token.as_str());

    let replay = client
        .post(api_url("/auth/refresh"))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_logout_revokes_refresh_token() {
    let client = client();
    let auth = register(&client, &unique_email()).await;
    let refresh_token = auth["refresh_token"].as_str().unwrap().to_owned();

    let response = client
        .post(api_url("/auth/logout"))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(api_url("/auth/refresh"))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_profile_requires_token_and_updates() {
    let client = client();

    let anonymous = client.get(api_url("/users/profile")).send().await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let token = access_token(&register(&client, &unique_email()).await);
    let response = client
        .put(api_url("/users/profile"))
        .bearer_auth(&token)
        .json(&json!({ "first_name": "Renamed", "last_name": "Shopper", "phone": "+1 555 0100" }))
        .send()
        .await
        .unwrap();
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["first_name"], "Renamed");
    assert_eq!(body["data"]["phone"], "+1 555 0100");
}
