//! Shared helpers for Bazaar end-to-end tests.
//!
//! # Running Tests
//!
//! ```bash
//! # Database up and migrated
//! cargo run -p bazaar-cli -- migrate
//!
//! # Server running
//! cargo run -p bazaar-api
//!
//! # Run the ignored end-to-end tests
//! cargo test -p bazaar-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `BAZAAR_BASE_URL` - server root (default `http://localhost:8080`)
//! - `API_DATABASE_URL` / `DATABASE_URL` - used to promote a test admin

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use reqwest::{Client, Response, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use uuid::Uuid;

use bazaar_api::db::{UserRepository, create_pool};
use bazaar_core::{Email, UserRole};

/// Password used for every account the tests register.
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Server root, e.g. `http://localhost:8080`.
#[must_use]
pub fn base_url() -> String {
    std::env::var("BAZAAR_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Absolute URL for a path under `/api/v1`.
#[must_use]
pub fn api_url(path: &str) -> String {
    format!("{}/api/v1{path}", base_url())
}

/// A fresh address so tests never collide across runs.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", Uuid::new_v4().simple())
}

/// HTTP client for the tests.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// Read a response as `(status, json body)`.
pub async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

/// Register a customer and return the auth payload (`data` of the envelope).
pub async fn register(client: &Client, email: &str) -> Value {
    let response = client
        .post(api_url("/auth/register"))
        .json(&json!({
            "email": email,
            "password": TEST_PASSWORD,
            "first_name": "Test",
            "last_name": "Shopper",
        }))
        .send()
        .await
        .expect("register request failed");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["data"].clone()
}

/// Log in and return the auth payload.
pub async fn login(client: &Client, email: &str) -> Value {
    let response = client
        .post(api_url("/auth/login"))
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .send()
        .await
        .expect("login request failed");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::CREATED, "login failed: {body}");
    body["data"].clone()
}

/// Register an account, promote it to admin directly in the database, and
/// return a fresh access token carrying the admin role.
pub async fn admin_token(client: &Client) -> String {
    let email = unique_email();
    register(client, &email).await;

    let database_url = std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .expect("API_DATABASE_URL or DATABASE_URL must be set");
    let pool = create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    UserRepository::new(&pool)
        .set_role(&Email::parse(&email).expect("valid email"), UserRole::Admin)
        .await
        .expect("Failed to promote test admin");

    access_token(&login(client, &email).await)
}

/// Pull the access token out of an auth payload.
#[must_use]
pub fn access_token(auth: &Value) -> String {
    auth["access_token"]
        .as_str()
        .expect("auth payload has an access token")
        .to_owned()
}
