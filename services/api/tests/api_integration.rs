//! End-to-end tests for the pharmacy API service
//!
//! Each test spawns the full router on an ephemeral port and drives it over
//! HTTP. The tests require a running PostgreSQL instance and are skipped when
//! DATABASE_URL is not set.

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;
use serde_json::{Value, json};
use serial_test::serial;
use sqlx::postgres::PgPoolOptions;

use api::repositories::{MedicineRepository, TokenRepository, UserRepository};
use api::routes::create_router;
use api::state::AppState;

/// Spawn the service against the configured database
///
/// Returns the base URL of the spawned server, or None when DATABASE_URL is
/// not set.
async fn spawn_server() -> Option<String> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping end-to-end test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to test database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("failed to apply migrations");

    let state = AppState {
        db_pool: pool.clone(),
        medicine_repository: MedicineRepository::new(pool.clone()),
        token_repository: TokenRepository::new(pool.clone()),
        user_repository: UserRepository::new(pool),
    };

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener
        .local_addr()
        .expect("failed to read listener address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });

    Some(format!("http://{}", addr))
}

/// Unique email per test run so the shared database stays reusable
fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();

    format!("{}-{}@example.com", prefix, nanos)
}

#[tokio::test]
#[serial]
async fn test_medicine_create_then_retrieve() {
    let Some(base) = spawn_server().await else {
        return;
    };
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/medicines", base))
        .json(&json!({ "name": "Aspirin", "price": 4.99, "quantity": 120 }))
        .send()
        .await
        .expect("create request failed");
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: Value = response.json().await.expect("create response not JSON");
    assert_eq!(created["name"], "Aspirin");
    assert_eq!(created["price"].as_f64(), Some(4.99));
    assert_eq!(created["quantity"], 120);

    let id = created["id"].as_i64().expect("created record has no id");

    let response = client
        .get(format!("{}/api/medicines/{}", base, id))
        .send()
        .await
        .expect("retrieve request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let fetched: Value = response.json().await.expect("retrieve response not JSON");
    assert_eq!(fetched, created);
}

#[tokio::test]
#[serial]
async fn test_listing_grows_by_created_count() {
    let Some(base) = spawn_server().await else {
        return;
    };
    let client = reqwest::Client::new();

    let before: Value = client
        .get(format!("{}/api/medicines", base))
        .send()
        .await
        .expect("list request failed")
        .json()
        .await
        .expect("list response not JSON");
    let before_count = before.as_array().expect("list is not an array").len();

    for i in 0..3 {
        let response = client
            .post(format!("{}/api/medicines", base))
            .json(&json!({ "name": format!("Vitamin {}", i), "price": 1.5, "quantity": 10 }))
            .send()
            .await
            .expect("create request failed");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let after: Value = client
        .get(format!("{}/api/medicines", base))
        .send()
        .await
        .expect("list request failed")
        .json()
        .await
        .expect("list response not JSON");
    let after_count = after.as_array().expect("list is not an array").len();

    assert_eq!(after_count, before_count + 3);
}

#[tokio::test]
#[serial]
async fn test_medicine_update_patch_delete_roundtrip() {
    let Some(base) = spawn_server().await else {
        return;
    };
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/api/medicines", base))
        .json(&json!({ "name": "Amoxicillin", "price": 12.0, "quantity": 30 }))
        .send()
        .await
        .expect("create request failed")
        .json()
        .await
        .expect("create response not JSON");
    let id = created["id"].as_i64().expect("created record has no id");

    // Full replacement
    let response = client
        .put(format!("{}/api/medicines/{}", base, id))
        .json(&json!({ "name": "Amoxicillin 500mg", "price": 14.5, "quantity": 25 }))
        .send()
        .await
        .expect("update request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Value = response.json().await.expect("update response not JSON");
    assert_eq!(updated["name"], "Amoxicillin 500mg");
    assert_eq!(updated["price"].as_f64(), Some(14.5));
    assert_eq!(updated["quantity"], 25);

    // Partial update keeps the other fields
    let response = client
        .patch(format!("{}/api/medicines/{}", base, id))
        .json(&json!({ "quantity": 20 }))
        .send()
        .await
        .expect("patch request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let patched: Value = response.json().await.expect("patch response not JSON");
    assert_eq!(patched["name"], "Amoxicillin 500mg");
    assert_eq!(patched["price"].as_f64(), Some(14.5));
    assert_eq!(patched["quantity"], 20);

    // Delete, then the record is gone
    let response = client
        .delete(format!("{}/api/medicines/{}", base, id))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .get(format!("{}/api/medicines/{}", base, id))
        .send()
        .await
        .expect("retrieve request failed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response.json().await.expect("error response not JSON");
    assert_eq!(body, json!({"error": "Medicine not found"}));

    let response = client
        .delete(format!("{}/api/medicines/{}", base, id))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_register_then_duplicate_register() {
    let Some(base) = spawn_server().await else {
        return;
    };
    let client = reqwest::Client::new();
    let email = unique_email("register");

    let response = client
        .post(format!("{}/api/register", base))
        .json(&json!({ "email": email, "password": "p1", "name": "Alice" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("register response not JSON");
    assert!(
        !body["token"].as_str().unwrap_or_default().is_empty(),
        "register issued no token"
    );
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["name"], "Alice");
    assert!(body["user"]["id"].is_i64());

    let response = client
        .post(format!("{}/api/register", base))
        .json(&json!({ "email": email, "password": "p2" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("error response not JSON");
    assert_eq!(body, json!({"error": "User already exists"}));
}

#[tokio::test]
#[serial]
async fn test_login_returns_registration_token() {
    let Some(base) = spawn_server().await else {
        return;
    };
    let client = reqwest::Client::new();
    let email = unique_email("login");

    let registered: Value = client
        .post(format!("{}/api/register", base))
        .json(&json!({ "email": email, "password": "p1", "name": "Bob" }))
        .send()
        .await
        .expect("register request failed")
        .json()
        .await
        .expect("register response not JSON");
    let token = registered["token"].as_str().expect("register issued no token");

    let response = client
        .post(format!("{}/api/login", base))
        .json(&json!({ "email": email, "password": "p1" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("login response not JSON");
    assert_eq!(body["token"], token);
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["name"], "Bob");

    // Wrong password issues nothing
    let response = client
        .post(format!("{}/api/login", base))
        .json(&json!({ "email": email, "password": "wrong" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("error response not JSON");
    assert_eq!(body, json!({"error": "Invalid credentials"}));
}

#[tokio::test]
#[serial]
async fn test_get_user_requires_bearer_token() {
    let Some(base) = spawn_server().await else {
        return;
    };
    let client = reqwest::Client::new();
    let email = unique_email("whoami");

    let registered: Value = client
        .post(format!("{}/api/register", base))
        .json(&json!({ "email": email, "password": "p1", "name": "Carol" }))
        .send()
        .await
        .expect("register request failed")
        .json()
        .await
        .expect("register response not JSON");
    let token = registered["token"].as_str().expect("register issued no token");
    let user_id = registered["user"]["id"].as_i64().expect("user has no id");

    // No token
    let response = client
        .get(format!("{}/api/user", base))
        .send()
        .await
        .expect("get_user request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.expect("error response not JSON");
    assert_eq!(body, json!({"error": "Not authenticated"}));

    // Unknown token
    let response = client
        .get(format!("{}/api/user", base))
        .header("Authorization", "Bearer not-a-real-token")
        .send()
        .await
        .expect("get_user request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Issued token
    let response = client
        .get(format!("{}/api/user", base))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("get_user request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("get_user response not JSON");
    assert_eq!(
        body,
        json!({ "id": user_id, "email": email, "name": "Carol" })
    );
}
