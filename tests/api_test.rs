//! Integration tests for API endpoints.
//!
//! The router runs against the in-memory user store, so no database is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_api::api::{create_router, AppState};
use auth_api::domain::{NewUser, User};
use auth_api::errors::{AppError, AppResult};
use auth_api::infra::{InMemoryUserStore, UserRepository};
use auth_api::services::{Argon2Credentials, CredentialService};

// =============================================================================
// Test Helpers
// =============================================================================

fn app() -> (Router, Arc<InMemoryUserStore>) {
    let store = Arc::new(InMemoryUserStore::new());
    let state = AppState::new(store.clone(), Arc::new(Argon2Credentials));
    (create_router(state), store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

fn ann() -> Value {
    json!({ "name": "Ann", "email": "a@x.com", "password": "password1" })
}

/// Store whose every call fails with a database error carrying internal detail
struct BrokenStore;

#[async_trait]
impl UserRepository for BrokenStore {
    async fn find_by_email(&self, _email: &str) -> AppResult<Option<User>> {
        Err(sea_orm::DbErr::Custom("connection to 10.1.2.3:5432 refused".into()).into())
    }

    async fn create(&self, _new_user: NewUser) -> AppResult<User> {
        Err(sea_orm::DbErr::Custom("connection to 10.1.2.3:5432 refused".into()).into())
    }

    async fn ping(&self) -> AppResult<()> {
        Err(sea_orm::DbErr::Custom("connection to 10.1.2.3:5432 refused".into()).into())
    }
}

/// Hasher that fails unexpectedly
struct BrokenHasher;

impl CredentialService for BrokenHasher {
    fn hash(&self, _plain_text: &str) -> AppResult<String> {
        Err(AppError::internal("rng unavailable: /dev/urandom"))
    }

    fn verify(&self, _plain_text: &str, _hash: &str) -> bool {
        false
    }
}

// =============================================================================
// Registration & Login Flow
// =============================================================================

#[tokio::test]
async fn test_register_conflict_and_login_flow() {
    let (app, store) = app();

    let (status, body) = post(&app, "/register", ann()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["name"], "Ann");
    assert_eq!(body["user"]["email"], "a@x.com");

    let stored = store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "password1");
    assert_eq!(body["user"]["id"], stored.id.to_string());

    let (status, body) = post(&app, "/register", ann()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "Email already exists" }));
    assert_eq!(store.len().await, 1);

    let (status, body) = post(
        &app,
        "/login",
        json!({ "email": "a@x.com", "password": "wrong" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid credentials" }));

    let (status, body) = post(
        &app,
        "/login",
        json!({ "email": "a@x.com", "password": "password1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"], stored.id.to_string());
}

#[tokio::test]
async fn test_responses_never_carry_password_material() {
    let (app, _) = app();

    let (_, registered) = post(&app, "/register", ann()).await;
    let (_, logged_in) = post(
        &app,
        "/login",
        json!({ "email": "a@x.com", "password": "password1" }),
    )
    .await;

    for body in [registered, logged_in] {
        let user = body["user"].as_object().unwrap();
        assert!(!user.contains_key("password"));
        assert!(!user.contains_key("password_hash"));
        assert!(!body.to_string().contains("argon2"));
    }
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_look_identical() {
    let (app, _) = app();
    post(&app, "/register", ann()).await;

    let wrong_password = post(
        &app,
        "/login",
        json!({ "email": "a@x.com", "password": "password2" }),
    )
    .await;
    let unknown_email = post(
        &app,
        "/login",
        json!({ "email": "nobody@x.com", "password": "password1" }),
    )
    .await;

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_register_validation_messages() {
    let (app, store) = app();

    let (status, body) = post(
        &app,
        "/register",
        json!({ "name": "", "email": "not-an-email", "password": "short" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "The given data was invalid.");
    assert_eq!(body["errors"]["name"], json!(["The name field is required."]));
    assert_eq!(
        body["errors"]["email"],
        json!(["The email field must be a valid email address."])
    );
    assert_eq!(
        body["errors"]["password"],
        json!(["The password field must be at least 8 characters."])
    );
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let (app, _) = app();

    let (status, body) = post(&app, "/register", json!({})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    for field in ["name", "email", "password"] {
        assert_eq!(
            body["errors"][field],
            json!([format!("The {} field is required.", field)])
        );
    }
}

#[tokio::test]
async fn test_register_rejects_overlong_name() {
    let (app, _) = app();

    let (status, body) = post(
        &app,
        "/register",
        json!({ "name": "n".repeat(256), "email": "a@x.com", "password": "password1" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["name"],
        json!(["The name field must not be greater than 255 characters."])
    );
}

#[tokio::test]
async fn test_register_accepts_boundary_lengths() {
    let (app, _) = app();

    let (status, _) = post(
        &app,
        "/register",
        json!({ "name": "n".repeat(255), "email": "b@x.com", "password": "12345678" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_login_validation() {
    let (app, _) = app();

    let (status, body) = post(&app, "/login", json!({ "email": "nope" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["email"],
        json!(["The email field must be a valid email address."])
    );
    assert_eq!(
        body["errors"]["password"],
        json!(["The password field is required."])
    );
}

#[tokio::test]
async fn test_non_string_fields_are_validation_errors() {
    let (app, store) = app();

    let (status, body) = post(
        &app,
        "/register",
        json!({ "name": 123, "email": "a@x.com", "password": "password1" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "The given data was invalid.");
    assert_eq!(body["errors"], json!({ "name": ["The name field must be a string."] }));
    assert!(store.is_empty().await);

    let (status, body) = post(
        &app,
        "/login",
        json!({ "email": "a@x.com", "password": 12345678 }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"],
        json!({ "password": ["The password field must be a string."] })
    );
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let (app, store) = app();

    let (status, body) = post(
        &app,
        "/register",
        json!({ "name": "   ", "email": "a@x.com", "password": "password1" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["name"], json!(["The name field is required."]));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_padded_email_is_trimmed() {
    let (app, store) = app();

    let (status, body) = post(
        &app,
        "/register",
        json!({ "name": " Ann ", "email": " a@x.com ", "password": "password1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["name"], "Ann");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(store.find_by_email("a@x.com").await.unwrap().is_some());

    let (status, _) = post(
        &app,
        "/login",
        json!({ "email": "a@x.com ", "password": "password1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_password_whitespace_is_significant() {
    let (app, _) = app();
    post(
        &app,
        "/register",
        json!({ "name": "Ann", "email": "a@x.com", "password": " password1 " }),
    )
    .await;

    let (status, _) = post(
        &app,
        "/login",
        json!({ "email": "a@x.com", "password": "password1" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(
        &app,
        "/login",
        json!({ "email": "a@x.com", "password": " password1 " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _) = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Failure Sanitization
// =============================================================================

#[tokio::test]
async fn test_database_errors_are_sanitized() {
    let app = create_router(AppState::new(Arc::new(BrokenStore), Arc::new(Argon2Credentials)));

    let (status, body) = post(&app, "/register", ann()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Database error" }));

    let (status, body) = post(
        &app,
        "/login",
        json!({ "email": "a@x.com", "password": "password1" }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.to_string().contains("10.1.2.3"));
}

#[tokio::test]
async fn test_unexpected_errors_are_sanitized() {
    let store = Arc::new(InMemoryUserStore::new());
    let app = create_router(AppState::new(store.clone(), Arc::new(BrokenHasher)));

    let (status, body) = post(&app, "/register", ann()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "An unexpected error occurred" }));
    assert!(store.is_empty().await);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_registrations_create_one_user() {
    let (app, store) = app();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                post(
                    &app,
                    "/register",
                    json!({ "name": format!("User {i}"), "email": "race@x.com", "password": "password1" }),
                )
                .await
                .0
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    let conflicts = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();
    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(store.len().await, 1);
}

// =============================================================================
// Ambient Endpoints
// =============================================================================

#[tokio::test]
async fn test_health_reports_store_status() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");

    let broken = create_router(AppState::new(Arc::new(BrokenStore), Arc::new(Argon2Credentials)));
    let (status, body) = send(&broken, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/register").is_some());
    assert!(body["paths"].get("/login").is_some());
}
