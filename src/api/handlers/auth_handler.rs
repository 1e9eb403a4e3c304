//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{MSG_LOGGED_IN, MSG_REGISTERED};
use crate::errors::AppResult;
use crate::types::{AuthResponse, Created};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User display name
    #[validate(required, length(min = 1, max = 255))]
    #[schema(example = "Ann", max_length = 255)]
    pub name: Option<String>,
    /// User email address
    #[validate(required, email, length(max = 255))]
    #[schema(example = "a@x.com", max_length = 255)]
    pub email: Option<String>,
    /// User password (minimum 8 characters)
    #[validate(required, length(min = 8))]
    #[schema(example = "password1", min_length = 8)]
    pub password: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(required, email)]
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
    /// User password
    #[validate(required, length(min = 1))]
    #[schema(example = "password1")]
    pub password: Option<String>,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Malformed JSON body", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already exists", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation error", body = crate::errors::ErrorResponse),
        (status = 500, description = "Database or unexpected error", body = crate::errors::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<AuthResponse>> {
    // Presence was checked by the extractor
    let user = state
        .auth_service
        .register(
            payload.name.unwrap_or_default(),
            payload.email.unwrap_or_default(),
            payload.password.unwrap_or_default(),
        )
        .await?;

    Ok(Created(AuthResponse::new(MSG_REGISTERED, user)))
}

/// Check credentials and return the user
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Malformed JSON body", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse),
        (status = 422, description = "Validation error", body = crate::errors::ErrorResponse),
        (status = 500, description = "Database or unexpected error", body = crate::errors::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state
        .auth_service
        .login(
            payload.email.unwrap_or_default(),
            payload.password.unwrap_or_default(),
        )
        .await?;

    Ok(Json(AuthResponse::new(MSG_LOGGED_IN, user)))
}
