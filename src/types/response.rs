//! Success response bodies shared by handlers.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{User, UserResponse};

/// `{message, user}` body returned by both auth endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// Outcome description
    #[schema(example = "Login successful")]
    pub message: String,
    /// The registered or authenticated user
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(message: impl Into<String>, user: User) -> Self {
        Self {
            message: message.into(),
            user: UserResponse::from(user),
        }
    }
}

/// Created response helper (201 with JSON body)
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}
