//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::MSG_INVALID_DATA;

/// Field name -> messages, in field order
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Client input
    #[error("The given data was invalid.")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    // Resource state
    #[error("{0} already exists")]
    Conflict(String),

    // Authentication
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Infrastructure
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("An unexpected error occurred")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable error message
    #[schema(example = "Invalid credentials")]
    pub error: String,
    /// Per-field messages, present on validation failures only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FieldErrors>,
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the client-facing body.
    ///
    /// Database and internal details are logged here and never leave the process.
    fn body(self) -> ErrorResponse {
        match self {
            AppError::Validation(errors) => ErrorResponse {
                error: MSG_INVALID_DATA.to_string(),
                errors: Some(errors),
            },
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                ErrorResponse {
                    error: self.to_string(),
                    errors: None,
                }
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse {
                    error: self.to_string(),
                    errors: None,
                }
            }
            other => ErrorResponse {
                error: other.to_string(),
                errors: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.body())).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    /// Validation failure on a single field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        AppError::Validation(errors)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
