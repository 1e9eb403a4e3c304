//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::auth_handler;
use crate::domain::UserResponse;
use crate::errors::ErrorResponse;
use crate::types::AuthResponse;

/// OpenAPI documentation for the Auth API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Auth API",
        version = "0.1.0",
        description = "User registration and credential checks over JSON",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
    ),
    components(
        schemas(
            UserResponse,
            AuthResponse,
            ErrorResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
        )
    ),
    tags(
        (name = "Authentication", description = "User registration and login")
    )
)]
pub struct ApiDoc;
