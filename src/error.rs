//! Error types for Hubview
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use thiserror::Error;

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// in the application. It implements `IntoResponse` to
/// automatically convert errors to appropriate HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-supplied identifier fails the GitHub name grammar (400)
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Upstream resource absent (404)
    #[error("{0} not found")]
    NotFound(String),

    /// Upstream failure: network, 5xx, timeout, malformed body (500)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Username already registered (409, rendered inline)
    #[error("Username is already taken")]
    DuplicateUsername,

    /// Login failed; deliberately covers both unknown user and wrong
    /// password so the response carries no enumeration signal
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Authentication required (redirect to login)
    #[error("Authentication required")]
    Unauthorized,

    /// Validation error (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Page-facing errors become styled HTML error pages; credential
    /// failures redirect to the login page without leaking a status.
    /// Storage/config/internal details are logged, never rendered.
    fn into_response(self) -> Response {
        use crate::web::render::error_page;

        match &self {
            AppError::InvalidCredentials | AppError::Unauthorized => {
                return Redirect::to("/login").into_response();
            }
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
            }
            AppError::Upstream(detail) => {
                tracing::error!(%detail, "upstream request failed");
            }
            _ => {}
        }

        let (status, message) = match &self {
            AppError::InvalidIdentifier(_) | AppError::Validation(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::DuplicateUsername => (StatusCode::CONFLICT, self.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        };

        (status, Html(error_page(&message))).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
