//! Custom error types for the backend service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message sent for any failure the caller cannot act on
pub const SERVER_ERROR: &str = "Server error";

/// Errors surfaced by the auth endpoints
#[derive(Error, Debug)]
pub enum AuthError {
    /// Weak password, missing field or unreadable body
    #[error("{0}")]
    Validation(String),

    #[error("Email already registered.")]
    EmailTaken,

    /// Same message for unknown email and wrong password
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(#[source] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::EmailTaken | AuthError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            AuthError::Database(_) | AuthError::Hashing(_) | AuthError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status.is_server_error() {
            error!("{}", self);
            SERVER_ERROR.to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for auth results
pub type AuthResult<T> = Result<T, AuthError>;
