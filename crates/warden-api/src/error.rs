//! API error handling
//!
//! Author: hephaex@gmail.com

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use warden_core::WardenError;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    InvalidCredentials,
    DuplicateUsername(String),
    TokenExpired,
    TokenInvalid,
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("VALIDATION_ERROR", msg))
            }
            // One body for unknown usernames and wrong passwords
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("INVALID_CREDENTIALS", "Invalid username or password"),
            ),
            AppError::DuplicateUsername(name) => (
                StatusCode::CONFLICT,
                ApiError::new(
                    "DUPLICATE_USERNAME",
                    format!("Username '{name}' is already taken"),
                ),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("TOKEN_EXPIRED", "Token has expired"),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("TOKEN_INVALID", "Invalid token"),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal_error().with_details(msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<WardenError> for AppError {
    fn from(err: WardenError) -> Self {
        match err {
            WardenError::InvalidCredentials => AppError::InvalidCredentials,
            WardenError::DuplicateUsername(name) => AppError::DuplicateUsername(name),
            WardenError::Validation(msg) => AppError::BadRequest(msg),
            WardenError::TokenInvalid => AppError::TokenInvalid,
            WardenError::TokenExpired => AppError::TokenExpired,
            WardenError::NotFound(msg) => AppError::NotFound(msg),
            WardenError::Store(msg) => AppError::Internal(msg),
            WardenError::Internal(msg) => AppError::Internal(msg),
            WardenError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}
