//! Authentication API handlers
//!
//! Provides HTTP endpoints for registration, login, and the current-user
//! profile.
//!
//! Author: hephaex@gmail.com

use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::auth::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use warden_core::{AuthenticatedIdentity, Credentials};

/// Registration response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user_id: String,
    pub username: String,
    pub role: String,
    pub message: String,
}

/// Register a new user account
///
/// Creates a new account with the provided username and password. New
/// accounts are assigned the USER role.
///
/// # Request Body
///
/// * `username` - Unique login name (1-64 characters, no whitespace)
/// * `password` - Plaintext password (1-128 characters), stored only as a hash
///
/// # Responses
///
/// * `201 Created` - Account successfully registered
/// * `400 Bad Request` - Invalid username or password
/// * `409 Conflict` - Username already taken
/// * `500 Internal Server Error` - Server error
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered successfully", body = RegisterResponse),
        (status = 400, description = "Invalid input", body = crate::error::ApiError),
        (status = 409, description = "Username already taken", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ip_address = extract_ip_address(&headers);
    let user_agent = extract_user_agent(&headers);

    let credentials = Credentials {
        username: request.username,
        password: request.password,
    };

    match state.auth.register(&credentials).await {
        Ok(record) => {
            audit_log(&AuditEvent::RegistrationSuccess {
                user_id: record.id,
                username: record.username.clone(),
                ip_address,
                user_agent,
            });

            let response = RegisterResponse {
                user_id: record.id.to_string(),
                username: record.username,
                role: record.role.to_string(),
                message: "Registration successful".to_string(),
            };

            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => {
            audit_log(&AuditEvent::RegistrationFailure {
                username: credentials.username.clone(),
                reason: e.to_string(),
                ip_address,
                user_agent,
            });

            Err(e.into())
        }
    }
}

/// Login with username and password
///
/// Verifies the credentials and returns a JWT access token. Unknown
/// usernames and wrong passwords produce the same 401 response.
///
/// # Request Body
///
/// * `username` - Login name
/// * `password` - Plaintext password
///
/// # Responses
///
/// * `200 OK` - Authentication successful, returns access token
/// * `400 Bad Request` - Malformed request body
/// * `401 Unauthorized` - Invalid credentials
/// * `500 Internal Server Error` - Server error
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ip_address = extract_ip_address(&headers);
    let user_agent = extract_user_agent(&headers);

    let credentials = Credentials {
        username: request.username,
        password: request.password,
    };

    match state.auth.login(&credentials).await {
        Ok(response) => {
            audit_log(&AuditEvent::LoginSuccess {
                username: credentials.username.clone(),
                ip_address,
                user_agent,
            });

            Ok(Json(response))
        }
        Err(e) => {
            audit_log(&AuditEvent::LoginFailure {
                username: credentials.username.clone(),
                reason: e.to_string(),
                ip_address,
                user_agent,
            });

            Err(e.into())
        }
    }
}

/// Get current user profile
///
/// Returns the account information for the authenticated user. Requires a
/// valid Bearer token.
///
/// # Responses
///
/// * `200 OK` - Current user profile
/// * `401 Unauthorized` - Invalid or missing authentication
/// * `404 Not Found` - Account no longer exists
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user profile", body = UserInfo),
        (status = 401, description = "Unauthorized", body = crate::error::ApiError),
        (status = 404, description = "Account not found", body = crate::error::ApiError),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Result<impl IntoResponse, AppError> {
    let user_info = state.auth.get_user(&identity.username).await?;

    Ok(Json(user_info))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_response_serialization() {
        let response = RegisterResponse {
            user_id: "8d8ac610-566d-4ef0-9c22-186b2a5ed793".to_string(),
            username: "alice".to_string(),
            role: "USER".to_string(),
            message: "Registration successful".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("alice"));
        assert!(json.contains("USER"));
    }
}
