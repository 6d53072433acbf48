/// Authentication middleware for protecting routes
///
/// Extracts and verifies the Bearer token from the Authorization header.
/// On success, adds the authenticated identity to request extensions.
use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use thiserror::Error;
use warden_core::WardenError;

/// Authentication middleware errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] WardenError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AuthError::MissingAuthHeader => ("MISSING_TOKEN", "Missing Authorization header"),
            AuthError::InvalidAuthHeader => {
                ("INVALID_AUTH_HEADER", "Invalid Authorization header format")
            }
            AuthError::InvalidToken(WardenError::TokenExpired) => {
                ("TOKEN_EXPIRED", "Token has expired")
            }
            AuthError::InvalidToken(_) => ("TOKEN_INVALID", "Invalid token"),
        };

        (StatusCode::UNAUTHORIZED, Json(ApiError::new(code, message))).into_response()
    }
}

/// Authentication middleware that requires a valid access token
///
/// This middleware:
/// 1. Extracts the Authorization header
/// 2. Checks the Bearer token format
/// 3. Verifies the token signature, issuer, and expiration
/// 4. Adds the `AuthenticatedIdentity` to request extensions
///
/// # Usage
///
/// ```ignore
/// use axum::{middleware, routing::get, Router};
/// use warden_api::auth::middleware::auth_middleware;
///
/// let app = Router::new()
///     .route("/protected", get(protected_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
/// ```
///
/// In handlers, extract the identity:
///
/// ```ignore
/// use axum::Extension;
/// use warden_core::AuthenticatedIdentity;
///
/// async fn protected_handler(
///     Extension(identity): Extension<AuthenticatedIdentity>,
/// ) -> String {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // Context for audit logging
    let ip_address = extract_ip_address(request.headers());
    let user_agent = extract_user_agent(request.headers());

    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    // Check Bearer token format
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    // Verify token and extract the identity
    let identity = match state.auth.verify_token(token) {
        Ok(identity) => identity,
        Err(e) => {
            audit_log(&AuditEvent::TokenRejected {
                reason: e.to_string(),
                ip_address,
                user_agent,
            });
            return Err(AuthError::InvalidToken(e));
        }
    };

    // Add identity to request extensions
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_body(error: AuthError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_header_response() {
        let (status, body) = response_body(AuthError::MissingAuthHeader).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_token_error_responses() {
        let (status, body) =
            response_body(AuthError::InvalidToken(WardenError::TokenExpired)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "TOKEN_EXPIRED");

        let (status, body) =
            response_body(AuthError::InvalidToken(WardenError::TokenInvalid)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "TOKEN_INVALID");
    }
}
