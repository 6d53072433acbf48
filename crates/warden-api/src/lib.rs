//! Warden API - Authentication REST server
//!
//! Provides HTTP endpoints for account registration, login, and
//! token-protected access:
//! - `POST /api/v1/auth/register` - create an account
//! - `POST /api/v1/auth/login` - exchange credentials for a JWT
//! - `GET /api/v1/auth/me` - current account info (Bearer token required)
//! - `/health`, `/ready`, `/metrics` - operational endpoints

pub mod audit;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::create_router;

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register_handler,
        handlers::auth::login_handler,
        handlers::auth::me_handler,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::AuthResponse,
        auth::UserInfo,
        handlers::auth::RegisterResponse,
        handlers::health::HealthResponse,
        handlers::health::BuildInfo,
        error::ApiError,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login, and account endpoints"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    //! Router construction helpers for tests

    use crate::routes::create_router;
    use crate::state::AppState;
    use axum::Router;
    use std::sync::Arc;
    use warden_core::AppConfig;

    /// Configuration with light hashing parameters to keep tests fast
    pub fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret-0123456789abcdef".to_string();
        config.auth.argon2_memory_cost = 8192;
        config.auth.argon2_time_cost = 1;
        config.auth.argon2_parallelism = 1;
        config
    }

    /// Router backed by fresh state for a single test
    pub fn create_router_for_testing() -> Router {
        create_router_with_config(test_config())
    }

    /// Router backed by fresh state built from the given configuration
    pub fn create_router_with_config(config: AppConfig) -> Router {
        let state = AppState::from_config(config).expect("failed to build test state");
        state.set_ready(true);
        create_router(Arc::new(state))
    }
}
