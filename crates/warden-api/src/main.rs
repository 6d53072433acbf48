//! Warden API Server
//!
//! REST API server for the Warden authentication service.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;
use warden_api::{create_router, state::AppState};
use warden_core::{AppConfig, AuthConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration: a config file when WARDEN_CONFIG points at one,
    // environment variables otherwise
    let config = match std::env::var("WARDEN_CONFIG") {
        Ok(path) => AppConfig::from_file(&path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };
    config.validate()?;

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("warden_api={},tower_http=debug", config.logging.level).into());

    if config.logging.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    if config.auth.jwt_secret == AuthConfig::default().jwt_secret {
        tracing::warn!(
            "JWT_SECRET is the built-in development value; set a real secret in production"
        );
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = Arc::new(AppState::from_config(config)?);

    // Create router
    let app = create_router(state.clone());

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    state.set_ready(true);
    tracing::info!("Warden API Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
