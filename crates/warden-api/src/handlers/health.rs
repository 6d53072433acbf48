//! Health check handlers
//!
//! Author: hephaex@gmail.com

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub build_info: BuildInfo,
}

#[derive(Serialize, ToSchema)]
pub struct BuildInfo {
    pub name: String,
    pub rust_version: String,
}

/// Liveness probe - basic health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_info: BuildInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            rust_version: "1.75+".to_string(),
        },
    })
}

/// Readiness response
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub credential_store: bool,
}

/// Readiness probe - checks dependencies
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service not ready")
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // Exercises the same store path registrations use
    let store_ok = state.store.count().await.is_ok();
    let ready = state.is_ready() && store_ok;

    let response = ReadinessResponse {
        ready,
        checks: ReadinessChecks {
            credential_store: store_ok,
        },
    };

    if ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// JSON metrics response
#[derive(Serialize)]
pub struct MetricsResponse {
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub requests_per_second: f64,
    pub registered_users: u64,
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.uptime_secs();
    let total_requests = state.get_request_count();
    let rps = if uptime > 0 {
        total_requests as f64 / uptime as f64
    } else {
        0.0
    };

    Json(MetricsResponse {
        uptime_seconds: uptime,
        total_requests,
        requests_per_second: rps,
        registered_users: state.store.count().await.unwrap_or(0),
    })
}

/// Prometheus-compatible metrics endpoint
pub async fn prometheus_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.uptime_secs();
    let total_requests = state.get_request_count();
    let registered_users = state.store.count().await.unwrap_or(0);

    let mut output = String::new();

    // Server info
    output.push_str("# HELP warden_uptime_seconds Time since server start\n");
    output.push_str("# TYPE warden_uptime_seconds gauge\n");
    output.push_str(&format!("warden_uptime_seconds {uptime}\n\n"));

    output.push_str("# HELP warden_requests_total Total number of HTTP requests\n");
    output.push_str("# TYPE warden_requests_total counter\n");
    output.push_str(&format!("warden_requests_total {total_requests}\n\n"));

    output.push_str("# HELP warden_users_total Registered user accounts\n");
    output.push_str("# TYPE warden_users_total gauge\n");
    output.push_str(&format!("warden_users_total {registered_users}\n\n"));

    output.push_str("# HELP warden_build_info Build information\n");
    output.push_str("# TYPE warden_build_info gauge\n");
    output.push_str(&format!(
        "warden_build_info{{version=\"{}\"}} 1\n\n",
        env!("CARGO_PKG_VERSION")
    ));

    // Per-endpoint metrics
    let metrics = state.metrics.read().await;

    output.push_str("# HELP warden_http_requests_total HTTP requests by endpoint and status\n");
    output.push_str("# TYPE warden_http_requests_total counter\n");
    for (endpoint, endpoint_metrics) in metrics.iter() {
        for (status, count) in &endpoint_metrics.status_counts {
            output.push_str(&format!(
                "warden_http_requests_total{{endpoint=\"{endpoint}\",status=\"{status}\"}} {count}\n"
            ));
        }
    }
    output.push('\n');

    // Request latency sum and count
    output.push_str("# HELP warden_http_request_duration_seconds HTTP request latency\n");
    output.push_str("# TYPE warden_http_request_duration_seconds summary\n");
    for (endpoint, endpoint_metrics) in metrics.iter() {
        if endpoint_metrics.latency_count > 0 {
            let total_sum_s = (endpoint_metrics.total_latency_us as f64) / 1_000_000.0;
            output.push_str(&format!(
                "warden_http_request_duration_seconds_sum{{endpoint=\"{endpoint}\"}} {total_sum_s:.6}\n"
            ));
            output.push_str(&format!(
                "warden_http_request_duration_seconds_count{{endpoint=\"{endpoint}\"}} {}\n",
                endpoint_metrics.latency_count
            ));
        }
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        output,
    )
}
