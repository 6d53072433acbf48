//! Metrics tracking middleware
//!
//! Tracks request latency, counts, and status codes for the metrics
//! endpoints
//!
//! Author: hephaex@gmail.com

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

/// Metrics tracking middleware
///
/// Records:
/// - Request count per endpoint
/// - Request latency
/// - Response status codes
pub async fn metrics_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let path = request.uri().path().to_string();

    // Normalize the path for metrics (remove IDs)
    let endpoint = normalize_endpoint(&path);

    state.increment_requests();

    // Run the request
    let response = next.run(request).await;

    // Record metrics
    let latency_us = start.elapsed().as_micros() as u64;
    let status = response.status();

    // Record asynchronously to avoid blocking
    let state_clone = state.clone();
    tokio::spawn(async move {
        state_clone
            .record_request(endpoint, status.as_u16(), latency_us)
            .await;
    });

    response
}

/// Normalize endpoint paths for consistent metrics
///
/// Replaces UUID/ID segments with placeholders to group similar endpoints
fn normalize_endpoint(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let normalized: Vec<String> = segments
        .iter()
        .map(|seg| {
            if is_uuid(seg) || is_numeric(seg) {
                ":id".to_string()
            } else {
                (*seg).to_string()
            }
        })
        .collect();

    normalized.join("/")
}

/// Check if a string looks like a UUID
fn is_uuid(s: &str) -> bool {
    s.len() == 36
        && s.chars().enumerate().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}

/// Check if a string is numeric (likely an ID)
fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
