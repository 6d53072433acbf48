//! Application state management
//!
//! Author: hephaex@gmail.com

use crate::auth::{AuthService, MemoryCredentialStore, PasswordConfig, TokenConfig};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use warden_core::{AppConfig, CredentialStore, WardenError};

/// Per-endpoint request metrics
#[derive(Debug, Default, Clone)]
pub struct EndpointMetrics {
    /// Request counts keyed by response status
    pub status_counts: HashMap<u16, u64>,
    /// Number of recorded latencies
    pub latency_count: u64,
    /// Sum of recorded latencies in microseconds
    pub total_latency_us: u64,
    /// Fastest recorded request in microseconds
    pub min_latency_us: u64,
    /// Slowest recorded request in microseconds
    pub max_latency_us: u64,
}

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Authentication service
    pub auth: AuthService,
    /// Credential store (shared with the auth service)
    pub store: Arc<dyn CredentialStore>,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Ready status
    pub is_ready: AtomicBool,
    /// Per-endpoint metrics
    pub metrics: RwLock<HashMap<String, EndpointMetrics>>,
}

impl AppState {
    /// Build the full service stack from configuration
    ///
    /// This is the composition root: the store, password hasher, and token
    /// authority are wired together here and nowhere else. The state starts
    /// not-ready; callers flip it once the listener is up.
    pub fn from_config(config: AppConfig) -> Result<Self, WardenError> {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        let auth = AuthService::new(
            store.clone(),
            PasswordConfig::from(&config.auth),
            TokenConfig::from(&config.auth),
        )?;

        Ok(Self {
            config,
            auth,
            store,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            is_ready: AtomicBool::new(false),
            metrics: RwLock::new(HashMap::new()),
        })
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Check if service is ready
    pub fn is_ready(&self) -> bool {
        self.is_ready.load(Ordering::SeqCst)
    }

    /// Set ready status
    pub fn set_ready(&self, ready: bool) {
        self.is_ready.store(ready, Ordering::SeqCst);
    }

    /// Record one completed request for an endpoint
    pub async fn record_request(&self, endpoint: String, status: u16, latency_us: u64) {
        let mut metrics = self.metrics.write().await;
        let entry = metrics.entry(endpoint).or_default();

        *entry.status_counts.entry(status).or_insert(0) += 1;
        entry.latency_count += 1;
        entry.total_latency_us += latency_us;
        if entry.latency_count == 1 || latency_us < entry.min_latency_us {
            entry.min_latency_us = latency_us;
        }
        if latency_us > entry.max_latency_us {
            entry.max_latency_us = latency_us;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        let mut config = AppConfig::default();
        config.auth.argon2_memory_cost = 8192;
        config.auth.argon2_time_cost = 1;
        config.auth.argon2_parallelism = 1;
        AppState::from_config(config).unwrap()
    }

    #[test]
    fn test_ready_flag() {
        let state = test_state();

        assert!(!state.is_ready());
        state.set_ready(true);
        assert!(state.is_ready());
    }

    #[test]
    fn test_request_counter() {
        let state = test_state();

        state.increment_requests();
        state.increment_requests();
        state.increment_requests();

        assert_eq!(state.get_request_count(), 3);
    }

    #[tokio::test]
    async fn test_record_request_tracks_latency_bounds() {
        let state = test_state();

        state.record_request("/health".to_string(), 200, 500).await;
        state.record_request("/health".to_string(), 200, 100).await;
        state.record_request("/health".to_string(), 503, 900).await;

        let metrics = state.metrics.read().await;
        let entry = metrics.get("/health").unwrap();

        assert_eq!(entry.latency_count, 3);
        assert_eq!(entry.total_latency_us, 1500);
        assert_eq!(entry.min_latency_us, 100);
        assert_eq!(entry.max_latency_us, 900);
        assert_eq!(entry.status_counts[&200], 2);
        assert_eq!(entry.status_counts[&503], 1);
    }
}
