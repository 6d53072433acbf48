//! Warden Configuration Management
//!
//! Handles configuration from environment variables and config files
//! with sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // Token signing
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }
        if let Ok(ttl) = std::env::var("JWT_TTL_SECS") {
            config.auth.token_ttl_secs = ttl.parse().map_err(|_| ConfigError::InvalidValue {
                key: "JWT_TTL_SECS".to_string(),
                value: ttl,
            })?;
        }
        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            config.auth.issuer = issuer;
        }

        // Password hashing work factors
        if let Ok(memory) = std::env::var("ARGON2_MEMORY_COST") {
            config.auth.argon2_memory_cost =
                memory.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "ARGON2_MEMORY_COST".to_string(),
                    value: memory,
                })?;
        }
        if let Ok(time) = std::env::var("ARGON2_TIME_COST") {
            config.auth.argon2_time_cost =
                time.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "ARGON2_TIME_COST".to_string(),
                    value: time,
                })?;
        }
        if let Ok(par) = std::env::var("ARGON2_PARALLELISM") {
            config.auth.argon2_parallelism =
                par.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "ARGON2_PARALLELISM".to_string(),
                    value: par,
                })?;
        }

        // CORS origins from environment variable (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        // Only override if env values differ from defaults
        if env_config.server.host != ServerConfig::default().host {
            self.server.host = env_config.server.host;
        }
        if env_config.server.port != ServerConfig::default().port {
            self.server.port = env_config.server.port;
        }

        // Always use env for sensitive values
        if env_config.auth.jwt_secret != AuthConfig::default().jwt_secret {
            self.auth.jwt_secret = env_config.auth.jwt_secret;
        }

        Ok(self)
    }

    /// Validate configuration invariants before the service starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.len() < AuthConfig::MIN_SECRET_BYTES {
            return Err(ConfigError::InsecureSecret {
                length: self.auth.jwt_secret.len(),
            });
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "auth.token_ttl_secs".to_string(),
                value: "0".to_string(),
            });
        }
        if self.auth.argon2_memory_cost == 0
            || self.auth.argon2_time_cost == 0
            || self.auth.argon2_parallelism == 0
        {
            return Err(ConfigError::InvalidValue {
                key: "auth.argon2_*".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_enabled: true,
            // Empty by default - set via CORS_ORIGINS env var
            cors_origins: vec![],
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for HMAC token signing (must be at least 32 bytes)
    pub jwt_secret: String,

    /// Token time-to-live in seconds
    pub token_ttl_secs: u64,

    /// Token issuer identifier
    pub issuer: String,

    /// Argon2 memory cost in KiB
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (lanes)
    pub argon2_parallelism: u32,
}

impl AuthConfig {
    /// Minimum accepted signing secret length in bytes (256-bit HMAC floor)
    pub const MIN_SECRET_BYTES: usize = 32;
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-key-change-in-production".to_string(),
            token_ttl_secs: 3600, // 1 hour
            issuer: "warden-api".to_string(),
            argon2_memory_cost: 65536, // 64 MB
            argon2_time_cost: 3,
            argon2_parallelism: 4,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Signing secret too short: {length} bytes (minimum {})", AuthConfig::MIN_SECRET_BYTES)]
    InsecureSecret { length: usize },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
