//! Warden Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the Warden
//! authentication service:
//! - User account records and roles
//! - Transient credential and identity values
//! - Common error types
//! - The credential store trait
//! - Configuration management

pub mod config;

pub use config::{AppConfig, AuthConfig, ConfigError, LoggingConfig, ServerConfig};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Warden operations
#[derive(Error, Debug)]
pub enum WardenError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("token is invalid")]
    TokenInvalid,

    #[error("token has expired")]
    TokenExpired,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WardenError>;

// ============================================================================
// Roles & Identity
// ============================================================================

/// User role enum
///
/// There is a single role in this system. Every registered account holds it,
/// so tokens and records stay forward-compatible with a richer set without
/// any inheritance machinery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
}

impl Role {
    /// Convert role to its wire string
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "USER",
        }
    }

    /// Parse role from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "USER" => Some(Role::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored user account
///
/// Created on registration and owned exclusively by the credential store.
/// The password hash is a self-describing PHC string and is never serialized
/// in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique account identifier
    pub id: Uuid,

    /// Unique username (login name)
    pub username: String,

    /// Salted one-way password hash (PHC string format)
    #[serde(skip_serializing)]
    #[serde(default)]
    pub password_hash: String,

    /// Account role
    pub role: Role,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a new record for a freshly registered user
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    /// The identity this record asserts once credentials are verified
    pub fn identity(&self) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// A username/password pair in flight
///
/// Exists only within a single registration or authentication call and is
/// never persisted. The Debug impl redacts the password so the pair can never
/// leak through a log line.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Verified identity produced by the authenticator
///
/// A plain value type: it carries exactly what token issuance and request
/// handling need, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub username: String,
    pub role: Role,
}

// ============================================================================
// Credential Store
// ============================================================================

/// Persistent keyed mapping from username to account record.
///
/// Username uniqueness is this trait's responsibility: `insert` must check
/// and write atomically so two concurrent registrations for the same name
/// cannot both succeed. Callers never pre-check existence before inserting.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new record, failing with `DuplicateUsername` if the username
    /// is already present. The check and the write are one atomic step.
    async fn insert(&self, record: UserRecord) -> Result<UserRecord>;

    /// Look up a record by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::User.as_str(), "USER");
        assert_eq!(Role::from_str("USER"), Some(Role::User));
        assert_eq!(Role::from_str("user"), Some(Role::User));
        assert_eq!(Role::from_str("admin"), None);
        assert_eq!(Role::User.to_string(), "USER");
    }

    #[test]
    fn test_user_record_hides_password_hash() {
        let record = UserRecord::new("alice", "$argon2id$v=19$m=65536,t=3,p=4$abc$def");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["username"], "alice");
        assert_eq!(json["role"], "USER");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_user_record_identity() {
        let record = UserRecord::new("bob", "hash");
        let identity = record.identity();

        assert_eq!(identity.username, "bob");
        assert_eq!(identity.role, Role::User);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };

        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_distinct_record_ids() {
        let a = UserRecord::new("a", "h");
        let b = UserRecord::new("b", "h");
        assert_ne!(a.id, b.id);
    }
}
