//! Authentication service layer
//!
//! Provides business logic for user registration, credential verification,
//! login, and token verification. Integrates the credential store, the
//! password hasher, and the token authority behind one interface.

use super::password::{hash_password, verify_password, PasswordConfig};
use super::token::{TokenAuthority, TokenConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use warden_core::{AuthenticatedIdentity, CredentialStore, Credentials, UserRecord, WardenError};

/// Maximum accepted username length in characters
pub const MAX_USERNAME_LEN: usize = 64;

/// Maximum accepted password length in characters
pub const MAX_PASSWORD_LEN: usize = 128;

/// Password hashed at startup and verified against whenever a login names an
/// unknown user, so that path costs the same as a real wrong-password check.
const DUMMY_PASSWORD: &str = "not-a-real-password";

/// User registration request
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// User login request
#[derive(Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authentication response with access token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserInfo,
}

/// User information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserInfo {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.to_string(),
            username: record.username.clone(),
            role: record.role.to_string(),
            created_at: record.created_at,
        }
    }
}

/// Authentication service
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    password_config: PasswordConfig,
    tokens: TokenAuthority,
    dummy_hash: String,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// Hashes the dummy password up front with the same parameters real
    /// accounts use, so the unknown-user login path is indistinguishable in
    /// cost from a wrong-password one.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        password_config: PasswordConfig,
        token_config: TokenConfig,
    ) -> Result<Self, WardenError> {
        let dummy_hash = hash_password(DUMMY_PASSWORD, &password_config)?;

        Ok(Self {
            store,
            password_config,
            tokens: TokenAuthority::new(token_config),
            dummy_hash,
        })
    }

    /// Register a new user
    ///
    /// # Arguments
    ///
    /// * `credentials` - Requested username and plaintext password
    ///
    /// # Returns
    ///
    /// * `Ok(UserRecord)` - Newly created account
    /// * `Err(WardenError)` - Validation failure or duplicate username
    pub async fn register(&self, credentials: &Credentials) -> Result<UserRecord, WardenError> {
        Self::validate_credentials(credentials)?;

        // Hash password
        let password_hash = hash_password(&credentials.password, &self.password_config)?;

        // Uniqueness is decided by the store's atomic insert, not by a
        // lookup here.
        let record = UserRecord::new(credentials.username.clone(), password_hash);
        self.store.insert(record).await
    }

    /// Verify credentials and return the authenticated identity
    ///
    /// Unknown usernames and wrong passwords come back as the same
    /// `InvalidCredentials` error.
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticatedIdentity, WardenError> {
        let record = self.verify_credentials(credentials).await?;
        Ok(record.identity())
    }

    /// Verify credentials and issue an access token
    ///
    /// # Arguments
    ///
    /// * `credentials` - Username and plaintext password
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Access token and user info
    /// * `Err(WardenError)` - `InvalidCredentials` if verification fails
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, WardenError> {
        let record = self.verify_credentials(credentials).await?;

        let access_token = self.tokens.issue(&record.identity())?;

        Ok(AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.ttl_secs(),
            user: UserInfo::from(&record),
        })
    }

    /// Verify an access token and extract the identity it asserts
    pub fn verify_token(&self, token: &str) -> Result<AuthenticatedIdentity, WardenError> {
        self.tokens.verify(token)
    }

    /// Get user info by username
    pub async fn get_user(&self, username: &str) -> Result<UserInfo, WardenError> {
        let record = self
            .store
            .find_by_username(username)
            .await?
            .ok_or_else(|| WardenError::NotFound(format!("User '{username}' not found")))?;

        Ok(UserInfo::from(&record))
    }

    /// Look up the user and check the password, burning a dummy verification
    /// when the username does not exist.
    async fn verify_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<UserRecord, WardenError> {
        match self.store.find_by_username(&credentials.username).await? {
            Some(record) => {
                if verify_password(&credentials.password, &record.password_hash) {
                    Ok(record)
                } else {
                    Err(WardenError::InvalidCredentials)
                }
            }
            None => {
                // Same work as the wrong-password path
                let _ = verify_password(&credentials.password, &self.dummy_hash);
                Err(WardenError::InvalidCredentials)
            }
        }
    }

    fn validate_credentials(credentials: &Credentials) -> Result<(), WardenError> {
        if credentials.username.trim().is_empty() {
            return Err(WardenError::Validation(
                "Username must not be empty".to_string(),
            ));
        }

        if credentials.username.chars().count() > MAX_USERNAME_LEN {
            return Err(WardenError::Validation(format!(
                "Username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }

        if credentials
            .username
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(WardenError::Validation(
                "Username must not contain whitespace or control characters".to_string(),
            ));
        }

        if credentials.password.is_empty() {
            return Err(WardenError::Validation(
                "Password must not be empty".to_string(),
            ));
        }

        if credentials.password.chars().count() > MAX_PASSWORD_LEN {
            return Err(WardenError::Validation(format!(
                "Password must be at most {MAX_PASSWORD_LEN} characters"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::MemoryCredentialStore;
    use warden_core::Role;

    fn service() -> AuthService {
        let store = Arc::new(MemoryCredentialStore::new());
        let password_config = PasswordConfig {
            memory_cost: 8192,
            time_cost: 1,
            parallelism: 1,
            output_len: Some(32),
        };
        AuthService::new(store, password_config, TokenConfig::default()).unwrap()
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let service = service();

        let record = service
            .register(&credentials("alice", "correct horse battery"))
            .await
            .unwrap();
        assert_eq!(record.username, "alice");
        assert_eq!(record.role, Role::User);
        assert!(record.password_hash.starts_with("$argon2id$"));

        let identity = service
            .authenticate(&credentials("alice", "correct horse battery"))
            .await
            .unwrap();
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.role, Role::User);
    }

    #[tokio::test]
    async fn test_failure_causes_indistinguishable() {
        let service = service();
        service
            .register(&credentials("alice", "correct horse battery"))
            .await
            .unwrap();

        let wrong_password = service
            .authenticate(&credentials("alice", "wrong"))
            .await
            .unwrap_err();
        let unknown_user = service
            .authenticate(&credentials("nobody", "wrong"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, WardenError::InvalidCredentials));
        assert!(matches!(unknown_user, WardenError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_register_rejects_bad_usernames() {
        let service = service();

        for username in ["", "   ", "two words", "tab\tname", "ctl\u{0007}name"] {
            let result = service.register(&credentials(username, "password")).await;
            assert!(
                matches!(result, Err(WardenError::Validation(_))),
                "expected validation error for username {username:?}"
            );
        }

        let oversized = "a".repeat(MAX_USERNAME_LEN + 1);
        let result = service.register(&credentials(&oversized, "password")).await;
        assert!(matches!(result, Err(WardenError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_passwords() {
        let service = service();

        let result = service.register(&credentials("alice", "")).await;
        assert!(matches!(result, Err(WardenError::Validation(_))));

        let oversized = "p".repeat(MAX_PASSWORD_LEN + 1);
        let result = service.register(&credentials("alice", &oversized)).await;
        assert!(matches!(result, Err(WardenError::Validation(_))));

        // Nothing was stored along the way
        let result = service.authenticate(&credentials("alice", "password")).await;
        assert!(matches!(result, Err(WardenError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let service = service();
        service
            .register(&credentials("alice", "first password"))
            .await
            .unwrap();

        let result = service
            .register(&credentials("alice", "second password"))
            .await;
        assert!(matches!(result, Err(WardenError::DuplicateUsername(name)) if name == "alice"));

        // The original credentials still work
        service
            .authenticate(&credentials("alice", "first password"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let service = service();
        service
            .register(&credentials("alice", "correct horse battery"))
            .await
            .unwrap();

        let response = service
            .login(&credentials("alice", "correct horse battery"))
            .await
            .unwrap();

        assert!(!response.access_token.is_empty());
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.user.username, "alice");
        assert_eq!(response.user.role, "USER");

        let identity = service.verify_token(&response.access_token).unwrap();
        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn test_verify_token_rejects_garbage() {
        let service = service();

        let result = service.verify_token("not-a-token");
        assert!(matches!(result, Err(WardenError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_get_user() {
        let service = service();
        let record = service
            .register(&credentials("alice", "correct horse battery"))
            .await
            .unwrap();

        let info = service.get_user("alice").await.unwrap();
        assert_eq!(info.id, record.id.to_string());
        assert_eq!(info.username, "alice");
        assert_eq!(info.role, "USER");

        let result = service.get_user("nobody").await;
        assert!(matches!(result, Err(WardenError::NotFound(_))));
    }

    #[test]
    fn test_request_debug_redacts_password() {
        let register = RegisterRequest {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let login = LoginRequest {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };

        assert!(!format!("{register:?}").contains("hunter2"));
        assert!(!format!("{login:?}").contains("hunter2"));
    }
}
