//! JWT token issuance and verification
//!
//! Implements JWT-based authentication with HMAC-SHA256 signing.
//! Access tokens carry the authenticated identity and expire after a
//! configurable lifetime, with no clock leeway on verification.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;
use warden_core::{AuthConfig, AuthenticatedIdentity, Role, WardenError};

/// JWT Claims structure containing the authenticated identity
///
/// These claims are embedded in the access token and extracted during
/// verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject - the username
    pub sub: String,
    /// JWT ID - unique token identifier
    pub jti: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// Account role ("USER")
    pub role: String,
}

/// Token signing and verification settings
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret key for HMAC signing (must be at least 256 bits)
    pub secret: String,
    /// Access token lifetime in seconds (default: 3600 = 1 hour)
    pub ttl_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-key-change-in-production".to_string(),
            ttl_secs: 3600, // 1 hour
            issuer: "warden-api".to_string(),
        }
    }
}

impl From<&AuthConfig> for TokenConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            ttl_secs: config.token_ttl_secs,
            issuer: config.issuer.clone(),
        }
    }
}

/// Issues and verifies access tokens under a single signing key
///
/// The keys and validation rules are built once at construction, so issuing
/// and verifying are cheap per-call operations.
pub struct TokenAuthority {
    issuer: String,
    ttl_secs: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenAuthority {
    pub fn new(config: TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        // No clock leeway: a token past its exp is expired immediately.
        validation.leeway = 0;

        Self {
            issuer: config.issuer,
            ttl_secs: config.ttl_secs,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Lifetime of issued tokens in seconds
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a signed access token for a verified identity
    pub fn issue(&self, identity: &AuthenticatedIdentity) -> Result<String, WardenError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| WardenError::Internal(e.to_string()))?
            .as_secs();

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: identity.username.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.ttl_secs,
            role: identity.role.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| WardenError::Internal(e.to_string()))
    }

    /// Verify a token and extract the identity it asserts
    ///
    /// Expiry is the only failure reported distinctly; a bad signature,
    /// malformed structure, wrong issuer, or unknown role all collapse into
    /// `TokenInvalid`.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedIdentity, WardenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => WardenError::TokenExpired,
                    _ => WardenError::TokenInvalid,
                }
            })?;

        let role = Role::from_str(&token_data.claims.role).ok_or(WardenError::TokenInvalid)?;

        Ok(AuthenticatedIdentity {
            username: token_data.claims.sub,
            role,
        })
    }
}
