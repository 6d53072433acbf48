/// Password hashing and verification using Argon2id
///
/// Follows OWASP parameter recommendations:
/// - Algorithm: Argon2id (memory-hard)
/// - Memory: 64 MB
/// - Iterations: 3
/// - Parallelism: 4 threads
/// - Salt: 16 bytes random
/// - Output: 32 bytes hash
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use std::sync::OnceLock;
use thiserror::Error;
use warden_core::{AuthConfig, WardenError};

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
}

impl From<PasswordError> for WardenError {
    fn from(e: PasswordError) -> Self {
        WardenError::Internal(e.to_string())
    }
}

/// Password hashing configuration
///
/// Increasing memory or iterations slows an attacker down at the cost of
/// slower hashing on our side.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Memory cost in KB (default: 65536 = 64 MB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 3)
    pub time_cost: u32,
    /// Parallelism (threads, default: 4)
    pub parallelism: u32,
    /// Output length in bytes (default: 32)
    pub output_len: Option<usize>,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MB
            time_cost: 3,
            parallelism: 4,
            output_len: Some(32),
        }
    }
}

impl From<&AuthConfig> for PasswordConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            memory_cost: config.argon2_memory_cost,
            time_cost: config.argon2_time_cost,
            parallelism: config.argon2_parallelism,
            output_len: Some(32),
        }
    }
}

impl PasswordConfig {
    /// Create Argon2 parameters from this configuration
    fn to_params(&self) -> Result<Params, PasswordError> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            self.output_len,
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}

/// Hash a plaintext password using Argon2id
///
/// # Arguments
///
/// * `password` - The plaintext password to hash
/// * `config` - Argon2 parameters
///
/// # Returns
///
/// * `Ok(String)` - PHC string format hash (includes algorithm, parameters,
///   salt, and hash), safe to store as-is
/// * `Err(PasswordError)` - If hashing fails
///
/// # Example
///
/// ```no_run
/// use warden_api::auth::password::{hash_password, PasswordConfig};
///
/// let hash = hash_password("SecureP@ssw0rd!", &PasswordConfig::default()).unwrap();
/// // $argon2id$v=19$m=65536,t=3,p=4$...
/// ```
pub fn hash_password(password: &str, config: &PasswordConfig) -> Result<String, PasswordError> {
    // Generate a random salt
    let salt = SaltString::generate(&mut OsRng);

    let params = config.to_params()?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against a stored hash
///
/// Returns `true` only when the password matches. A mismatch, a malformed
/// hash, or any verification failure all come back as `false`; callers get a
/// yes/no answer and nothing about which way it failed.
///
/// # Example
///
/// ```no_run
/// use warden_api::auth::password::{hash_password, verify_password, PasswordConfig};
///
/// let hash = hash_password("SecureP@ssw0rd!", &PasswordConfig::default()).unwrap();
///
/// assert!(verify_password("SecureP@ssw0rd!", &hash));
/// assert!(!verify_password("WrongPassword", &hash));
/// ```
pub fn verify_password(password: &str, hash: &str) -> bool {
    // The PHC string carries its own parameters, so a default instance
    // verifies hashes produced under any configuration.
    let argon2 = Argon2::default();

    match PasswordHash::new(hash) {
        Ok(parsed_hash) => argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => {
            // A malformed stored hash still burns one verification so call
            // timing does not reveal which kind of failure occurred.
            if let Ok(parsed_hash) = PasswordHash::new(fallback_hash()) {
                let _ = argon2.verify_password(password.as_bytes(), &parsed_hash);
            }
            false
        }
    }
}

static FALLBACK_HASH: OnceLock<String> = OnceLock::new();

/// Well-formed hash used to equalize the cost of the malformed-hash path
fn fallback_hash() -> &'static str {
    FALLBACK_HASH.get_or_init(|| {
        hash_password("fallback-comparison-password", &PasswordConfig::default())
            .unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn light_config() -> PasswordConfig {
        PasswordConfig {
            memory_cost: 8192, // 8 MB keeps the test suite fast
            time_cost: 1,
            parallelism: 1,
            output_len: Some(32),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "SecureP@ssw0rd!";
        let hash = hash_password(password, &light_config()).expect("Failed to hash password");

        assert!(verify_password(password, &hash));
        assert!(!verify_password("WrongPassword", &hash));
    }

    #[test]
    fn test_same_password_produces_different_hashes() {
        // Random salt: same password, different hashes
        let password = "SamePassword123!";

        let hash1 = hash_password(password, &light_config()).unwrap();
        let hash2 = hash_password(password, &light_config()).unwrap();

        assert_ne!(hash1, hash2);

        // But both verify correctly
        assert!(verify_password(password, &hash1));
        assert!(verify_password(password, &hash2));
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        assert!(!verify_password("password", "invalid-hash-format"));
        assert!(!verify_password("password", ""));
        assert!(!verify_password("password", "$argon2id$not-a-real-hash"));
    }

    #[test]
    fn test_empty_password_round_trips() {
        let hash = hash_password("", &light_config()).unwrap();

        assert!(verify_password("", &hash));
        assert!(!verify_password("anything", &hash));
    }

    #[test]
    fn test_custom_config_parameters_in_hash() {
        let config = PasswordConfig {
            memory_cost: 16384,
            time_cost: 2,
            parallelism: 2,
            output_len: Some(32),
        };

        let password = "TestPassword123!";
        let hash = hash_password(password, &config).unwrap();

        assert!(verify_password(password, &hash));

        // The PHC string records the custom parameters
        assert!(hash.contains("m=16384"));
        assert!(hash.contains("t=2"));
        assert!(hash.contains("p=2"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_hash_verify_round_trip(password in "[ -~]{0,40}") {
            let hash = hash_password(&password, &light_config()).unwrap();
            prop_assert_ne!(&hash, &password);
            prop_assert!(verify_password(&password, &hash));
        }

        #[test]
        fn prop_different_password_rejected(
            password in "[a-z]{1,12}",
            other in "[A-Z]{1,12}",
        ) {
            let hash = hash_password(&password, &light_config()).unwrap();
            prop_assert!(!verify_password(&other, &hash));
        }
    }
}
