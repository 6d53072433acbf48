//! Authentication module
//!
//! This module provides JWT-based authentication with the following components:
//! - Token issuance and verification
//! - Password hashing with Argon2
//! - Middleware for request authentication
//! - In-memory credential store
//! - Authentication service tying the pieces together

pub mod middleware;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

pub use middleware::{auth_middleware, AuthError};
pub use password::{hash_password, verify_password, PasswordConfig, PasswordError};
pub use service::{AuthResponse, AuthService, LoginRequest, RegisterRequest, UserInfo};
pub use store::MemoryCredentialStore;
pub use token::{Claims, TokenAuthority, TokenConfig};
