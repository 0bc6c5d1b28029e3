//! Authentication utilities library
//!
//! Credential primitives shared by the authentication service:
//! - Password hashing (Argon2id)
//! - JWT token generation and validation (HMAC family)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Abcdefg1!").unwrap();
//! assert!(hasher.verify("Abcdefg1!", &hash));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//! use chrono::{Duration, Utc};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("Abcdefg1!").unwrap();
//!
//! // Login: verify and generate token
//! let now = Utc::now();
//! let claims = Claims::for_subject("user123", "customer", now, Duration::hours(24));
//! let result = auth.authenticate("Abcdefg1!", &hash, &claims).unwrap();
//!
//! // Validate token
//! let decoded = auth.validate_token_at(&result.access_token, now).unwrap();
//! assert_eq!(decoded.role(), Some("customer"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
