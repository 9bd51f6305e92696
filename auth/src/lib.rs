//! Authentication utilities library
//!
//! Transport-agnostic building blocks for the account service:
//! - Password hashing (Argon2id)
//! - Signed, time-limited bearer tokens (HS256 JWT)
//! - An injectable clock so expiry can be exercised in tests
//!
//! Services construct one hasher and one issuer at startup and share them.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::TokenIssuer;
//! use chrono::{Duration, Utc};
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let token = issuer.issue("alice", Utc::now() + Duration::minutes(15)).unwrap();
//! assert_eq!(issuer.validate(&token).unwrap(), "alice");
//! ```

pub mod clock;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenIssuer;
pub use password::PasswordError;
pub use password::PasswordHasher;
