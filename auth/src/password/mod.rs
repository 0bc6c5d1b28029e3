//! One-way credential digests (Argon2id, salted per call).

pub mod argon2;
pub mod errors;

pub use argon2::PasswordHasher;
pub use errors::PasswordError;
