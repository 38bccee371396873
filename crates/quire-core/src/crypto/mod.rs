//! Credential handling for Quire.
//!
//! - **Argon2id** password hashing with random salts, PHC-encoded digests
//! - A heuristic strength score that gates new passwords
//!
//! Plaintext passwords are moved onto the blocking pool inside
//! `zeroize::Zeroizing` so the copy is wiped once hashing finishes.

pub mod password;
pub mod strength;

pub use password::CredentialService;
pub use strength::{score, validate_password, MIN_PASSWORD_SCORE};
