//! Password hashing using Argon2id.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so
//! each one carries its own salt and work factor. Verification reads those
//! back from the digest, which keeps old digests valid after the configured
//! cost changes.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

use crate::config::CredentialConfig;
use crate::error::{QuireError, Result};

use super::strength;

/// One-way password hashing and verification.
#[derive(Clone)]
pub struct CredentialService {
    params: Params,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("memory_kib", &self.params.m_cost())
            .field("iterations", &self.params.t_cost())
            .field("parallelism", &self.params.p_cost())
            .finish()
    }
}

impl CredentialService {
    /// Build a service with the given work factor.
    ///
    /// # Errors
    ///
    /// Returns `QuireError::InvalidInput` if Argon2 rejects the parameters
    /// (for example, less than 8 KiB of memory per lane).
    pub fn new(config: CredentialConfig) -> Result<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| QuireError::InvalidInput(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Hashing the same password twice yields different digests; compare
    /// with [`CredentialService::matches`], never by string equality.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| QuireError::HashingFailure(e.to_string()))?;
        Ok(digest.to_string())
    }

    /// Check a password against a stored digest.
    ///
    /// An empty password or a malformed digest never matches.
    pub fn matches(&self, plaintext: &str, digest: &str) -> bool {
        if plaintext.is_empty() {
            return false;
        }
        let Ok(parsed) = PasswordHash::new(digest) else {
            tracing::warn!("Stored password digest is not a valid PHC string");
            return false;
        };
        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Heuristic strength score; see [`strength::score`].
    pub fn score(&self, plaintext: &str) -> i32 {
        strength::score(plaintext)
    }

    /// [`CredentialService::hash`] on the blocking thread pool.
    pub async fn hash_async(&self, plaintext: Zeroizing<String>) -> Result<String> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&plaintext))
            .await
            .map_err(|e| QuireError::HashingFailure(format!("Hashing task failed: {}", e)))?
    }

    /// [`CredentialService::matches`] on the blocking thread pool.
    pub async fn matches_async(
        &self,
        plaintext: Zeroizing<String>,
        digest: String,
    ) -> Result<bool> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.matches(&plaintext, &digest))
            .await
            .map_err(|e| QuireError::HashingFailure(format!("Verification task failed: {}", e)))
    }
}
