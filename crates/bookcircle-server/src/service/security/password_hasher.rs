//! Secure password hashing and verification using Argon2id.
//!
//! The hashing and verification methods are designed for use in HTTP
//! handlers and return appropriate HTTP error responses for client
//! consumption. A failed verification answers the same way as an unknown
//! account so credentials cannot be probed apart.

use argon2::password_hash::Error as ArgonError;
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};

use crate::handler::{ErrorKind, Result};

/// Tracing target for password hashing operations.
const TRACING_TARGET: &str = "bookcircle_server::service::password_hasher";

/// Secure password hashing and verification service using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a new instance of the [`PasswordHasher`] service.
    pub fn new() -> Self {
        let argon2 = Argon2::default();
        Self { argon2 }
    }

    /// Hashes a password using Argon2id with a cryptographically secure random salt.
    ///
    /// The returned PHC string includes all parameters and the salt, making
    /// it suitable for long-term storage in the database. Each call
    /// generates a unique salt.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::InternalServerError` if salt generation or the
    /// hashing operation fails.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes())
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password hashing operation failed"
                );
                ErrorKind::InternalServerError.with_context("hash generation error")
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored hash.
    ///
    /// Uses the library's timing-safe comparison; the error carries the same
    /// client-facing message as an unknown account so neither case reveals
    /// which part of the credentials was wrong.
    ///
    /// # Errors
    ///
    /// - `ErrorKind::BadRequest` with "Invalid credentials" for incorrect passwords
    /// - `ErrorKind::InternalServerError` for invalid hash format or system errors
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %e,
                "invalid password hash format in storage"
            );
            ErrorKind::InternalServerError.with_context("hash format error")
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(()),
            Err(ArgonError::PasswordInvalid) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "password verification failed: incorrect password provided"
                );
                Err(ErrorKind::BadRequest.with_message("Invalid credentials"))
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification system error"
                );
                Err(ErrorKind::InternalServerError.with_context("verification error"))
            }
        }
    }

    /// Performs a dummy password verification to maintain consistent timing.
    ///
    /// Used when an account doesn't exist: generates a random password,
    /// hashes it and verifies against that hash, so a login attempt takes
    /// about the same time whether or not the email is registered. Always
    /// returns `false`.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        use rand::RngExt;

        let password_len = rand::random_range(16..32);
        let dummy_password: String = (0..password_len)
            .map(|_| rand::rng().sample(rand::distr::Alphanumeric) as char)
            .collect();

        if let Ok(dummy_hash) = self.hash_password(&dummy_password) {
            let _ = self.verify_password(password, &dummy_hash);
        }

        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let password = "secure_password_123";
        let hash = hasher.hash_password(password)?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password(password, &hash).is_ok());
        assert!(hasher.verify_password("wrong_password", &hash).is_err());

        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let password = "test_password";

        let hash1 = hasher.hash_password(password)?;
        let hash2 = hasher.hash_password(password)?;

        assert_ne!(hash1, hash2);
        assert!(hasher.verify_password(password, &hash1).is_ok());
        assert!(hasher.verify_password(password, &hash2).is_ok());

        Ok(())
    }

    #[test]
    fn wrong_password_answers_invalid_credentials() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("correct_password")?;

        let error = hasher
            .verify_password("wrong_password", &hash)
            .expect_err("wrong password must not verify");

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), "Invalid credentials");

        Ok(())
    }

    #[test]
    fn invalid_stored_hash_is_a_server_fault() {
        let hasher = PasswordHasher::new();

        let error = hasher
            .verify_password("any_password", "not-a-phc-string")
            .expect_err("malformed hash must not verify");

        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }

    #[test]
    fn dummy_verification_always_fails() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_dummy_password("any_password"));
    }
}
