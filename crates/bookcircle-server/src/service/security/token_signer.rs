//! Token issuance and verification for the authentication layer.
//!
//! Tokens are signed, self-contained HS256 JWTs binding a user id and role
//! to an expiry. They are never persisted server-side: validity is decided
//! purely by signature and expiry at verification time, so there is no
//! revocation list — a discarded token stays valid until it expires.
//!
//! The signing secret is injected configuration, loaded once at startup.
//! Rotating it invalidates every outstanding token immediately; there is no
//! key-rotation grace period.

use std::sync::Arc;
use std::time::Duration;

use bookcircle_postgres::types::UserRole;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET_AUTHENTICATION;

/// Errors produced by token verification and signing.
#[derive(Debug, thiserror::Error)]
#[must_use = "token errors should be handled appropriately"]
pub enum TokenError {
    /// The token cannot be parsed into its structural parts.
    #[error("token is malformed")]
    Malformed,
    /// The signature does not match under the service's secret.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// The embedded expiry lies in the past.
    #[error("token has expired")]
    Expired,
    /// Token encoding failed; only possible on the issuing side.
    #[error("token could not be signed")]
    Signing(#[source] JwtError),
}

/// Claims embedded in an issued token.
///
/// Role travels inside the token and is trusted at verification time without
/// a store lookup; a role would therefore go stale if it could change after
/// issuance, which no current flow allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user's id.
    #[serde(rename = "sub")]
    pub user_id: Uuid,
    /// Marketplace role at issuance time.
    #[serde(rename = "role")]
    pub role: UserRole,
    /// Issued at, as Unix seconds.
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiry, as Unix seconds.
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl Claims {
    /// Creates claims expiring `token_ttl` from now.
    pub fn new(user_id: Uuid, role: UserRole, token_ttl: Duration) -> Self {
        let issued_at = jiff::Timestamp::now().as_second();
        Self {
            user_id,
            role,
            issued_at,
            expires_at: issued_at + token_ttl.as_secs() as i64,
        }
    }

    /// Checks if the token has expired based on current UTC time.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= jiff::Timestamp::now().as_second()
    }
}

/// Issues and verifies signed identity tokens.
///
/// Stateless given its secret: verification involves no lookup and no shared
/// mutable state, so a signer can be cloned freely across request handlers.
#[derive(Clone)]
pub struct TokenSigner {
    inner: Arc<TokenSignerInner>,
}

struct TokenSignerInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl TokenSigner {
    /// Creates a signer from the configured secret and token lifetime.
    pub fn new(secret: &str, token_ttl: Duration) -> Self {
        let inner = TokenSignerInner {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the configured token lifetime.
    #[inline]
    pub fn token_ttl(&self) -> Duration {
        self.inner.token_ttl
    }

    /// Issues a token for the given identity.
    ///
    /// The expiry is fixed at the configured lifetime from now. No side
    /// effects beyond the computation itself.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if JWT encoding fails.
    pub fn issue(&self, user_id: Uuid, role: UserRole) -> Result<String, TokenError> {
        self.sign(&Claims::new(user_id, role, self.inner.token_ttl))
    }

    /// Signs pre-built claims into a token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if JWT encoding fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.inner.encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                user_id = %claims.user_id,
                "failed to encode token"
            );
            TokenError::Signing(e)
        })
    }

    /// Verifies a token and returns the embedded claims.
    ///
    /// Validation covers structure, HS256 signature and expiry, with no
    /// clock-skew allowance. On success the embedded identity is returned
    /// with no further lookup.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Malformed`] if the token does not parse.
    /// - [`TokenError::InvalidSignature`] if the signature does not match.
    /// - [`TokenError::Expired`] if the embedded expiry has passed.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let token_data = decode::<Claims>(token, &self.inner.decoding_key, &validation)
            .map_err(map_verification_error)?;
        let claims = token_data.claims;

        // Double-check expiration for security
        if claims.is_expired() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id = %claims.user_id,
                expires_at = claims.expires_at,
                "token verification failed: token expired"
            );
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("token_ttl", &self.inner.token_ttl)
            .finish_non_exhaustive()
    }
}

/// Collapses the JWT library's error kinds into the verification taxonomy.
fn map_verification_error(error: JwtError) -> TokenError {
    match error.kind() {
        JwtErrorKind::ExpiredSignature => TokenError::Expired,
        JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TTL: Duration = Duration::from_secs(3600);

    fn signer(secret: &str) -> TokenSigner {
        TokenSigner::new(secret, TEST_TTL)
    }

    #[test]
    fn verify_round_trips_issued_claims() -> anyhow::Result<()> {
        let signer = signer("round-trip-secret");
        let user_id = Uuid::new_v4();

        let token = signer.issue(user_id, UserRole::Owner)?;
        let claims = signer.verify(&token)?;

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.role, UserRole::Owner);
        assert_eq!(
            claims.expires_at - claims.issued_at,
            TEST_TTL.as_secs() as i64
        );

        Ok(())
    }

    #[test]
    fn verify_preserves_seeker_role() -> anyhow::Result<()> {
        let signer = signer("role-secret");
        let user_id = Uuid::new_v4();

        let token = signer.issue(user_id, UserRole::Seeker)?;
        let claims = signer.verify(&token)?;

        assert_eq!(claims.role, UserRole::Seeker);
        Ok(())
    }

    #[test]
    fn verify_rejects_expired_token() -> anyhow::Result<()> {
        let signer = signer("expiry-secret");
        let now = jiff::Timestamp::now().as_second();
        let claims = Claims {
            user_id: Uuid::new_v4(),
            role: UserRole::Owner,
            issued_at: now - 7200,
            expires_at: now - 3600,
        };

        let token = signer.sign(&claims)?;
        let result = signer.verify(&token);

        assert!(matches!(result, Err(TokenError::Expired)));
        Ok(())
    }

    #[test]
    fn verify_rejects_foreign_signature() -> anyhow::Result<()> {
        // Rotating the secret must invalidate all outstanding tokens.
        let issuing_signer = signer("original-secret");
        let rotated_signer = signer("rotated-secret");

        let token = issuing_signer.issue(Uuid::new_v4(), UserRole::Owner)?;
        let result = rotated_signer.verify(&token);

        assert!(matches!(result, Err(TokenError::InvalidSignature)));
        Ok(())
    }

    #[test]
    fn verify_rejects_malformed_token() {
        let signer = signer("malformed-secret");

        for garbage in ["", "not-a-token", "a.b", "a.b.c"] {
            let result = signer.verify(garbage);
            assert!(
                matches!(result, Err(TokenError::Malformed)),
                "expected malformed error for {garbage:?}"
            );
        }
    }

    #[test]
    fn fresh_claims_are_not_expired() {
        let claims = Claims::new(Uuid::new_v4(), UserRole::Seeker, TEST_TTL);
        assert!(!claims.is_expired());
    }
}
