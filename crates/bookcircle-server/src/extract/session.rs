//! Authentication gate: token header extraction and the request session.
//!
//! [`Session`] converts the request's `x-auth-token` header into verified
//! claims, or rejects the request before any handler logic runs. The
//! verified session is cached in the request extensions, so repeated
//! extraction within one request verifies the token once.
//!
//! [`AccessPolicy`] carries the authorization checks performed on a resolved
//! session: the role gate for owner-only routes and the per-listing
//! ownership check inside mutation handlers.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use bookcircle_postgres::model::Book;
use bookcircle_postgres::types::UserRole;
use derive_more::Deref;
use uuid::Uuid;

use crate::handler::{Error, ErrorKind, Result};
use crate::service::{Claims, TokenSigner};
use crate::{TRACING_TARGET_AUTHENTICATION, TRACING_TARGET_AUTHORIZATION};

/// Request header carrying the identity token.
///
/// The token travels bare, without a bearer prefix.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Verified identity for the remainder of one request.
///
/// Created by the authentication gate on successful token verification and
/// discarded with the request; never persisted or shared across requests.
/// Dereferences to the embedded [`Claims`].
#[must_use]
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct Session(pub Claims);

impl Session {
    /// Consumes the session and returns the verified claims.
    #[inline]
    pub fn into_claims(self) -> Claims {
        self.0
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    TokenSigner: FromRef<S>,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Return cached session if available to avoid re-verifying
        if let Some(session) = parts.extensions.get::<Self>() {
            return Ok(session.clone());
        }

        let Some(header_value) = parts.headers.get(TOKEN_HEADER) else {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                "request without token header rejected"
            );
            return Err(ErrorKind::MissingAuthToken.into_error());
        };

        let token = header_value.to_str().map_err(|_| {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                "token header contains non-ASCII bytes"
            );
            ErrorKind::InvalidAuthToken.into_error()
        })?;

        let token_signer = TokenSigner::from_ref(state);
        let claims = token_signer.verify(token).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                "token verification failed"
            );
            ErrorKind::InvalidAuthToken.into_error()
        })?;

        let session = Self(claims);
        // Cache for subsequent extractors in the same request
        parts.extensions.insert(session.clone());
        Ok(session)
    }
}

/// Authorization checks available on an authenticated identity.
///
/// Implementors provide the resolved user id and role; the checks come as
/// default methods. All checks are pure guards: no side effects beyond
/// logging the decision.
pub trait AccessPolicy {
    /// Returns the authenticated user's id.
    fn user_id(&self) -> Uuid;

    /// Returns the authenticated user's role, as embedded in the token.
    fn role(&self) -> UserRole;

    /// Restricts an operation to identities with the required role.
    ///
    /// Runs after authentication by composition; ordering is not re-checked
    /// here.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` on role mismatch.
    fn require_role(&self, required: UserRole) -> Result<()> {
        if self.role() == required {
            tracing::debug!(
                target: TRACING_TARGET_AUTHORIZATION,
                user_id = %self.user_id(),
                role = %self.role(),
                "access granted: role matches"
            );
            return Ok(());
        }

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            user_id = %self.user_id(),
            role = %self.role(),
            required = %required,
            "access denied: role mismatch"
        );
        Err(ErrorKind::Forbidden.into_error())
    }

    /// Authorizes a mutation of a specific book listing.
    ///
    /// Must run only after the listing has been located; absence is reported
    /// as `NotFound` by the caller before ownership is evaluated.
    ///
    /// # Errors
    ///
    /// Returns the ownership rejection (401, "User not authorized") when the
    /// requester does not own the listing.
    fn authorize_book(&self, book: &Book) -> Result<()> {
        if book.is_owned_by(self.user_id()) {
            return Ok(());
        }

        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            user_id = %self.user_id(),
            book_id = %book.id,
            owner_id = %book.owner_id,
            "access denied: requester does not own this listing"
        );
        Err(ErrorKind::NotAuthorized.into_error())
    }
}

impl AccessPolicy for Claims {
    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn role(&self) -> UserRole {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use bookcircle_postgres::types::BookStatus;

    use super::*;

    fn claims(role: UserRole) -> Claims {
        Claims::new(Uuid::new_v4(), role, std::time::Duration::from_secs(3600))
    }

    fn book_owned_by(owner_id: Uuid) -> Book {
        Book {
            id: Uuid::new_v4(),
            owner_id,
            title: "The Dispossessed".to_owned(),
            author: "Ursula K. Le Guin".to_owned(),
            genre: "Science Fiction".to_owned(),
            location: "Rotterdam".to_owned(),
            status: BookStatus::Available,
            cover_image: "https://via.placeholder.com/150".to_owned(),
            created_at: jiff::Timestamp::now().into(),
            updated_at: jiff::Timestamp::now().into(),
        }
    }

    #[test]
    fn matching_role_passes_the_gate() {
        let claims = claims(UserRole::Owner);
        assert!(claims.require_role(UserRole::Owner).is_ok());
    }

    #[test]
    fn seeker_is_forbidden_from_owner_routes() {
        let claims = claims(UserRole::Seeker);
        let error = claims
            .require_role(UserRole::Owner)
            .expect_err("seeker must not pass the owner gate");
        assert_eq!(error.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn owner_may_mutate_their_listing() {
        let claims = claims(UserRole::Owner);
        let book = book_owned_by(claims.user_id);
        assert!(claims.authorize_book(&book).is_ok());
    }

    #[test]
    fn ownership_mismatch_is_unauthorized_not_forbidden() {
        let claims = claims(UserRole::Owner);
        let book = book_owned_by(Uuid::new_v4());

        let error = claims
            .authorize_book(&book)
            .expect_err("foreign listing must not be mutable");

        assert_eq!(error.kind(), ErrorKind::NotAuthorized);
        assert_eq!(error.message(), "User not authorized");
    }
}
