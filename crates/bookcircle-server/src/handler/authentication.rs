//! Authentication handlers for registration, login and identity resolution.
//!
//! Registration and login both end by issuing a signed identity token; the
//! client stores it and sends it back in the `x-auth-token` header. Logout
//! is client-side discard only — the server keeps no session state and no
//! revocation list, so a token stays valid until its expiry.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use bookcircle_postgres::PgClient;
use bookcircle_postgres::model::NewUser;
use bookcircle_postgres::query::UserRepository;
use bookcircle_postgres::types::UserRole;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::{Session, ValidateJson};
use crate::handler::users::UserResponse;
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, TokenSigner};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "bookcircle_server::handler::authentication";

/// Unique constraint guarding one account per email.
const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Request payload for registration.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    /// Login email; must not be registered yet.
    #[validate(email)]
    pub email: String,
    /// Clear-text password; hashed before it reaches storage.
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    /// Contact number shown to interested seekers.
    #[validate(length(min = 5, max = 20))]
    pub mobile_number: String,
    /// Marketplace role; immutable after registration.
    pub role: UserRole,
}

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest {
    /// Email of the account.
    #[validate(email)]
    pub email: String,
    /// Password of the account.
    pub password: String,
}

/// Response carrying a freshly issued identity token.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TokenResponse {
    /// Signed identity token for the `x-auth-token` header.
    pub token: String,
}

/// Registers a new user and issues their first token.
pub(crate) async fn register(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(token_signer): State<TokenSigner>,
    ValidateJson(request): ValidateJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    tracing::trace!(
        target: TRACING_TARGET,
        email = %request.email,
        role = %request.role,
        "registration attempt"
    );

    let mut conn = pg_client.get_connection().await?;

    if conn.email_exists(&request.email).await? {
        tracing::debug!(
            target: TRACING_TARGET,
            email = %request.email,
            "registration rejected: email already registered"
        );
        return Err(ErrorKind::BadRequest.with_message("User already exists"));
    }

    let password_hash = password_hasher.hash_password(&request.password)?;

    let new_user = NewUser {
        name: request.name,
        email: request.email,
        mobile_number: request.mobile_number,
        role: request.role,
        password_hash,
    };

    // The existence check above is not transactional with the insert; a
    // concurrent registration surfaces as a unique-constraint violation.
    let user = conn.create_user(new_user).await.map_err(|e| {
        if e.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            ErrorKind::BadRequest.with_message("User already exists")
        } else {
            e.into()
        }
    })?;

    let token = token_signer.issue(user.id, user.role)?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        role = %user.role,
        "registration successful: token issued"
    );

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Verifies credentials and issues a token.
pub(crate) async fn login(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(token_signer): State<TokenSigner>,
    ValidateJson(request): ValidateJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    tracing::trace!(
        target: TRACING_TARGET,
        email = %request.email,
        "login attempt"
    );

    let mut conn = pg_client.get_connection().await?;
    let user = conn.find_user_by_email(&request.email).await?;

    let Some(user) = user else {
        // Perform dummy hash verification to maintain consistent timing
        // and prevent account enumeration via timing analysis
        password_hasher.verify_dummy_password(&request.password);

        tracing::debug!(
            target: TRACING_TARGET,
            email = %request.email,
            "login failed: unknown email"
        );
        return Err(ErrorKind::BadRequest.with_message("Invalid credentials"));
    };

    password_hasher.verify_password(&request.password, &user.password_hash)?;

    let token = token_signer.issue(user.id, user.role)?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user.id,
        "login successful: token issued"
    );

    Ok(Json(TokenResponse { token }))
}

/// Resolves the authenticated user's own profile.
pub(crate) async fn me(
    State(pg_client): State<PgClient>,
    session: Session,
) -> Result<Json<UserResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let user = conn.find_user_by_id(session.user_id).await?.ok_or_else(|| {
        // Valid token for a user that no longer resolves in storage.
        tracing::warn!(
            target: TRACING_TARGET,
            user_id = %session.user_id,
            "token resolved to a missing user"
        );
        ErrorKind::NotFound.with_message("User not found")
    })?;

    Ok(Json(user.into()))
}
