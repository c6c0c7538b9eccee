//! Public user directory handlers.
//!
//! Directory reads are unauthenticated. Responses never include the stored
//! password hash.

use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use bookcircle_postgres::PgClient;
use bookcircle_postgres::model::User;
use bookcircle_postgres::query::UserRepository;
use bookcircle_postgres::types::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handler::{ErrorKind, Result};

/// Tracing target for user directory operations.
const TRACING_TARGET: &str = "bookcircle_server::handler::users";

/// A user as exposed by the API: everything except the password hash.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact number.
    pub mobile_number: String,
    /// Marketplace role.
    pub role: UserRole,
    /// Registration timestamp.
    pub created_at: jiff::Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            mobile_number: user.mobile_number,
            role: user.role,
            created_at: user.created_at.into(),
        }
    }
}

/// Returns all registered book owners.
pub(crate) async fn list_owners(
    State(pg_client): State<PgClient>,
) -> Result<Json<Vec<UserResponse>>> {
    let mut conn = pg_client.get_connection().await?;
    let owners = conn.list_users_by_role(UserRole::Owner).await?;

    Ok(Json(owners.into_iter().map(UserResponse::from).collect()))
}

/// Returns all registered seekers.
pub(crate) async fn list_seekers(
    State(pg_client): State<PgClient>,
) -> Result<Json<Vec<UserResponse>>> {
    let mut conn = pg_client.get_connection().await?;
    let seekers = conn.list_users_by_role(UserRole::Seeker).await?;

    Ok(Json(seekers.into_iter().map(UserResponse::from).collect()))
}

/// Returns a single user by id.
///
/// An unparseable id answers the same way as an absent user.
pub(crate) async fn get_user(
    State(pg_client): State<PgClient>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<UserResponse>> {
    let Ok(Path(user_id)) = user_id else {
        return Err(ErrorKind::NotFound.with_message("User not found"));
    };

    let mut conn = pg_client.get_connection().await?;
    let user = conn.find_user_by_id(user_id).await?.ok_or_else(|| {
        tracing::debug!(
            target: TRACING_TARGET,
            user_id = %user_id,
            "user lookup missed"
        );
        ErrorKind::NotFound.with_message("User not found")
    })?;

    Ok(Json(user.into()))
}
