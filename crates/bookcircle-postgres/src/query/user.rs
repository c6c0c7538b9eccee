//! User repository for account lookups and registration.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewUser, User};
use crate::types::UserRole;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user database operations.
///
/// Handles registration inserts and the lookups backing login, token-derived
/// identity resolution and the public user directory.
pub trait UserRepository {
    /// Creates a new user account.
    ///
    /// The caller provides an already-hashed password; this layer never sees
    /// clear-text secrets.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by its unique identifier.
    fn find_user_by_id(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by email address.
    ///
    /// Emails are stored as provided and compared exactly.
    fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Checks whether an email address is already registered.
    fn email_exists(&mut self, email: &str) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists all users with the given role, newest first.
    fn list_users_by_role(
        &mut self,
        role: UserRole,
    ) -> impl Future<Output = PgResult<Vec<User>>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, mut new_user: NewUser) -> PgResult<User> {
        use schema::users;

        new_user.name = new_user.name.trim().to_owned();
        new_user.email = new_user.email.trim().to_owned();
        new_user.mobile_number = new_user.mobile_number.trim().to_owned();

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_user_by_id(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_email(&mut self, email: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::email.eq(email.trim()))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn email_exists(&mut self, email: &str) -> PgResult<bool> {
        use diesel::dsl::{exists, select};
        use schema::users::{self, dsl};

        select(exists(
            users::table.filter(dsl::email.eq(email.trim())),
        ))
        .get_result(self)
        .await
        .map_err(PgError::from)
    }

    async fn list_users_by_role(&mut self, role: UserRole) -> PgResult<Vec<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::role.eq(role))
            .order(dsl::created_at.desc())
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
