//! User model for PostgreSQL database operations.
//!
//! A user is either a book `owner` or a `seeker`; the role is fixed at
//! registration. The password never leaves this layer in clear text: only
//! the Argon2 hash is stored, and callers are expected to strip it before
//! serializing a user to the outside world.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::users;
use crate::types::UserRole;

/// A registered marketplace user.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Human-readable name shown on listings.
    pub name: String,
    /// Login email; unique, stored as provided and compared exactly.
    pub email: String,
    /// Contact number shown to interested seekers.
    pub mobile_number: String,
    /// Marketplace role; immutable after registration.
    pub role: UserRole,
    /// Argon2id password hash in PHC string format.
    pub password_hash: String,
    /// Timestamp when the account was registered.
    pub created_at: Timestamp,
}

/// Data for creating a new user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    /// Human-readable name shown on listings.
    pub name: String,
    /// Login email; must be unique.
    pub email: String,
    /// Contact number shown to interested seekers.
    pub mobile_number: String,
    /// Marketplace role.
    pub role: UserRole,
    /// Argon2id password hash in PHC string format.
    pub password_hash: String,
}

impl User {
    /// Returns whether this user may create and mutate book listings.
    #[inline]
    pub fn is_owner(&self) -> bool {
        self.role.can_list_books()
    }
}
