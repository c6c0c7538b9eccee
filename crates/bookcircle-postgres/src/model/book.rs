//! Book listing model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::books;
use crate::types::BookStatus;

/// A book listing owned by exactly one user.
///
/// `owner_id` is a weak reference: it relates the listing to its owner for
/// lookups and authorization, nothing more. Every mutation of a listing must
/// verify the requester against `owner_id` before taking effect.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Book {
    /// Unique listing identifier.
    pub id: Uuid,
    /// The user that listed this book.
    pub owner_id: Uuid,
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Genre used for catalog filtering.
    pub genre: String,
    /// Pickup location used for catalog filtering.
    pub location: String,
    /// Availability status.
    pub status: BookStatus,
    /// Cover image URL.
    pub cover_image: String,
    /// Timestamp when the listing was created.
    pub created_at: Timestamp,
    /// Timestamp when the listing was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new book listing.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewBook {
    /// The user that lists this book.
    pub owner_id: Uuid,
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Genre used for catalog filtering.
    pub genre: String,
    /// Pickup location used for catalog filtering.
    pub location: String,
    /// Cover image URL.
    pub cover_image: String,
}

/// Data for partially updating a book listing.
///
/// Only fields set to `Some` are written; `updated_at` is bumped by the
/// repository on every update.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateBook {
    /// Book title.
    pub title: Option<String>,
    /// Book author.
    pub author: Option<String>,
    /// Genre used for catalog filtering.
    pub genre: Option<String>,
    /// Pickup location used for catalog filtering.
    pub location: Option<String>,
    /// Availability status.
    pub status: Option<BookStatus>,
    /// Cover image URL.
    pub cover_image: Option<String>,
}

impl Book {
    /// Returns whether the given user owns this listing.
    #[inline]
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}
