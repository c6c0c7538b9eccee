//! Book availability status enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle status of a book listing.
///
/// Corresponds to the `BOOK_STATUS` PostgreSQL enum. Only the listing's owner
/// can move a book between states.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::BookStatus"]
pub enum BookStatus {
    /// Listed and open to requests.
    #[db_rename = "available"]
    #[serde(rename = "available")]
    #[strum(serialize = "available")]
    #[default]
    Available,

    /// Temporarily with a seeker.
    #[db_rename = "rented"]
    #[serde(rename = "rented")]
    #[strum(serialize = "rented")]
    Rented,

    /// Permanently traded away.
    #[db_rename = "exchanged"]
    #[serde(rename = "exchanged")]
    #[strum(serialize = "exchanged")]
    Exchanged,
}
