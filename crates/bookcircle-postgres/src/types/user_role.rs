//! User role enumeration for marketplace access control.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Defines which side of the marketplace an account is on.
///
/// This enumeration corresponds to the `USER_ROLE` PostgreSQL enum. The role
/// is chosen at registration and is immutable afterwards: no update path in
/// the system changes it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::UserRole"]
pub enum UserRole {
    /// Lists books and may mutate their own listings.
    #[db_rename = "owner"]
    #[serde(rename = "owner")]
    #[strum(serialize = "owner")]
    Owner,

    /// Browses listings and contacts owners; may not list or mutate books.
    #[db_rename = "seeker"]
    #[serde(rename = "seeker")]
    #[strum(serialize = "seeker")]
    Seeker,
}

impl UserRole {
    /// Returns whether this role may create and mutate book listings.
    #[inline]
    pub fn can_list_books(self) -> bool {
        matches!(self, UserRole::Owner)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn serde_round_trip_uses_wire_names() {
        let json = serde_json::to_string(&UserRole::Owner).unwrap();
        assert_eq!(json, "\"owner\"");
        let role: UserRole = serde_json::from_str("\"seeker\"").unwrap();
        assert_eq!(role, UserRole::Seeker);
    }

    #[test]
    fn parses_from_str() {
        assert_eq!(UserRole::from_str("owner").unwrap(), UserRole::Owner);
        assert!(UserRole::from_str("admin").is_err());
    }

    #[test]
    fn only_owners_list_books() {
        assert!(UserRole::Owner.can_list_books());
        assert!(!UserRole::Seeker.can_list_books());
    }
}
