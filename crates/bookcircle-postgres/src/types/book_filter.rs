//! Catalog filtering options for book listings.

use serde::{Deserialize, Serialize};

/// Optional filters for the public book catalog.
///
/// Filters combine conjunctively: a book matches when every provided field
/// matches. `genre` and `location` are exact matches; `title` is a
/// case-insensitive substring match.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BookFilter {
    /// Exact genre to match.
    pub genre: Option<String>,
    /// Exact location to match.
    pub location: Option<String>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
}

impl BookFilter {
    /// Returns whether no filter field is set.
    pub fn is_empty(&self) -> bool {
        self.genre.is_none() && self.location.is_none() && self.title.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_empty() {
        assert!(BookFilter::default().is_empty());
    }

    #[test]
    fn any_field_makes_filter_non_empty() {
        let filter = BookFilter {
            title: Some("dune".to_owned()),
            ..BookFilter::default()
        };
        assert!(!filter.is_empty());
    }
}
