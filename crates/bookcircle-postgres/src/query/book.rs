//! Book repository for catalog queries and owner-scoped mutations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Book, NewBook, UpdateBook, User};
use crate::types::BookFilter;
use crate::{PgConnection, PgError, PgResult, schema};

/// Escapes `LIKE` pattern metacharacters in user-supplied input.
fn escape_like_pattern(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Repository for book listing database operations.
///
/// The catalog reads join the owning user so contact details can be shown
/// alongside a listing. Mutations operate on the listing alone; the ownership
/// decision itself belongs to the caller and happens before any update or
/// delete is issued.
pub trait BookRepository {
    /// Creates a new book listing.
    fn create_book(&mut self, new_book: NewBook) -> impl Future<Output = PgResult<Book>> + Send;

    /// Finds a listing by its unique identifier.
    fn find_book_by_id(
        &mut self,
        book_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Book>>> + Send;

    /// Finds a listing together with its owner.
    fn find_book_with_owner(
        &mut self,
        book_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<(Book, User)>>> + Send;

    /// Lists the whole catalog with owners, newest first.
    fn list_books_with_owners(&mut self)
    -> impl Future<Output = PgResult<Vec<(Book, User)>>> + Send;

    /// Lists the catalog restricted by the given filter, newest first.
    ///
    /// Filters combine conjunctively; an empty filter behaves like the
    /// unfiltered catalog.
    fn filter_books_with_owners(
        &mut self,
        filter: BookFilter,
    ) -> impl Future<Output = PgResult<Vec<(Book, User)>>> + Send;

    /// Lists all listings of one owner, newest first.
    fn list_books_by_owner(
        &mut self,
        owner_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<Book>>> + Send;

    /// Applies a partial update to a listing and bumps `updated_at`.
    fn update_book(
        &mut self,
        book_id: Uuid,
        updates: UpdateBook,
    ) -> impl Future<Output = PgResult<Book>> + Send;

    /// Deletes a listing, returning the number of removed rows.
    fn delete_book(&mut self, book_id: Uuid) -> impl Future<Output = PgResult<usize>> + Send;
}

impl BookRepository for PgConnection {
    async fn create_book(&mut self, mut new_book: NewBook) -> PgResult<Book> {
        use schema::books;

        new_book.title = new_book.title.trim().to_owned();
        new_book.author = new_book.author.trim().to_owned();
        new_book.genre = new_book.genre.trim().to_owned();
        new_book.location = new_book.location.trim().to_owned();

        diesel::insert_into(books::table)
            .values(&new_book)
            .returning(Book::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_book_by_id(&mut self, book_id: Uuid) -> PgResult<Option<Book>> {
        use schema::books::{self, dsl};

        books::table
            .filter(dsl::id.eq(book_id))
            .select(Book::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_book_with_owner(&mut self, book_id: Uuid) -> PgResult<Option<(Book, User)>> {
        use schema::{books, users};

        books::table
            .inner_join(users::table)
            .filter(books::dsl::id.eq(book_id))
            .select((Book::as_select(), User::as_select()))
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_books_with_owners(&mut self) -> PgResult<Vec<(Book, User)>> {
        self.filter_books_with_owners(BookFilter::default()).await
    }

    async fn filter_books_with_owners(
        &mut self,
        filter: BookFilter,
    ) -> PgResult<Vec<(Book, User)>> {
        use schema::{books, users};

        let mut query = books::table.inner_join(users::table).into_boxed();

        if let Some(genre) = filter.genre {
            query = query.filter(books::dsl::genre.eq(genre.trim().to_owned()));
        }

        if let Some(location) = filter.location {
            query = query.filter(books::dsl::location.eq(location.trim().to_owned()));
        }

        if let Some(title) = filter.title {
            let pattern = format!("%{}%", escape_like_pattern(title.trim()));
            query = query.filter(books::dsl::title.ilike(pattern));
        }

        query
            .order(books::dsl::created_at.desc())
            .select((Book::as_select(), User::as_select()))
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_books_by_owner(&mut self, owner_id: Uuid) -> PgResult<Vec<Book>> {
        use schema::books::{self, dsl};

        books::table
            .filter(dsl::owner_id.eq(owner_id))
            .order(dsl::created_at.desc())
            .select(Book::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_book(&mut self, book_id: Uuid, updates: UpdateBook) -> PgResult<Book> {
        use schema::books::{self, dsl};

        diesel::update(books::table.filter(dsl::id.eq(book_id)))
            .set((updates, dsl::updated_at.eq(diesel::dsl::now)))
            .returning(Book::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_book(&mut self, book_id: Uuid) -> PgResult<usize> {
        use schema::books::{self, dsl};

        diesel::delete(books::table.filter(dsl::id.eq(book_id)))
            .execute(self)
            .await
            .map_err(PgError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like_pattern;

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like_pattern("100% rust_book"), "100\\% rust\\_book");
        assert_eq!(escape_like_pattern("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like_pattern("plain title"), "plain title");
    }
}
