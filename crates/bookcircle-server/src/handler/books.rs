//! Book listing handlers: catalog reads and owner-guarded mutations.
//!
//! Reads are open to anyone and embed the owner's contact details. Every
//! mutation locates the listing first, then checks ownership, then acts:
//! a missing listing answers 404 before ownership is ever evaluated, and an
//! ownership mismatch answers 401 with "User not authorized". The lookup and
//! the mutation are separate statements by design; a listing deleted between
//! them surfaces as a storage fault.

use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use bookcircle_postgres::PgClient;
use bookcircle_postgres::model::{Book, NewBook, UpdateBook, User};
use bookcircle_postgres::query::BookRepository;
use bookcircle_postgres::types::{BookFilter, BookStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{AccessPolicy, Session, ValidateJson};
use crate::handler::response::MessageResponse;
use crate::handler::{Error, ErrorKind, Result};

/// Tracing target for book listing operations.
const TRACING_TARGET: &str = "bookcircle_server::handler::books";

/// Cover image used when a listing is created without one.
const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/150";

/// Request payload for creating a new listing.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateBookRequest {
    /// Book title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Book author.
    #[validate(length(min = 1, max = 200))]
    pub author: String,
    /// Genre used for catalog filtering.
    #[validate(length(min = 1, max = 100))]
    pub genre: String,
    /// Pickup location used for catalog filtering.
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    /// Optional cover image URL; a placeholder is used when absent.
    #[validate(url)]
    pub cover_image: Option<String>,
}

/// Request payload for partially updating a listing.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateBookRequest {
    /// Book title.
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// Book author.
    #[validate(length(min = 1, max = 200))]
    pub author: Option<String>,
    /// Genre used for catalog filtering.
    #[validate(length(min = 1, max = 100))]
    pub genre: Option<String>,
    /// Pickup location used for catalog filtering.
    #[validate(length(min = 1, max = 100))]
    pub location: Option<String>,
    /// Availability status.
    pub status: Option<BookStatus>,
    /// Cover image URL.
    #[validate(url)]
    pub cover_image: Option<String>,
}

impl From<UpdateBookRequest> for UpdateBook {
    fn from(request: UpdateBookRequest) -> Self {
        Self {
            title: request.title,
            author: request.author,
            genre: request.genre,
            location: request.location,
            status: request.status,
            cover_image: request.cover_image,
        }
    }
}

/// Owner contact details embedded in catalog responses.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OwnerContact {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact number.
    pub mobile_number: String,
}

impl From<User> for OwnerContact {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            mobile_number: user.mobile_number,
        }
    }
}

/// A listing as returned from owner-scoped endpoints.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookResponse {
    /// Unique listing identifier.
    pub id: Uuid,
    /// The user that listed this book.
    pub owner_id: Uuid,
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Genre.
    pub genre: String,
    /// Pickup location.
    pub location: String,
    /// Availability status.
    pub status: BookStatus,
    /// Cover image URL.
    pub cover_image: String,
    /// Creation timestamp.
    pub created_at: jiff::Timestamp,
    /// Last update timestamp.
    pub updated_at: jiff::Timestamp,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            owner_id: book.owner_id,
            title: book.title,
            author: book.author,
            genre: book.genre,
            location: book.location,
            status: book.status,
            cover_image: book.cover_image,
            created_at: book.created_at.into(),
            updated_at: book.updated_at.into(),
        }
    }
}

/// A listing as returned from the public catalog, with owner contact.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CatalogBookResponse {
    /// Unique listing identifier.
    pub id: Uuid,
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Genre.
    pub genre: String,
    /// Pickup location.
    pub location: String,
    /// Availability status.
    pub status: BookStatus,
    /// Cover image URL.
    pub cover_image: String,
    /// Contact details of the listing owner.
    pub owner: OwnerContact,
    /// Creation timestamp.
    pub created_at: jiff::Timestamp,
    /// Last update timestamp.
    pub updated_at: jiff::Timestamp,
}

impl From<(Book, User)> for CatalogBookResponse {
    fn from((book, owner): (Book, User)) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            genre: book.genre,
            location: book.location,
            status: book.status,
            cover_image: book.cover_image,
            owner: owner.into(),
            created_at: book.created_at.into(),
            updated_at: book.updated_at.into(),
        }
    }
}

/// Maps an unparseable or missing listing id to the catalog miss response.
fn book_not_found() -> Error {
    ErrorKind::NotFound.with_message("Book not found")
}

/// Creates a new listing owned by the requester.
///
/// Reached through the authentication gate and the owner role gate; the
/// requester's identity comes from the verified session, never from the
/// payload.
pub(crate) async fn create_book(
    State(pg_client): State<PgClient>,
    session: Session,
    ValidateJson(request): ValidateJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>)> {
    let mut conn = pg_client.get_connection().await?;

    let new_book = NewBook {
        owner_id: session.user_id,
        title: request.title,
        author: request.author,
        genre: request.genre,
        location: request.location,
        cover_image: request
            .cover_image
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_COVER.to_owned()),
    };

    let book = conn.create_book(new_book).await?;

    tracing::info!(
        target: TRACING_TARGET,
        book_id = %book.id,
        owner_id = %book.owner_id,
        "new listing created"
    );

    Ok((StatusCode::CREATED, Json(book.into())))
}

/// Returns the whole catalog, newest first.
pub(crate) async fn list_books(
    State(pg_client): State<PgClient>,
) -> Result<Json<Vec<CatalogBookResponse>>> {
    let mut conn = pg_client.get_connection().await?;
    let books = conn.list_books_with_owners().await?;

    Ok(Json(
        books.into_iter().map(CatalogBookResponse::from).collect(),
    ))
}

/// Returns the catalog restricted by genre, location and title filters.
pub(crate) async fn filter_books(
    State(pg_client): State<PgClient>,
    Query(filter): Query<BookFilter>,
) -> Result<Json<Vec<CatalogBookResponse>>> {
    let mut conn = pg_client.get_connection().await?;
    let books = conn.filter_books_with_owners(filter).await?;

    Ok(Json(
        books.into_iter().map(CatalogBookResponse::from).collect(),
    ))
}

/// Returns a single listing with owner contact.
pub(crate) async fn get_book(
    State(pg_client): State<PgClient>,
    book_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CatalogBookResponse>> {
    let Ok(Path(book_id)) = book_id else {
        return Err(book_not_found());
    };

    let mut conn = pg_client.get_connection().await?;
    let book = conn
        .find_book_with_owner(book_id)
        .await?
        .ok_or_else(book_not_found)?;

    Ok(Json(book.into()))
}

/// Returns the authenticated user's own listings, newest first.
pub(crate) async fn my_books(
    State(pg_client): State<PgClient>,
    session: Session,
) -> Result<Json<Vec<BookResponse>>> {
    let mut conn = pg_client.get_connection().await?;
    let books = conn.list_books_by_owner(session.user_id).await?;

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// Partially updates a listing after the ownership check.
pub(crate) async fn update_book(
    State(pg_client): State<PgClient>,
    session: Session,
    book_id: Result<Path<Uuid>, PathRejection>,
    ValidateJson(request): ValidateJson<UpdateBookRequest>,
) -> Result<Json<BookResponse>> {
    let Ok(Path(book_id)) = book_id else {
        return Err(book_not_found());
    };

    let mut conn = pg_client.get_connection().await?;

    // Existence precedes authorization: an absent listing answers 404
    // without revealing whether the requester could have touched it.
    let book = conn
        .find_book_by_id(book_id)
        .await?
        .ok_or_else(book_not_found)?;

    session.authorize_book(&book)?;

    let updated = conn.update_book(book.id, request.into()).await?;

    tracing::info!(
        target: TRACING_TARGET,
        book_id = %updated.id,
        owner_id = %updated.owner_id,
        "listing updated"
    );

    Ok(Json(updated.into()))
}

/// Deletes a listing after the ownership check.
pub(crate) async fn delete_book(
    State(pg_client): State<PgClient>,
    session: Session,
    book_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let Ok(Path(book_id)) = book_id else {
        return Err(book_not_found());
    };

    let mut conn = pg_client.get_connection().await?;

    let book = conn
        .find_book_by_id(book_id)
        .await?
        .ok_or_else(book_not_found)?;

    session.authorize_book(&book)?;

    conn.delete_book(book.id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        book_id = %book.id,
        owner_id = %book.owner_id,
        "listing removed"
    );

    Ok(Json(MessageResponse::new("Book removed".into())))
}
