//! HTTP error handling with builder pattern for dynamic error responses.
//!
//! Every failure in the request path terminates that request: nothing here is
//! retried or recovered locally. Each error maps to exactly one HTTP status
//! and a short client-facing message; whatever caused it is recorded through
//! `tracing` for operators and never leaks into the response body.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bookcircle_postgres::PgError;

use crate::handler::response::ErrorResponse;

/// The error type for HTTP handlers in the server.
///
/// Carries an [`ErrorKind`] plus an optional client-facing message override
/// and an optional internal context string. The context is logged, never
/// serialized.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error {
    kind: ErrorKind,
    message: Option<Cow<'static, str>>,
    context: Option<Cow<'static, str>>,
}

impl Error {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            context: None,
        }
    }

    /// Sets a custom client-facing message for the error.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Attaches internal context to the error.
    ///
    /// Context is recorded for operator diagnostics only and is never part
    /// of the response body.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the HTTP status code this error maps to.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// Returns the client-facing message.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(self.kind.message())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug_struct = f.debug_struct("Error");
        debug_struct
            .field("kind", &self.kind)
            .field("status", &self.kind.status())
            .field("message", &self.message());

        if let Some(ref context) = self.context {
            debug_struct.field("context", context);
        }

        debug_struct.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.kind.status())?;

        if let Some(ref context) = self.context {
            write!(f, " - {context}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Some(ref context) = self.context {
            tracing::error!(
                kind = ?self.kind,
                status = %self.kind.status(),
                context = %context,
                "request failed"
            );
        }

        let message = match self.message {
            Some(message) => message,
            None => Cow::Borrowed(self.kind.message()),
        };

        ErrorResponse::new(self.kind.status(), message).into_response()
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<PgError> for Error {
    fn from(error: PgError) -> Self {
        ErrorKind::InternalServerError.with_context(error.to_string())
    }
}

impl From<crate::service::TokenError> for Error {
    fn from(error: crate::service::TokenError) -> Self {
        use crate::service::TokenError;

        match error {
            TokenError::Malformed | TokenError::InvalidSignature | TokenError::Expired => {
                ErrorKind::InvalidAuthToken.into_error()
            }
            TokenError::Signing(e) => {
                ErrorKind::InternalServerError.with_context(format!("token signing failed: {e}"))
            }
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        ErrorKind::BadRequest.with_context(errors.to_string())
    }
}

/// A specialized [`Result`] type for HTTP operations.
///
/// This is the standard result type used throughout the server for
/// operations that can fail with an HTTP error.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Enumeration of all error kinds this layer produces.
///
/// The variants follow the access-control taxonomy: missing or invalid
/// credentials, role mismatch, ownership mismatch, absent resources, bad
/// client input and unexpected server faults. Note that an ownership
/// mismatch maps to 401, not 403 — the original system responds that way and
/// the deviation is preserved deliberately.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400 Bad Request - Invalid request data.
    BadRequest,
    /// 401 Unauthorized - Missing authentication token.
    MissingAuthToken,
    /// 401 Unauthorized - Invalid, malformed or expired token.
    InvalidAuthToken,
    /// 401 Unauthorized - Authenticated, but not the resource owner.
    NotAuthorized,
    /// 403 Forbidden - Role does not permit the operation.
    Forbidden,
    /// 404 Not Found - Resource not found.
    NotFound,
    /// 500 Internal Server Error - Unexpected server fault.
    #[default]
    InternalServerError,
}

impl ErrorKind {
    /// Converts this error kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error {
        Error::new(self)
    }

    /// Creates an [`Error`] with a custom client-facing message.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_message(message)
    }

    /// Creates an [`Error`] with internal context attached.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_context(context)
    }

    /// Returns the HTTP status code for this kind.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::MissingAuthToken
            | ErrorKind::InvalidAuthToken
            | ErrorKind::NotAuthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the default client-facing message for this kind.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "The request could not be processed",
            ErrorKind::MissingAuthToken => "no token, authorization denied",
            ErrorKind::InvalidAuthToken => "token is not valid",
            ErrorKind::NotAuthorized => "User not authorized",
            ErrorKind::Forbidden => {
                "Access denied, only book owners can perform this action"
            }
            ErrorKind::NotFound => "Resource not found",
            ErrorKind::InternalServerError => "Server Error",
        }
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        self.into_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_expected_statuses() {
        assert_eq!(ErrorKind::BadRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorKind::MissingAuthToken.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorKind::InvalidAuthToken.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorKind::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorKind::InternalServerError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn ownership_mismatch_stays_unauthorized() {
        // Matches the original wire behavior: ownership failures answer 401.
        assert_eq!(ErrorKind::NotAuthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::NotAuthorized.message(), "User not authorized");
    }

    #[test]
    fn custom_message_overrides_default() {
        let error = ErrorKind::NotFound.with_message("Book not found");
        assert_eq!(error.message(), "Book not found");
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn context_is_display_only() {
        let error = ErrorKind::InternalServerError.with_context("pool exhausted");
        assert_eq!(error.message(), "Server Error");
        assert!(error.to_string().contains("pool exhausted"));
    }
}
