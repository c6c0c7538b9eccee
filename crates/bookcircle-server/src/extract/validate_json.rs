//! Validated JSON extractor with automatic validation.
//!
//! [`ValidateJson`] combines JSON deserialization with a `validator` pass,
//! so handlers receive payloads that already satisfy their declared
//! constraints. Both failure modes answer 400 with the standard error body.

use axum::Json;
use axum::extract::{FromRequest, Request};
use derive_more::{Deref, From};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::handler::{Error, ErrorKind};

/// JSON extractor that validates the deserialized payload.
///
/// Works with any type implementing both `serde::Deserialize` and
/// `validator::Validate`.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // First, deserialize the JSON
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ErrorKind::BadRequest.with_context(rejection.body_text()))?;

        // Then validate the deserialized data
        data.validate()?;
        Ok(Self(data))
    }
}
