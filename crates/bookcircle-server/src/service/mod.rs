//! Application services: configuration, shared state and security.

mod config;
mod security;
mod state;

pub use config::ServiceConfig;
pub use security::{Claims, PasswordHasher, TokenError, TokenSigner};
pub use state::ServiceState;

use bookcircle_postgres::PgError;

/// Errors raised while constructing or connecting application services.
#[derive(Debug, thiserror::Error)]
#[must_use = "service errors should be handled appropriately"]
pub enum ServiceError {
    /// Configuration rejected before any connection attempt.
    #[error("invalid service configuration: {0}")]
    Config(String),

    /// Database client construction or migration failed.
    #[error("database error: {0}")]
    Database(#[from] PgError),
}

/// Specialized [`Result`] type for service construction.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
