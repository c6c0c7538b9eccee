//! Middleware for `axum::Router` and HTTP request processing.
//!
//! The authentication gate and the role gate are route layers composed in
//! front of the protected routes; ordering is enforced by composition in the
//! route table, with the authentication layer outermost.

mod auth;

pub use auth::{require_authentication, require_owner};

/// Tracing target for auth middleware decisions.
pub const TRACING_TARGET_AUTH: &str = "bookcircle_server::middleware::auth";
