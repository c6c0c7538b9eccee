#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::handler::{Error, ErrorKind, Result};

/// Tracing target for authentication and token verification events.
pub const TRACING_TARGET_AUTHENTICATION: &str = "bookcircle_server::authentication";

/// Tracing target for authorization decisions (role and ownership checks).
pub const TRACING_TARGET_AUTHORIZATION: &str = "bookcircle_server::authorization";
