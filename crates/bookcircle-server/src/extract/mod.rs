//! Request extractors: the authentication gate and validated JSON bodies.

mod session;
mod validate_json;

pub use session::{AccessPolicy, Session, TOKEN_HEADER};
pub use validate_json::ValidateJson;
