//! Security services: password hashing and token signing.

mod password_hasher;
mod token_signer;

pub use password_hasher::PasswordHasher;
pub use token_signer::{Claims, TokenError, TokenSigner};
