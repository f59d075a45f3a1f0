//! Password hashing and session tokens shared by the storefront and admin.
//!
//! Both calls into bcrypt are CPU-heavy; async callers should run them on
//! `tokio::task::spawn_blocking`.

mod password;
mod token;

pub use password::{DEFAULT_COST, PasswordError, PasswordHasher, is_bcrypt_hash};
pub use token::{Claims, DEFAULT_TTL_HOURS, MAX_TTL_HOURS, TokenError, TokenIssuer};
