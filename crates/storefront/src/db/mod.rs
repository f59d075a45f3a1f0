//! Data-file repositories for the storefront.
//!
//! # Collections
//!
//! The storefront reads and writes a subset of the shared data file:
//!
//! - `products` - read-only here, except stock decremented at checkout
//! - `users` - registration, login bookkeeping, profile and wishlist
//! - `orders` - checkout and order history
//! - `messages` - contact form submissions
//! - `notifications` - appended alongside the writes above for the admin
//!
//! Each repository borrows the shared [`DataStore`]; every mutating method is
//! one [`DataStore::update`] call, so a write and its notification land
//! together or not at all.

pub mod messages;
pub mod orders;
pub mod products;
pub mod users;

use makeover_core::store::StoreError;
use thiserror::Error;

pub use makeover_core::store::DataStore;
pub use messages::MessageRepository;
pub use orders::OrderRepository;
pub use products::{ProductFilter, ProductRepository};
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The data file could not be read or written.
    #[error("data file error: {0}")]
    Store(#[from] StoreError),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}
