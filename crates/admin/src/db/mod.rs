//! Data-file repositories for the admin panel.
//!
//! # Collections
//!
//! The admin reads every collection of the shared data file and writes all
//! of them:
//!
//! - `products` - catalog CRUD
//! - `orders` - manual orders and status changes
//! - `users` - account management
//! - `messages` - contact-form inbox and replies
//! - `notifications` - the dashboard's activity feed and to-do list
//!
//! The storefront writes to the same file. Each mutating method here is one
//! [`DataStore::update`] call, so it sees the storefront's latest writes when
//! both servers share a [`DataStore`].

pub mod messages;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod users;

use makeover_core::TransitionError;
use makeover_core::store::StoreError;
use thiserror::Error;

pub use makeover_core::store::DataStore;
pub use messages::MessageRepository;
pub use notifications::{NotificationFeed, NotificationRepository};
pub use orders::{OrderFilter, OrderRepository, OrderSort};
pub use products::{ProductFilter, ProductRepository};
pub use users::{UserFilter, UserRepository, UserSummary};

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

    /// Closed orders keep their status.
    #[error("{0}")]
    Transition(#[from] TransitionError),
}
