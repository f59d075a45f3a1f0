//! Records persisted in the data file.
//!
//! Each record keeps the JSON keys it does not model in an `extra` map, so a
//! read-modify-write cycle through the server never drops fields that other
//! tools (or older versions of the admin panel) put there.

pub mod message;
pub mod notification;
pub mod order;
pub mod product;
pub mod user;

pub use message::{Message, Reply};
pub use notification::{Notification, NotificationKind};
pub use order::{Order, OrderItem};
pub use product::{Product, ProductImage};
pub use user::{User, UserProfile};

/// Unmodelled JSON keys carried alongside a record.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Case-insensitive substring test used by every catalog and admin filter.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
