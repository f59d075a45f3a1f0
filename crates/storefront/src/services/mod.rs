//! Business logic services for the storefront.
//!
//! - `auth` - registration, password login, profile updates
//! - `orders` - checkout against the catalog

pub mod auth;
pub mod orders;
