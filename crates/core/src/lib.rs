//! Make-Over Core - Shared domain library.
//!
//! This crate provides the types and logic shared by all Make-Over components:
//! - `storefront` - Public catalog, cart, account and checkout API
//! - `admin` - Internal administration API
//! - `cli` - Command-line tools for data-file maintenance
//!
//! # Architecture
//!
//! The default build contains only types and pure logic - no I/O, no HTTP.
//! Two opt-in features add the pieces both binaries share:
//!
//! - `store` - the JSON data file acting as the application's database
//! - `auth` - bcrypt password hashing and JWT session tokens
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, prices, statuses and timestamps
//! - [`models`] - Records persisted in the data file
//! - [`cart`] - Shopping cart reducer and pricing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod models;
pub mod serde_util;
pub mod types;

#[cfg(feature = "auth")]
pub mod auth;
#[cfg(feature = "store")]
pub mod store;

pub use models::*;
pub use types::*;
