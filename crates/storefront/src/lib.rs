//! Make-Over storefront library.
//!
//! The public JSON API and static site, exposed as a library so the router
//! can be driven in tests and by the integration-tests crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::StorefrontConfig;
pub use routes::app;
pub use state::AppState;
