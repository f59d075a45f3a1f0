//! Make-Over admin library.
//!
//! The admin REST API, exposed as a library so the router can be driven in
//! tests and by the integration-tests crate.
//!
//! # Security
//!
//! Every route except login and the health checks requires a bearer token
//! whose account still exists, holds the `admin` role and is active. Tokens
//! are signed with the same secret as the storefront's.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::AdminConfig;
pub use routes::app;
pub use state::AppState;
