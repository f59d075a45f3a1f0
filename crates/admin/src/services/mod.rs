//! Business logic for the admin panel.
//!
//! - [`auth`] - Admin login and account management
//! - [`catalog`] - Product form validation
//! - [`orders`] - Manual order entry
//! - [`analytics`] - Dashboard and analytics figures
//! - [`search`] - Global search across products, orders and users

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod orders;
pub mod search;

use thiserror::Error;

/// A rejected form. The message is shown to the admin as-is.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
