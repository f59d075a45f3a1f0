//! Core types for Make-Over.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod policy;
pub mod price;
pub mod status;
pub mod timestamp;

pub use email::{Email, EmailError};
pub use id::*;
pub use policy::{PolicyError, normalize_phone, validate_password};
pub use price::{
    CurrencyCode, MAX_PRICE, Price, PriceError, checked_total, discounted, line_total,
    saturating_total, validate_discount,
};
pub use status::*;
