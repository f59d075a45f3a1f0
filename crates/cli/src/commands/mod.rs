//! Subcommand implementations.

pub mod admin;
pub mod data;
pub mod migrate;
pub mod secret;
pub mod seed;
