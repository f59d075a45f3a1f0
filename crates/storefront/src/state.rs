//! Application state shared across handlers.

use std::sync::Arc;

use makeover_core::auth::{PasswordError, PasswordHasher, TokenIssuer};
use makeover_core::store::DataStore;

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// data file, password hashing and token signing.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: DataStore,
    passwords: PasswordHasher,
    tokens: TokenIssuer,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The store is passed in rather than opened from `config.data_file` so
    /// the admin can share one in-process handle with the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured bcrypt cost is out of range.
    pub fn new(config: StorefrontConfig, store: DataStore) -> Result<Self, PasswordError> {
        let passwords = PasswordHasher::new(config.bcrypt_cost)?;
        let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_ttl_hours);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                passwords,
                tokens,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the data file handle.
    #[must_use]
    pub fn store(&self) -> &DataStore {
        &self.inner.store
    }

    #[must_use]
    pub fn passwords(&self) -> PasswordHasher {
        self.inner.passwords
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }
}
