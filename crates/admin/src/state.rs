//! Application state shared across handlers.

use std::sync::Arc;

use makeover_core::auth::{PasswordError, PasswordHasher, TokenIssuer};
use makeover_core::store::DataStore;

use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: DataStore,
    passwords: PasswordHasher,
    tokens: TokenIssuer,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured bcrypt cost is out of range.
    pub fn new(config: AdminConfig, store: DataStore) -> Result<Self, PasswordError> {
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

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The data file, shared with the storefront.
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
