//! Order history reads.

use makeover_core::{Order, UserId};

use super::{DataStore, RepositoryError};

/// Repository for order reads. Checkout lives in `services::orders`.
pub struct OrderRepository<'a> {
    store: &'a DataStore,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Orders placed by `user`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn list_for_user(&self, user: &UserId) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = self
            .store
            .view(|doc| doc.orders_for(user).cloned().collect())
            .await?;
        orders.sort_by(|a, b| b.placed_at().cmp(&a.placed_at()));
        Ok(orders)
    }
}
