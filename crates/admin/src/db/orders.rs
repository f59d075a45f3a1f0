//! Order management.

use std::cmp::Ordering;

use makeover_core::{Order, OrderId, OrderStatus};
use serde::Deserialize;

use super::{DataStore, RepositoryError};

/// Order list ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSort {
    /// Newest first; orders without a date go last.
    #[default]
    Date,
    /// Largest total first.
    Total,
    /// Status name, A to Z.
    Status,
}

impl std::str::FromStr for OrderSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "total" => Ok(Self::Total),
            "status" => Ok(Self::Status),
            _ => Err(format!("invalid sort: {s:?}")),
        }
    }
}

impl OrderSort {
    fn compare(self, a: &Order, b: &Order) -> Ordering {
        match self {
            Self::Date => match (a.placed_at(), b.placed_at()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::Total => b.total.cmp(&a.total),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

/// Order list filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter<'q> {
    /// Id or customer name substring.
    pub query: Option<&'q str>,
    pub status: Option<OrderStatus>,
    pub sort: OrderSort,
}

/// Repository for order reads and writes.
pub struct OrderRepository<'a> {
    store: &'a DataStore,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Orders matching `filter`, sorted by `filter.sort`. The sort is stable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn list(&self, filter: OrderFilter<'_>) -> Result<Vec<Order>, RepositoryError> {
        let doc = self.store.read().await?;
        let mut orders: Vec<Order> = doc
            .orders
            .into_iter()
            .filter(|o| filter.query.is_none_or(|q| o.matches_search(q)))
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .collect();
        orders.sort_by(|a, b| filter.sort.compare(a, b));
        Ok(orders)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.store.view(|doc| doc.order(id).cloned()).await?)
    }

    /// Store an order under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be written.
    pub async fn create(&self, mut order: Order) -> Result<Order, RepositoryError> {
        self.store
            .update(|doc| {
                order.id = doc.new_order_id();
                doc.orders.push(order.clone());
                Ok(order)
            })
            .await
    }

    /// Move order `id` to `status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist and
    /// `RepositoryError::Transition` if it is already delivered or cancelled.
    pub async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        self.store
            .update(|doc| {
                let order = doc.order_mut(id).ok_or(RepositoryError::NotFound)?;
                if order.set_status(status)? {
                    tracing::info!(order_id = %id, status = %status, "order status changed");
                }
                Ok(order.clone())
            })
            .await
    }
}
