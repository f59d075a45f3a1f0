//! Product catalog reads.

use makeover_core::{Product, ProductId};

use super::{DataStore, RepositoryError};

/// Catalog filters from the query string. Empty values are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter<'q> {
    /// Name or description substring.
    pub query: Option<&'q str>,
    /// Exact category, ignoring case.
    pub category: Option<&'q str>,
}

impl ProductFilter<'_> {
    /// Whether `product` passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let query_ok = self.query.is_none_or(|q| product.matches_search(q));
        let category_ok = self
            .category
            .filter(|c| !c.trim().is_empty())
            .is_none_or(|c| product.in_category(c));
        query_ok && category_ok
    }
}

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    store: &'a DataStore,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Products matching `filter`, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn list(&self, filter: ProductFilter<'_>) -> Result<Vec<Product>, RepositoryError> {
        let doc = self.store.read().await?;
        Ok(doc
            .products
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect())
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.store.view(|doc| doc.product(id).cloned()).await?)
    }

    /// Products for the given ids, in the order given. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .store
            .view(|doc| {
                ids.iter()
                    .filter_map(|id| doc.product(*id).cloned())
                    .collect()
            })
            .await?)
    }

    /// The whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.store.read().await?.products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(value: serde_json::Value) -> Product {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_filter_matches() {
        let p = product(json!({"id": 1, "name": "Matte Lipstick", "category": "Lips"}));
        assert!(ProductFilter::default().matches(&p));
        assert!(ProductFilter { query: Some("matte"), category: None }.matches(&p));
        assert!(ProductFilter { query: None, category: Some("lips") }.matches(&p));
        assert!(ProductFilter { query: None, category: Some("") }.matches(&p));
        assert!(!ProductFilter { query: Some("matte"), category: Some("Eyes") }.matches(&p));
    }
}
