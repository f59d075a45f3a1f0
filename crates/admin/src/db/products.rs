//! Catalog management.

use std::collections::BTreeSet;

use makeover_core::{Product, ProductId};

use super::{DataStore, RepositoryError};

/// Catalog filters from the query string. Blank values are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter<'q> {
    pub query: Option<&'q str>,
    pub category: Option<&'q str>,
}

impl ProductFilter<'_> {
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

/// Repository for catalog reads and writes.
pub struct ProductRepository<'a> {
    store: &'a DataStore,
}

impl<'a> ProductRepository<'a> {
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

    /// Distinct first categories, sorted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .store
            .view(|doc| {
                doc.products
                    .iter()
                    .filter_map(Product::primary_category)
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_owned)
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .await?)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be read.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.store.view(|doc| doc.product(id).cloned()).await?)
    }

    /// Append a product under the next free id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the data file cannot be written.
    pub async fn create(&self, mut product: Product) -> Result<Product, RepositoryError> {
        self.store
            .update(|doc| {
                product.id = doc.next_product_id();
                product.normalize_images();
                doc.products.push(product.clone());
                Ok(product)
            })
            .await
    }

    /// Overwrite the modelled fields of product `id`.
    ///
    /// Keys the stored record carries outside the model survive; keys in
    /// `product.extra` are added on top.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn replace(
        &self,
        id: ProductId,
        mut product: Product,
    ) -> Result<Product, RepositoryError> {
        self.store
            .update(|doc| {
                let existing = doc.product_mut(id).ok_or(RepositoryError::NotFound)?;
                let mut extra = std::mem::take(&mut existing.extra);
                extra.extend(std::mem::take(&mut product.extra));
                product.extra = extra;
                product.id = id;
                product.normalize_images();
                *existing = product.clone();
                Ok(product)
            })
            .await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn delete(&self, id: ProductId) -> Result<Product, RepositoryError> {
        self.store
            .update(|doc| doc.remove_product(id).ok_or(RepositoryError::NotFound))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::test_support::seeded_store;

    fn draft(value: serde_json::Value) -> Product {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_list_and_categories() {
        let (_dir, store) = seeded_store();
        let repo = ProductRepository::new(&store);

        let skincare = repo
            .list(ProductFilter {
                category: Some("skincare"),
                ..ProductFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(skincare.len(), 2);

        let toner = repo
            .list(ProductFilter {
                query: Some("TONER"),
                ..ProductFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(toner.len(), 1);

        assert_eq!(repo.categories().await.unwrap(), vec!["Makeup", "Skincare"]);
    }

    #[tokio::test]
    async fn test_create_uses_max_plus_one() {
        let (_dir, store) = seeded_store();
        let repo = ProductRepository::new(&store);
        let created = repo
            .create(draft(json!({"id": 0, "name": "Kajal", "originalprice": 250, "image": ["k1.jpg", "k2.jpg"]})))
            .await
            .unwrap();
        assert_eq!(created.id, ProductId::new(6));
        assert_eq!(created.main_image(), Some("k1.jpg"));
        assert_eq!(repo.get(ProductId::new(6)).await.unwrap().unwrap().name, "Kajal");
    }

    #[tokio::test]
    async fn test_replace_keeps_unknown_keys() {
        let (dir, store) = seeded_store();
        let repo = ProductRepository::new(&store);
        store
            .update(|doc| {
                doc.product_mut(ProductId::new(2))
                    .unwrap()
                    .extra
                    .insert("rating".into(), json!(4.5));
                Ok::<_, RepositoryError>(())
            })
            .await
            .unwrap();

        let updated = repo
            .replace(
                ProductId::new(2),
                draft(json!({"id": 99, "name": "Velvet Lipstick", "originalprice": 500, "badge": "new"})),
            )
            .await
            .unwrap();
        assert_eq!(updated.id, ProductId::new(2));
        assert_eq!(updated.extra["rating"], json!(4.5));
        assert_eq!(updated.extra["badge"], json!("new"));

        let raw = std::fs::read_to_string(dir.path().join("data.json")).unwrap();
        assert!(raw.contains("Velvet Lipstick"));
        assert!(raw.contains("\"rating\": 4.5"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (_dir, store) = seeded_store();
        let repo = ProductRepository::new(&store);
        repo.delete(ProductId::new(1)).await.unwrap();
        let err = repo.delete(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
