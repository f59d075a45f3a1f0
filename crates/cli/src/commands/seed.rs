//! Catalog seeding from a JSON file.

use std::collections::HashSet;
use std::path::Path;

use makeover_core::models::Extra;
use makeover_core::store::{DataFile, DataStore, StoreError};
use makeover_core::{Product, ProductId};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Seed file must hold a JSON array of product objects: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Product #{index} is invalid: {source}")]
    Product {
        index: usize,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a seed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub added: usize,
    /// Products whose id was missing or already taken.
    pub renumbered: usize,
}

/// Append the products in `file` to the catalog.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not an array of product
/// objects, or the data file cannot be updated. Nothing is written unless
/// every product parses.
pub async fn products(store: &DataStore, file: &Path) -> Result<SeedReport, SeedError> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| SeedError::Read {
            path: file.display().to_string(),
            source,
        })?;
    let entries: Vec<Extra> = serde_json::from_str(&raw)?;

    let report = store
        .update(|doc| append_products(doc, entries))
        .await?;
    info!(
        added = report.added,
        renumbered = report.renumbered,
        file = %file.display(),
        "products seeded"
    );
    Ok(report)
}

/// Add `entries` to `doc`, giving a fresh id to any entry whose id is
/// missing, unparseable or already used by the catalog or an earlier entry.
///
/// # Errors
///
/// Returns `SeedError::Product` for the first entry that is not a product.
pub fn append_products(doc: &mut DataFile, entries: Vec<Extra>) -> Result<SeedReport, SeedError> {
    let mut taken: HashSet<ProductId> = doc.products.iter().map(|p| p.id).collect();
    let mut next = doc.next_product_id().as_i64();
    let mut parsed = Vec::with_capacity(entries.len());
    let mut report = SeedReport::default();

    for (index, mut entry) in entries.into_iter().enumerate() {
        let wanted = entry
            .get("id")
            .cloned()
            .and_then(|v| serde_json::from_value::<ProductId>(v).ok())
            .filter(|id| !taken.contains(id));
        let id = wanted.unwrap_or_else(|| {
            report.renumbered += 1;
            while taken.contains(&ProductId::new(next)) {
                next += 1;
            }
            ProductId::new(next)
        });
        taken.insert(id);
        entry.insert("id".to_owned(), Value::from(id.as_i64()));

        let mut product: Product = serde_json::from_value(Value::Object(entry))
            .map_err(|source| SeedError::Product { index, source })?;
        product.normalize_images();
        parsed.push(product);
    }

    report.added = parsed.len();
    doc.products.extend(parsed);
    Ok(report)
}
