//! Catalog product.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Extra, contains_ignore_case};
use crate::serde_util::{money, money_option, one_or_many, string_or_number};
use crate::types::{ProductId, discounted};

/// One product image. Exactly one image of a normalized product is main.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawImage")]
pub struct ProductImage {
    pub url: String,
    #[serde(rename = "isMain")]
    pub is_main: bool,
}

impl ProductImage {
    #[must_use]
    pub fn new(url: impl Into<String>, is_main: bool) -> Self {
        Self {
            url: url.into(),
            is_main,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawImage {
    Url(String),
    Detailed {
        url: String,
        #[serde(rename = "isMain", default)]
        is_main: bool,
    },
}

impl From<RawImage> for ProductImage {
    fn from(raw: RawImage) -> Self {
        match raw {
            RawImage::Url(url) => Self::new(url, false),
            RawImage::Detailed { url, is_main } => Self::new(url, is_main),
        }
    }
}

/// A product in the catalog.
///
/// Serialized with the storefront's field names (`originalprice`, `brand`).
/// Older records using `price` or `brands` load into the same fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProduct")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Vec<String>,
    #[serde(rename = "originalprice", with = "money")]
    pub original_price: Decimal,
    /// Percentage off `original_price`.
    #[serde(with = "money")]
    pub discount: Decimal,
    /// `None` means stock is not tracked for this product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    pub image: Vec<ProductImage>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Deserialize)]
struct RawProduct {
    id: ProductId,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    category: Vec<String>,
    #[serde(default, with = "money_option")]
    originalprice: Option<Decimal>,
    #[serde(default, with = "money_option")]
    price: Option<Decimal>,
    #[serde(default, with = "money_option")]
    discount: Option<Decimal>,
    #[serde(default)]
    stock: Option<i64>,
    #[serde(default)]
    image: Option<ImageField>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    weight: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    brands: Option<String>,
    #[serde(default, deserialize_with = "one_or_many::deserialize")]
    features: Vec<String>,
    #[serde(flatten)]
    extra: Extra,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImageField {
    One(String),
    Many(Vec<ProductImage>),
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        let image = match raw.image {
            None => Vec::new(),
            Some(ImageField::One(url)) if url.trim().is_empty() => Vec::new(),
            Some(ImageField::One(url)) => vec![ProductImage::new(url, true)],
            Some(ImageField::Many(images)) => images,
        };
        let mut product = Self {
            id: raw.id,
            name: raw.name,
            category: raw.category,
            original_price: raw.originalprice.or(raw.price).unwrap_or_default(),
            discount: raw.discount.unwrap_or_default(),
            stock: raw.stock,
            image,
            description: raw.description.unwrap_or_default(),
            weight: raw.weight.filter(|w| !w.trim().is_empty()),
            brand: raw.brand.or(raw.brands).filter(|b| !b.trim().is_empty()),
            features: raw.features,
            extra: raw.extra,
        };
        product.normalize_images();
        product
    }
}

impl Product {
    /// Price after the product's discount.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        discounted(self.original_price, self.discount)
    }

    /// The image flagged main, else the first image.
    #[must_use]
    pub fn main_image(&self) -> Option<&str> {
        self.image
            .iter()
            .find(|img| img.is_main)
            .or_else(|| self.image.first())
            .map(|img| img.url.as_str())
    }

    /// Leave exactly one main image: the first flagged one, or the first image.
    pub fn normalize_images(&mut self) {
        let main = self.image.iter().position(|img| img.is_main).unwrap_or(0);
        for (idx, img) in self.image.iter_mut().enumerate() {
            img.is_main = idx == main;
        }
    }

    /// Case-insensitive match on name or description. Blank terms match all.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim();
        term.is_empty()
            || contains_ignore_case(&self.name, term)
            || contains_ignore_case(&self.description, term)
    }

    /// Case-insensitive equality against any of the product's categories.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        let category = category.trim();
        self.category
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(category))
    }

    /// The first listed category, used for grouping.
    #[must_use]
    pub fn primary_category(&self) -> Option<&str> {
        self.category.first().map(String::as_str)
    }

    /// Only products with tracked stock can be low.
    #[must_use]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock.is_some_and(|stock| stock <= threshold)
    }

    /// Untracked stock always suffices.
    #[must_use]
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.stock.is_none_or(|stock| stock >= i64::from(quantity))
    }

    /// Reduce tracked stock, never below zero.
    pub fn take_stock(&mut self, quantity: u32) {
        if let Some(stock) = self.stock.as_mut() {
            *stock = (*stock - i64::from(quantity)).max(0);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    fn product(value: serde_json::Value) -> Product {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_loads_legacy_shapes() {
        let p = product(json!({
            "id": "7",
            "name": "Rose Lip Tint",
            "category": "Lips",
            "price": 450,
            "brands": "Glow",
            "image": "images/tint.jpg",
            "rating": 4.5
        }));
        assert_eq!(p.id, ProductId::new(7));
        assert_eq!(p.category, vec!["Lips"]);
        assert_eq!(p.original_price, Decimal::from(450));
        assert_eq!(p.brand.as_deref(), Some("Glow"));
        assert_eq!(p.main_image(), Some("images/tint.jpg"));
        assert_eq!(p.extra["rating"], json!(4.5));
    }

    #[test]
    fn test_prefers_originalprice_when_both_present() {
        let p = product(json!({"id": 1, "originalprice": 1000, "price": 850}));
        assert_eq!(p.original_price, Decimal::from(1000));
    }

    #[test]
    fn test_writes_storefront_field_names() {
        let p = product(json!({"id": 1, "name": "Serum", "price": 1200, "discount": 10}));
        let out = serde_json::to_value(&p).unwrap();
        assert_eq!(out["originalprice"], json!(1200));
        assert!(out.get("price").is_none());
        assert!(out.get("stock").is_none());
    }

    #[test]
    fn test_unit_price() {
        let p = product(json!({"id": 1, "originalprice": 1200, "discount": 15}));
        assert_eq!(p.unit_price(), Decimal::from(1020));
        let p = product(json!({"id": 2, "originalprice": 99.5}));
        assert_eq!(p.unit_price(), Decimal::from_str("99.5").unwrap());
    }

    #[test]
    fn test_normalize_images() {
        let mut p = product(json!({"id": 1, "image": [
            {"url": "a.jpg"},
            {"url": "b.jpg", "isMain": true},
            {"url": "c.jpg", "isMain": true}
        ]}));
        assert_eq!(p.main_image(), Some("b.jpg"));
        assert_eq!(p.image.iter().filter(|i| i.is_main).count(), 1);

        p.image = vec![ProductImage::new("x.jpg", false), ProductImage::new("y.jpg", false)];
        p.normalize_images();
        assert!(p.image[0].is_main);
        assert!(!p.image[1].is_main);
    }

    #[test]
    fn test_search_and_category() {
        let p = product(json!({
            "id": 1,
            "name": "Hydrating Face Wash",
            "description": "Gentle cleanser",
            "category": ["Skincare", "Face"]
        }));
        assert!(p.matches_search("face"));
        assert!(p.matches_search("CLEANSER"));
        assert!(p.matches_search("  "));
        assert!(!p.matches_search("lipstick"));
        assert!(p.in_category("skincare"));
        assert!(p.in_category("Face"));
        assert!(!p.in_category("Fac"));
    }

    #[test]
    fn test_stock_rules() {
        let mut p = product(json!({"id": 1, "stock": 5}));
        assert!(p.is_low_stock(10));
        assert!(p.has_stock_for(5));
        assert!(!p.has_stock_for(6));
        p.take_stock(9);
        assert_eq!(p.stock, Some(0));

        let untracked = product(json!({"id": 2}));
        assert!(!untracked.is_low_stock(10));
        assert!(untracked.has_stock_for(1000));
    }
}
