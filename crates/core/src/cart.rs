//! Shopping cart state and pricing.
//!
//! The cart is a list of `{productId, quantity}` lines, the same shape the
//! storefront keeps in local storage. It carries no prices: [`quote`] prices
//! it against the current catalog whenever a total is needed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::serde_util::money;
use crate::types::{PriceError, ProductId, checked_total, line_total};

/// Most units of one product a single order line may carry.
pub const MAX_LINE_QUANTITY: u32 = 10_000;

/// One product in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The cart reducer. Lines keep insertion order and never hold quantity 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from raw lines, merging duplicates and dropping zero
    /// quantities.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add_quantity(line.product_id, line.quantity);
        }
        cart
    }

    /// First add pushes a line with quantity 1; later adds increment it.
    pub fn add(&mut self, product: ProductId) {
        self.add_quantity(product, 1);
    }

    pub fn add_quantity(&mut self, product: ProductId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.line_mut(product) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id: product,
                quantity,
            }),
        }
    }

    /// Set an exact quantity. Zero removes the line.
    pub fn set_quantity(&mut self, product: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product);
            return;
        }
        match self.line_mut(product) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(CartLine {
                product_id: product,
                quantity,
            }),
        }
    }

    /// Decrease by one, removing the line when it reaches zero.
    pub fn decrement(&mut self, product: ProductId) {
        if let Some(line) = self.line_mut(product) {
            line.quantity -= 1;
            if line.quantity == 0 {
                self.remove(product);
            }
        }
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, product: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn quantity_of(&self, product: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.product_id == product)
            .map_or(0, |line| line.quantity)
    }

    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |total, line| total.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    fn line_mut(&mut self, product: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product_id == product)
    }
}

/// A cart line priced against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub product_id: ProductId,
    pub name: String,
    #[serde(rename = "originalprice", with = "money")]
    pub original_price: Decimal,
    #[serde(with = "money")]
    pub discount: Decimal,
    #[serde(with = "money")]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(with = "money")]
    pub line_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The priced cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub lines: Vec<QuoteLine>,
    pub total_quantity: u32,
    #[serde(with = "money")]
    pub subtotal: Decimal,
    /// Cart lines whose product is no longer in the catalog.
    pub missing: Vec<ProductId>,
}

/// Price `cart` against `catalog`.
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] when a line total or the subtotal does
/// not fit in a [`Decimal`].
pub fn quote(cart: &Cart, catalog: &[Product]) -> Result<CartQuote, PriceError> {
    let mut lines = Vec::with_capacity(cart.lines.len());
    let mut missing = Vec::new();

    for line in &cart.lines {
        let Some(product) = catalog.iter().find(|p| p.id == line.product_id) else {
            missing.push(line.product_id);
            continue;
        };
        let unit_price = product.unit_price();
        lines.push(QuoteLine {
            product_id: product.id,
            name: product.name.clone(),
            original_price: product.original_price,
            discount: product.discount,
            unit_price,
            quantity: line.quantity,
            line_total: line_total(unit_price, line.quantity)?,
            image: product.main_image().map(str::to_owned),
        });
    }

    Ok(CartQuote {
        total_quantity: lines
            .iter()
            .fold(0, |total: u32, l| total.saturating_add(l.quantity)),
        subtotal: checked_total(lines.iter().map(|l| l.line_total))?,
        lines,
        missing,
    })
}
