//! Checkout: turns a customer's cart into a stored order.

use axum::http::StatusCode;
use makeover_core::cart::{Cart, CartLine};
use makeover_core::store::StoreError;
use makeover_core::cart::MAX_LINE_QUANTITY;
use makeover_core::{CurrencyCode, NotificationKind, Order, OrderItem, Price, ProductId};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument};

use crate::db::{DataStore, RepositoryError};
use crate::models::CurrentUser;

/// Why an order was rejected.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order has no items")]
    Empty,

    #[error("invalid quantity {quantity} for product {product}")]
    InvalidQuantity { product: ProductId, quantity: i64 },

    #[error("product {0} not found")]
    UnknownProduct(ProductId),

    #[error("only {available} of {name} left in stock")]
    OutOfStock { name: String, available: i64 },

    #[error("order total overflows")]
    TotalTooLarge,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        Self::Repository(RepositoryError::Store(err))
    }
}

impl OrderError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Empty
            | Self::InvalidQuantity { .. }
            | Self::UnknownProduct(_)
            | Self::TotalTooLarge => StatusCode::BAD_REQUEST,
            Self::OutOfStock { .. } => StatusCode::CONFLICT,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Empty => "Order must contain at least one item".to_string(),
            Self::InvalidQuantity { .. } => {
                format!("Quantity must be between 1 and {MAX_LINE_QUANTITY}")
            }
            Self::UnknownProduct(id) => format!("Product {id} not found"),
            Self::OutOfStock { name, available } => {
                format!("Only {available} of {name} left in stock")
            }
            Self::TotalTooLarge => "Order total is too large".to_string(),
            Self::Repository(_) => "Internal server error".to_string(),
        }
    }
}

/// One requested line. Quantity is signed so bad input can be reported
/// instead of failing to parse.
#[derive(Debug, Clone, Copy)]
pub struct RequestedLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// A checkout request.
#[derive(Debug, Clone, Default)]
pub struct NewOrder {
    pub items: Vec<RequestedLine>,
    pub shipping_address: Option<Value>,
    pub payment_method: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
}

/// Places orders against the catalog.
pub struct OrderService<'a> {
    store: &'a DataStore,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self { store }
    }

    /// Validate, price and store an order, decrementing tracked stock.
    ///
    /// Everything happens in one update, so either the order is stored with
    /// its stock taken or nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `OrderError` if the cart is empty, a quantity is not positive,
    /// a product is unknown or its tracked stock is short.
    #[instrument(skip_all, fields(user_id = %user.id))]
    pub async fn place(&self, user: &CurrentUser, request: NewOrder) -> Result<Order, OrderError> {
        let cart = validated_cart(&request.items)?;

        let order = self
            .store
            .update(|doc| {
                let mut lines = Vec::with_capacity(cart.lines().len());
                for line in cart.lines() {
                    let product = doc
                        .product(line.product_id)
                        .ok_or(OrderError::UnknownProduct(line.product_id))?;
                    if !product.has_stock_for(line.quantity) {
                        return Err(OrderError::OutOfStock {
                            name: product.name.clone(),
                            available: product.stock.unwrap_or_default(),
                        });
                    }
                    lines.push(OrderItem::new(
                        Some(product.id),
                        product.name.clone(),
                        product.unit_price(),
                        line.quantity,
                    ));
                }

                let mut order = Order::new(doc.new_order_id(), lines);
                order.total = order
                    .checked_lines_total()
                    .map_err(|_| OrderError::TotalTooLarge)?;

                for line in cart.lines() {
                    if let Some(product) = doc.product_mut(line.product_id) {
                        product.take_stock(line.quantity);
                    }
                }

                let owner = doc.user(&user.id);
                let customer_name = request
                    .customer_name
                    .filter(|n| !n.trim().is_empty())
                    .or_else(|| owner.map(makeover_core::User::display_name));
                let email = request
                    .email
                    .filter(|e| !e.trim().is_empty())
                    .or_else(|| Some(user.email.clone()));

                order.user_id = Some(user.id.clone());
                order.customer_name = customer_name;
                order.email = email;
                order.shipping_address = request.shipping_address;
                order.payment_method = request.payment_method;

                doc.notify(
                    NotificationKind::Order,
                    "New order",
                    format!(
                        "Order #{} placed by {} for {}",
                        order.id,
                        order.customer_name.as_deref().unwrap_or("a customer"),
                        Price::new(order.total, CurrencyCode::default())
                    ),
                );
                doc.orders.push(order.clone());
                Ok(order)
            })
            .await?;

        info!(order_id = %order.id, total = %order.total, "order placed");
        Ok(order)
    }
}

/// Reject empty carts and non-positive quantities, merging repeated products.
fn validated_cart(items: &[RequestedLine]) -> Result<Cart, OrderError> {
    if items.is_empty() {
        return Err(OrderError::Empty);
    }
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let quantity = u32::try_from(item.quantity)
            .ok()
            .filter(|q| (1..=MAX_LINE_QUANTITY).contains(q))
            .ok_or(OrderError::InvalidQuantity {
                product: item.product_id,
                quantity: item.quantity,
            })?;
        lines.push(CartLine {
            product_id: item.product_id,
            quantity,
        });
    }
    Ok(Cart::from_lines(lines))
}
