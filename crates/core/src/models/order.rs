//! Customer orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Extra, contains_ignore_case};
use crate::serde_util::money;
use crate::types::timestamp::loose_option;
use crate::types::{
    OrderId, OrderStatus, PriceError, ProductId, TransitionError, UserId, checked_total,
    line_total, saturating_total,
};

const fn one() -> u32 {
    1
}

/// A line on an order. Name and price are snapshots taken at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "money")]
    pub price: Decimal,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(flatten)]
    pub extra: Extra,
}

impl OrderItem {
    #[must_use]
    pub fn new(product_id: Option<ProductId>, name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            product_id,
            name: name.into(),
            price,
            quantity,
            extra: Extra::new(),
        }
    }

    /// `price * quantity`, saturating for records too large to total.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] when the line does not fit.
    pub fn checked_line_total(&self) -> Result<Decimal, PriceError> {
        line_total(self.price, self.quantity)
    }
}

/// An order placed through the storefront or entered in the admin panel.
///
/// Storefront checkouts set `userId`; admin-seeded data uses `customerId`.
/// Lines load from either `products` or `items` and are written back as
/// `products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawOrder")]
pub struct Order {
    pub id: OrderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub products: Vec<OrderItem>,
    #[serde(with = "money")]
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(with = "loose_option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "loose_option", skip_serializing_if = "Option::is_none")]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(with = "loose_option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrder {
    id: OrderId,
    #[serde(default)]
    user_id: Option<UserId>,
    #[serde(default)]
    customer_id: Option<UserId>,
    #[serde(default)]
    customer_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    products: Option<Vec<OrderItem>>,
    #[serde(default)]
    items: Option<Vec<OrderItem>>,
    #[serde(default, with = "crate::serde_util::money_option")]
    total: Option<Decimal>,
    #[serde(default)]
    status: OrderStatus,
    #[serde(default)]
    shipping_address: Option<Value>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default, with = "loose_option")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "loose_option")]
    order_date: Option<DateTime<Utc>>,
    #[serde(default, with = "loose_option")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: Extra,
}

impl From<RawOrder> for Order {
    fn from(raw: RawOrder) -> Self {
        let products = raw
            .products
            .filter(|lines| !lines.is_empty())
            .or(raw.items)
            .unwrap_or_default();
        let mut order = Self {
            id: raw.id,
            user_id: raw.user_id,
            customer_id: raw.customer_id,
            customer_name: raw.customer_name,
            email: raw.email,
            products,
            total: Decimal::ZERO,
            status: raw.status,
            shipping_address: raw.shipping_address,
            payment_method: raw.payment_method,
            created_at: raw.created_at,
            order_date: raw.order_date,
            updated_at: raw.updated_at,
            extra: raw.extra,
        };
        order.total = raw.total.unwrap_or_else(|| order.lines_total());
        order
    }
}

impl Order {
    /// A new pending order stamped with the current time.
    #[must_use]
    pub fn new(id: OrderId, products: Vec<OrderItem>) -> Self {
        let mut order = Self {
            id,
            user_id: None,
            customer_id: None,
            customer_name: None,
            email: None,
            products,
            total: Decimal::ZERO,
            status: OrderStatus::Pending,
            shipping_address: None,
            payment_method: None,
            created_at: Some(Utc::now()),
            order_date: None,
            updated_at: None,
            extra: Extra::new(),
        };
        order.total = order.lines_total();
        order
    }

    /// Whether the order was placed by `user`, under either owner field.
    #[must_use]
    pub fn belongs_to(&self, user: &UserId) -> bool {
        self.user_id.as_ref() == Some(user) || self.customer_id.as_ref() == Some(user)
    }

    /// `createdAt`, else the admin form's `orderDate`.
    #[must_use]
    pub fn placed_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.or(self.order_date)
    }

    /// Sum of line totals, saturating.
    #[must_use]
    pub fn lines_total(&self) -> Decimal {
        saturating_total(self.products.iter().map(OrderItem::line_total))
    }

    /// Sum of line totals for a new order.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] when a line or the sum does not fit.
    pub fn checked_lines_total(&self) -> Result<Decimal, PriceError> {
        let lines = self
            .products
            .iter()
            .map(OrderItem::checked_line_total)
            .collect::<Result<Vec<_>, _>>()?;
        checked_total(lines)
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.products
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Cancelled orders do not count toward revenue.
    #[must_use]
    pub fn counts_as_revenue(&self) -> bool {
        self.status != OrderStatus::Cancelled
    }

    /// Id or customer name contains `term`, ignoring case.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim();
        term.is_empty()
            || contains_ignore_case(self.id.as_str(), term)
            || self
                .customer_name
                .as_deref()
                .is_some_and(|name| contains_ignore_case(name, term))
    }

    /// Move to `next`, stamping `updatedAt` when something changed.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the order is already delivered or
    /// cancelled.
    pub fn set_status(&mut self, next: OrderStatus) -> Result<bool, TransitionError> {
        let changed = self.status.transition_to(next)?;
        if changed {
            self.status = next;
            self.updated_at = Some(Utc::now());
        }
        Ok(changed)
    }
}
