//! Manual order entry from the dashboard form.

use makeover_core::cart::MAX_LINE_QUANTITY;
use makeover_core::{Email, Order, OrderId, OrderItem, OrderStatus, Price, ProductId, UserId};
use rust_decimal::Decimal;
use serde_json::Value;

use super::ValidationError;
use super::catalog::price_message;

/// One line typed into the manual order form.
#[derive(Debug, Clone)]
pub struct ManualLine {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
}

/// The manual order form.
#[derive(Debug, Clone, Default)]
pub struct ManualOrder {
    pub customer_name: String,
    pub email: Option<String>,
    pub customer_id: Option<UserId>,
    pub lines: Vec<ManualLine>,
    pub shipping_address: Option<Value>,
    pub payment_method: Option<String>,
}

/// Turn a manual order form into a `processing` order with a computed total.
///
/// The returned order carries a placeholder id; the repository assigns the
/// real one.
///
/// # Errors
///
/// Returns [`ValidationError`] for a blank customer name, a malformed email,
/// no lines, or a line with a blank name, a price outside 0 to `MAX_PRICE`
/// or a quantity outside 1 to [`MAX_LINE_QUANTITY`].
pub fn build_manual_order(form: ManualOrder) -> Result<Order, ValidationError> {
    let customer_name = form.customer_name.trim();
    if customer_name.is_empty() {
        return Err(ValidationError::new("Customer name is required"));
    }
    let email = form
        .email
        .filter(|e| !e.trim().is_empty())
        .map(|e| Email::parse(&e).map(Email::into_inner))
        .transpose()
        .map_err(|_| ValidationError::new("Please enter a valid email address"))?;
    if form.lines.is_empty() {
        return Err(ValidationError::new("Order must contain at least one item"));
    }

    let items = form
        .lines
        .into_iter()
        .map(|line| {
            let name = line.name.trim();
            if name.is_empty() {
                return Err(ValidationError::new("Every item needs a name"));
            }
            Price::parse(line.price).map_err(price_message)?;
            let quantity = u32::try_from(line.quantity)
                .ok()
                .filter(|q| (1..=MAX_LINE_QUANTITY).contains(q))
                .ok_or_else(|| {
                    ValidationError::new(format!(
                        "Quantity must be between 1 and {MAX_LINE_QUANTITY}"
                    ))
                })?;
            Ok(OrderItem::new(line.product_id, name, line.price, quantity))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut order = Order::new(OrderId::new("pending"), items);
    order.total = order
        .checked_lines_total()
        .map_err(|_| ValidationError::new("Order total is too large"))?;
    order.status = OrderStatus::Processing;
    order.customer_name = Some(customer_name.to_owned());
    order.email = email;
    order.customer_id = form.customer_id;
    order.shipping_address = form.shipping_address;
    order.payment_method = form.payment_method;
    Ok(order)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(name: &str, price: i64, quantity: i64) -> ManualLine {
        ManualLine {
            product_id: None,
            name: name.to_owned(),
            price: Decimal::from(price),
            quantity,
        }
    }

    #[test]
    fn test_total_and_status() {
        let order = build_manual_order(ManualOrder {
            customer_name: " Walk-in ".into(),
            email: Some("walkin@example.com".into()),
            lines: vec![line("Toner", 600, 2), line("Lip Balm", 150, 1)],
            ..ManualOrder::default()
        })
        .unwrap();
        assert_eq!(order.total, Decimal::from(1350));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.customer_name.as_deref(), Some("Walk-in"));
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_rejections() {
        let base = ManualOrder {
            customer_name: "A".into(),
            lines: vec![line("Toner", 600, 1)],
            ..ManualOrder::default()
        };

        let err = build_manual_order(ManualOrder {
            customer_name: String::new(),
            ..base.clone()
        })
        .unwrap_err();
        assert_eq!(err.0, "Customer name is required");

        let err = build_manual_order(ManualOrder {
            lines: Vec::new(),
            ..base.clone()
        })
        .unwrap_err();
        assert_eq!(err.0, "Order must contain at least one item");

        let err = build_manual_order(ManualOrder {
            lines: vec![line("Toner", 600, 0)],
            ..base.clone()
        })
        .unwrap_err();
        assert_eq!(err.0, "Quantity must be between 1 and 10000");

        let err = build_manual_order(ManualOrder {
            email: Some("not-an-email".into()),
            ..base
        })
        .unwrap_err();
        assert_eq!(err.0, "Please enter a valid email address");
    }

    #[test]
    fn test_oversized_lines_are_rejected() {
        let base = ManualOrder {
            customer_name: "A".into(),
            ..ManualOrder::default()
        };

        let huge = ManualLine {
            price: Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_000, 0),
            ..line("Toner", 0, 2)
        };
        let err = build_manual_order(ManualOrder {
            lines: vec![huge],
            ..base.clone()
        })
        .unwrap_err();
        assert_eq!(err.0, "Price cannot exceed 1000000000");

        let err = build_manual_order(ManualOrder {
            lines: vec![line("Toner", 600, 10_001)],
            ..base.clone()
        })
        .unwrap_err();
        assert_eq!(err.0, "Quantity must be between 1 and 10000");

        let order = build_manual_order(ManualOrder {
            lines: vec![line("Toner", 1_000_000_000, 10_000)],
            ..base
        })
        .unwrap();
        assert_eq!(order.total, Decimal::from(10_000_000_000_000_i64));
    }
}
