//! Dashboard and analytics figures.
//!
//! Everything here is computed from one snapshot of the data file. Revenue
//! never includes cancelled orders; order counts do.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use makeover_core::serde_util::money;
use makeover_core::store::DataFile;
use makeover_core::{Order, OrderId, OrderStatus, ProductId, saturating_total};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// How many orders the "recent" lists show.
const RECENT_LIMIT: usize = 5;
/// How many products the top-sellers list shows.
const TOP_PRODUCTS_LIMIT: usize = 5;
/// Days covered by the revenue chart, today included.
const REVENUE_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
    pub id: ProductId,
    pub name: String,
    pub stock: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: OrderId,
    pub customer: String,
    #[serde(with = "money")]
    pub amount: Decimal,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_at: Option<DateTime<Utc>>,
}

impl From<&Order> for RecentOrder {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            customer: order.customer_name.clone().unwrap_or_default(),
            amount: order.total,
            status: order.status,
            placed_at: order.placed_at(),
        }
    }
}

/// Dashboard overview cards, to-do counts and the recent orders table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(with = "money")]
    pub revenue: Decimal,
    pub order_count: usize,
    pub active_users: usize,
    pub low_stock_count: usize,
    pub low_stock: Vec<LowStockProduct>,
    pub processing_orders: usize,
    pub unread_messages: usize,
    pub unread_notifications: usize,
    pub recent_orders: Vec<RecentOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub name: String,
    /// Units sold.
    pub sales: u32,
    #[serde(with = "money")]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: NaiveDate,
    #[serde(with = "money")]
    pub revenue: Decimal,
}

/// The analytics page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    #[serde(with = "money")]
    pub revenue: Decimal,
    pub order_count: usize,
    #[serde(with = "money")]
    pub average_order_value: Decimal,
    pub active_users: usize,
    pub top_products: Vec<ProductSales>,
    pub recent_transactions: Vec<RecentOrder>,
    /// Oldest day first, one entry per day including days without sales.
    pub revenue_by_day: Vec<DailyRevenue>,
}

/// Build the dashboard. Products with tracked stock at or below
/// `low_stock_threshold` are low.
#[must_use]
pub fn dashboard(doc: &DataFile, low_stock_threshold: i64) -> Dashboard {
    let low_stock: Vec<LowStockProduct> = doc
        .products
        .iter()
        .filter(|p| p.is_low_stock(low_stock_threshold))
        .map(|p| LowStockProduct {
            id: p.id,
            name: p.name.clone(),
            stock: p.stock.unwrap_or_default(),
        })
        .collect();

    Dashboard {
        revenue: revenue(doc),
        order_count: doc.orders.len(),
        active_users: active_users(doc),
        low_stock_count: low_stock.len(),
        low_stock,
        processing_orders: doc
            .orders
            .iter()
            .filter(|o| o.status == OrderStatus::Processing)
            .count(),
        unread_messages: doc.unread_messages(),
        unread_notifications: doc.unread_notifications(),
        recent_orders: recent_orders(doc),
    }
}

/// Build the analytics page with the revenue chart ending on `today`.
#[must_use]
pub fn analytics(doc: &DataFile, today: NaiveDate) -> Analytics {
    let revenue = revenue(doc);
    let paid = doc.orders.iter().filter(|o| o.counts_as_revenue()).count();
    let average_order_value = if paid == 0 {
        Decimal::ZERO
    } else {
        (revenue / Decimal::from(paid))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };

    Analytics {
        revenue,
        order_count: doc.orders.len(),
        average_order_value,
        active_users: active_users(doc),
        top_products: top_products(doc),
        recent_transactions: recent_orders(doc),
        revenue_by_day: revenue_by_day(doc, today),
    }
}

/// Saturates at `Decimal::MAX` rather than failing the whole page.
fn revenue(doc: &DataFile) -> Decimal {
    saturating_total(
        doc.orders
            .iter()
            .filter(|o| o.counts_as_revenue())
            .map(|o| o.total),
    )
}

fn active_users(doc: &DataFile) -> usize {
    doc.users.iter().filter(|u| u.status.is_active()).count()
}

/// Newest first; undated orders go last in file order.
fn recent_orders(doc: &DataFile) -> Vec<RecentOrder> {
    let mut orders: Vec<&Order> = doc.orders.iter().collect();
    orders.sort_by(|a, b| match (a.placed_at(), b.placed_at()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    orders
        .into_iter()
        .take(RECENT_LIMIT)
        .map(RecentOrder::from)
        .collect()
}

/// Order lines grouped by product name, highest revenue first.
fn top_products(doc: &DataFile) -> Vec<ProductSales> {
    let mut by_name: HashMap<&str, ProductSales> = HashMap::new();
    for line in doc
        .orders
        .iter()
        .filter(|o| o.counts_as_revenue())
        .flat_map(|o| &o.products)
    {
        let entry = by_name.entry(line.name.as_str()).or_insert_with(|| ProductSales {
            name: line.name.clone(),
            sales: 0,
            revenue: Decimal::ZERO,
        });
        entry.sales = entry.sales.saturating_add(line.quantity);
        entry.revenue = entry.revenue.saturating_add(line.line_total());
    }

    let mut top: Vec<ProductSales> = by_name.into_values().collect();
    top.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    top.truncate(TOP_PRODUCTS_LIMIT);
    top
}

fn revenue_by_day(doc: &DataFile, today: NaiveDate) -> Vec<DailyRevenue> {
    let first = today
        .checked_sub_days(Days::new(REVENUE_DAYS - 1))
        .unwrap_or(today);
    let mut days: Vec<DailyRevenue> = first
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|date| DailyRevenue {
            date,
            revenue: Decimal::ZERO,
        })
        .collect();

    for order in doc.orders.iter().filter(|o| o.counts_as_revenue()) {
        let Some(day) = order.placed_at().map(|at| at.date_naive()) else {
            continue;
        };
        if let Some(bucket) = days.iter_mut().find(|d| d.date == day) {
            bucket.revenue = bucket.revenue.saturating_add(order.total);
        }
    }
    days
}
