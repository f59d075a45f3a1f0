//! Global admin search.

use makeover_core::models::contains_ignore_case;
use makeover_core::store::DataFile;
use makeover_core::{CurrencyCode, Price};
use serde::Serialize;

/// Terms shorter than this match nothing.
pub const MIN_TERM_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
    Product,
    Order,
    User,
}

/// One search result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    #[serde(rename = "type")]
    pub kind: HitKind,
    pub id: String,
    pub title: String,
    pub subtitle: String,
}

/// Products (name or any category), then orders (id or customer name), then
/// users (name or email), each in file order.
#[must_use]
pub fn search(doc: &DataFile, term: &str) -> Vec<SearchHit> {
    let term = term.trim();
    if term.chars().count() < MIN_TERM_CHARS {
        return Vec::new();
    }

    let products = doc
        .products
        .iter()
        .filter(|p| {
            contains_ignore_case(&p.name, term)
                || p.category.iter().any(|c| contains_ignore_case(c, term))
        })
        .map(|p| SearchHit {
            kind: HitKind::Product,
            id: p.id.to_string(),
            title: p.name.clone(),
            subtitle: format!("{} - {}", p.category.join(", "), taka(p.original_price)),
        });

    let orders = doc
        .orders
        .iter()
        .filter(|o| o.matches_search(term))
        .map(|o| SearchHit {
            kind: HitKind::Order,
            id: o.id.to_string(),
            title: format!("Order {}", o.id),
            subtitle: format!(
                "{} - {}",
                o.customer_name.as_deref().unwrap_or_default(),
                taka(o.total)
            ),
        });

    let users = doc
        .users
        .iter()
        .filter(|u| {
            contains_ignore_case(&u.first_name, term)
                || contains_ignore_case(&u.last_name, term)
                || contains_ignore_case(&u.email, term)
        })
        .map(|u| SearchHit {
            kind: HitKind::User,
            id: u.id.to_string(),
            title: format!("{} {}", u.first_name, u.last_name).trim().to_owned(),
            subtitle: u.email.clone(),
        });

    products.chain(orders).chain(users).collect()
}

fn taka(amount: rust_decimal::Decimal) -> Price {
    Price::new(amount, CurrencyCode::BDT)
}
