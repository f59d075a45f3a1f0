//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are stored as plain JSON numbers in taka. All arithmetic
//! happens on [`Decimal`] so discounts and order totals do not drift.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when validating prices and discounts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount is above [`MAX_PRICE`].
    #[error("price cannot exceed {MAX_PRICE}")]
    TooLarge,
    /// The discount percentage is outside 0-100.
    #[error("discount must be between 0 and 100 percent")]
    DiscountOutOfRange,
    /// A line or order total does not fit in a [`Decimal`].
    #[error("amount is too large")]
    Overflow,
}

/// Highest unit price the admin forms accept: one billion taka.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (taka, not poisha).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a non-negative price in the store currency.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero and
    /// [`PriceError::TooLarge`] above [`MAX_PRICE`].
    pub fn parse(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount > MAX_PRICE {
            return Err(PriceError::TooLarge);
        }
        Ok(Self::new(amount, CurrencyCode::default()))
    }

    /// Apply a percentage discount.
    #[must_use]
    pub fn with_discount(self, percent: Decimal) -> Self {
        Self::new(discounted(self.amount, percent), self.currency_code)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Bangladeshi taka.
    #[default]
    BDT,
    USD,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::BDT => "৳",
            Self::USD => "$",
        }
    }
}

/// Check a discount percentage entered through the admin form.
///
/// # Errors
///
/// Returns [`PriceError::DiscountOutOfRange`] unless `0 <= percent <= 100`.
pub fn validate_discount(percent: Decimal) -> Result<(), PriceError> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(PriceError::DiscountOutOfRange);
    }
    Ok(())
}

/// `price - price * percent / 100`, rounded half away from zero to 2 dp.
///
/// Out-of-range percentages already in the data file are clamped so a bad
/// record can never produce a negative or inflated price.
#[must_use]
pub fn discounted(price: Decimal, percent: Decimal) -> Decimal {
    let percent = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let off = price.checked_mul(percent).map_or_else(
        || price / Decimal::ONE_HUNDRED * percent,
        |scaled| scaled / Decimal::ONE_HUNDRED,
    );
    (price - off).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `unit * quantity`.
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] when the product does not fit.
pub fn line_total(unit: Decimal, quantity: u32) -> Result<Decimal, PriceError> {
    unit.checked_mul(Decimal::from(quantity))
        .ok_or(PriceError::Overflow)
}

/// Sum of `amounts`.
///
/// # Errors
///
/// Returns [`PriceError::Overflow`] when the sum does not fit.
pub fn checked_total(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, PriceError> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or(PriceError::Overflow)
}

/// Sum of `amounts`, pinned at the [`Decimal`] bounds. Reports over stored
/// records use this so one corrupt total cannot take a page down.
#[must_use]
pub fn saturating_total(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}
