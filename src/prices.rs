//! Prices

use std::ops::Deref;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when converting external amounts into prices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount was below zero.
    #[error("price {0} is negative")]
    Negative(Decimal),

    /// The amount does not fit in minor units.
    #[error("price {0} cannot be represented in minor units")]
    Unrepresentable(Decimal),

    /// The currency code is not one the engine trades in.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Represents a price in minor units (paise/pence/cents).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price {
    minor: i64,
}

impl Price {
    /// A zero price.
    pub const ZERO: Price = Price { minor: 0 };

    /// Creates a new price from minor units.
    pub fn from_minor(minor: i64) -> Self {
        Price { minor }
    }

    /// Creates a new price from a major-unit amount (e.g. rupees) in the given currency.
    ///
    /// Fractions smaller than one minor unit are rounded half away from zero.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the amount is negative or cannot be represented in minor units.
    pub fn from_major(amount: Decimal, currency: &Currency) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }

        let scale = 10_i64
            .checked_pow(currency.exponent)
            .map(Decimal::from)
            .ok_or(PriceError::Unrepresentable(amount))?;

        let rounding = RoundingStrategy::MidpointAwayFromZero;
        let minor = amount
            .checked_mul(scale)
            .map(|value| value.round_dp_with_strategy(0, rounding))
            .and_then(|value| value.to_i64())
            .ok_or(PriceError::Unrepresentable(amount))?;

        Ok(Price { minor })
    }

    /// Returns the price as money in the given currency.
    pub fn to_money(self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_minor(self.minor, currency)
    }
}

impl Deref for Price {
    type Target = i64;

    fn deref(&self) -> &Self::Target {
        &self.minor
    }
}

/// Resolve a currency code (e.g. `"INR"`) to its ISO definition.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for codes outside the supported set.
pub fn parse_currency(code: &str) -> Result<&'static Currency, PriceError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "INR" => Ok(iso::INR),
        "GBP" => Ok(iso::GBP),
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        _ => Err(PriceError::UnknownCurrency(code.to_string())),
    }
}
