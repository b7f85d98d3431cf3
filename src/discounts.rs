//! Discounts

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::prices::{Price, PriceError};

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A flat amount could not be expressed in the subtotal's currency.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// How a promo code reduces the subtotal.
#[derive(Debug, Copy, Clone)]
pub enum DiscountRule {
    /// Take a fraction of the subtotal off (e.g. "10% off").
    PercentageOff(Percentage),

    /// Take a flat amount, in major units of the cart currency, off (e.g. "50 off").
    AmountOff(Decimal),
}

impl DiscountRule {
    /// Calculate the discount this rule grants on `subtotal`.
    ///
    /// The result is never negative and never larger than the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the discount cannot be represented in minor units.
    pub fn discount_on(
        &self,
        subtotal: &Money<'static, Currency>,
    ) -> Result<Money<'static, Currency>, DiscountError> {
        let currency = subtotal.currency();
        let subtotal_minor = subtotal.to_minor_units().max(0);

        let discount_minor = match self {
            DiscountRule::PercentageOff(percent) => percent_of_minor(percent, subtotal_minor)?,
            DiscountRule::AmountOff(amount) => {
                *Price::from_major((*amount).max(Decimal::ZERO), currency)?
            }
        };

        Ok(Money::from_minor(
            discount_minor.clamp(0, subtotal_minor),
            currency,
        ))
    }
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// Halves round away from zero.
///
/// # Errors
///
/// Returns an error if the percentage calculation overflows or cannot be safely represented
/// (`DiscountError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor);
    let minor = minor.ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
