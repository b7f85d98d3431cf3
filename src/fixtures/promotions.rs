//! Promotion Fixtures

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{discounts::DiscountRule, fixtures::FixtureError, promotions::PromoCodeTable};

/// Wrapper for promo codes in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Map of promo code -> definition
    pub promotions: FxHashMap<String, PromotionFixture>,
}

/// Promo code definition from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromotionFixture {
    /// Percentage of the subtotal off
    PercentageOff {
        /// Human readable description
        #[serde(default)]
        description: Option<String>,

        /// Percentage, either "10%" or "0.10"
        percentage: String,
    },

    /// Flat amount off, in major units of the cart currency
    AmountOff {
        /// Human readable description
        #[serde(default)]
        description: Option<String>,

        /// Amount off
        amount: Decimal,
    },
}

impl PromotionsFixture {
    /// Convert into a promo code table
    ///
    /// # Errors
    ///
    /// Returns an error if a percentage is malformed or outside 0-100%, or if an amount is
    /// negative.
    pub fn try_into_table(self) -> Result<PromoCodeTable, FixtureError> {
        let mut table = PromoCodeTable::new();

        for (code, fixture) in self.promotions {
            let (description, rule) = fixture.try_into_rule(&code)?;

            table.insert(&code, description, rule);
        }

        Ok(table)
    }
}

impl PromotionFixture {
    fn try_into_rule(self, code: &str) -> Result<(Option<String>, DiscountRule), FixtureError> {
        match self {
            PromotionFixture::PercentageOff {
                description,
                percentage,
            } => Ok((
                description,
                DiscountRule::PercentageOff(parse_percentage(&percentage)?),
            )),
            PromotionFixture::AmountOff {
                description,
                amount,
            } => {
                if amount < Decimal::ZERO {
                    return Err(FixtureError::InvalidPromotionData(format!(
                        "{code}: amount {amount} is negative"
                    )));
                }

                Ok((description, DiscountRule::AmountOff(amount)))
            }
        }
    }
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or is outside 0-100%.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let value = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<f64>()
            .map(|value| value / 100.0)
    } else {
        trimmed.parse::<f64>()
    }
    .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}
