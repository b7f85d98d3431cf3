//! Promo codes
//!
//! A promo code is looked up case-insensitively (after trimming) in a [`PromoCodeTable`] and
//! turned into a discount against the current subtotal. The table is plain data, so the set of
//! codes can be swapped at runtime or loaded from a fixture.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use tracing::warn;

use crate::discounts::DiscountRule;

/// A single promo code definition.
#[derive(Debug, Clone)]
pub struct PromoCode {
    /// Normalised code (trimmed, upper-case)
    pub code: String,

    /// Human readable description
    pub description: Option<String>,

    /// Discount granted by the code
    pub rule: DiscountRule,
}

/// Result of applying a promo code to a subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoOutcome {
    /// Amount to take off the subtotal
    pub discount: Money<'static, Currency>,

    /// Whether the code was recognised
    pub valid: bool,
}

impl PromoOutcome {
    /// An unrecognised code: no discount.
    pub fn invalid(currency: &'static Currency) -> Self {
        Self {
            discount: Money::from_minor(0, currency),
            valid: false,
        }
    }
}

/// Lookup table of known promo codes.
#[derive(Debug, Clone)]
pub struct PromoCodeTable {
    codes: FxHashMap<String, PromoCode>,
}

impl PromoCodeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            codes: FxHashMap::default(),
        }
    }

    /// Register a code, replacing any existing definition with the same normalised form.
    pub fn insert(
        &mut self,
        code: &str,
        description: Option<String>,
        rule: DiscountRule,
    ) -> &mut Self {
        let code = normalize_code(code);

        self.codes.insert(
            code.clone(),
            PromoCode {
                code,
                description,
                rule,
            },
        );

        self
    }

    /// Find the definition for `code`.
    pub fn get(&self, code: &str) -> Option<&PromoCode> {
        self.codes.get(&normalize_code(code))
    }

    /// Apply `code` to `subtotal`.
    ///
    /// Unknown codes yield `valid: false` with a zero discount.
    pub fn apply(&self, code: &str, subtotal: &Money<'static, Currency>) -> PromoOutcome {
        let currency = subtotal.currency();

        let Some(promo) = self.get(code) else {
            warn!(code, "unknown promo code");
            return PromoOutcome::invalid(currency);
        };

        match promo.rule.discount_on(subtotal) {
            Ok(discount) => PromoOutcome {
                discount,
                valid: true,
            },
            Err(error) => {
                warn!(code = %promo.code, %error, "promo code discount could not be calculated");
                PromoOutcome::invalid(currency)
            }
        }
    }

    /// Iterate over the known codes.
    pub fn iter(&self) -> impl Iterator<Item = &PromoCode> {
        self.codes.values()
    }

    /// Number of known codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if no codes are known.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for PromoCodeTable {
    /// The storefront's stock codes: `DENTAL10`, `SAVE20` and `FIRST50`.
    fn default() -> Self {
        let mut table = Self::new();

        table
            .insert(
                "DENTAL10",
                Some("10% off your order".to_string()),
                DiscountRule::PercentageOff(Percentage::from(0.10)),
            )
            .insert(
                "SAVE20",
                Some("20% off your order".to_string()),
                DiscountRule::PercentageOff(Percentage::from(0.20)),
            )
            .insert(
                "FIRST50",
                Some("50 off your first order".to_string()),
                DiscountRule::AmountOff(Decimal::new(50, 0)),
            );

        table
    }
}

/// Canonical form of a user-entered code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
