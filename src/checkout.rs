//! Checkout
//!
//! Values the checkout flow derives from the cart. Nothing here is stored; a summary is
//! recomputed whenever the cart or the entered promo code changes.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::Cart,
    prices::{Price, PriceError},
    products::ProductId,
    promotions::{PromoCodeTable, PromoOutcome, normalize_code},
};

/// Errors that stop an order from being placed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Some line items cannot be fulfilled.
    #[error("out of stock: {}", join_ids(.0))]
    OutOfStock(Vec<ProductId>),

    /// A policy amount could not be expressed in the cart currency.
    #[error(transparent)]
    Price(#[from] PriceError),
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Delivery charge policy, in major units of the cart currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Subtotals at or above this amount ship free
    pub free_delivery_threshold: Decimal,

    /// Fee charged below the threshold
    pub flat_fee: Decimal,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            free_delivery_threshold: Decimal::new(5000, 0),
            flat_fee: Decimal::new(200, 0),
        }
    }
}

impl DeliveryPolicy {
    /// Delivery fee for a given (pre-promo) subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the policy amounts cannot be expressed in the subtotal currency.
    pub fn fee_for(
        &self,
        subtotal: &Money<'static, Currency>,
    ) -> Result<Money<'static, Currency>, PriceError> {
        let currency = subtotal.currency();
        let threshold = Price::from_major(self.free_delivery_threshold, currency)?;

        if subtotal.to_minor_units() >= *threshold {
            return Ok(Money::from_minor(0, currency));
        }

        let fee = Price::from_major(self.flat_fee, currency)?;

        Ok(fee.to_money(currency))
    }
}

/// A promo code as entered at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPromo {
    /// Normalised code
    pub code: String,

    /// Whether the code was recognised
    pub valid: bool,
}

/// Derived checkout totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSummary {
    /// Number of units across all lines
    pub item_count: u64,

    /// Sum of `price * quantity`
    pub subtotal: Money<'static, Currency>,

    /// Sum of `mrp * quantity`
    pub total_mrp: Money<'static, Currency>,

    /// `total_mrp - subtotal`
    pub savings: Money<'static, Currency>,

    /// Promo code entered, if any
    pub promo: Option<AppliedPromo>,

    /// Discount granted by the promo code
    pub promo_discount: Money<'static, Currency>,

    /// Delivery charge
    pub delivery_fee: Money<'static, Currency>,

    /// `subtotal - promo_discount + delivery_fee`
    pub final_total: Money<'static, Currency>,
}

impl CheckoutSummary {
    /// Derive checkout totals from the cart and an already-applied promo outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError::Price`] if the delivery policy cannot be priced.
    pub fn new(
        cart: &Cart,
        promo: Option<&PromoOutcome>,
        policy: &DeliveryPolicy,
    ) -> Result<Self, CheckoutError> {
        let currency = cart.currency();
        let subtotal = cart.total_price();

        let promo_discount = promo
            .filter(|outcome| outcome.valid)
            .map_or_else(
                || Money::from_minor(0, currency),
                |outcome| outcome.discount,
            );

        let delivery_fee = policy.fee_for(&subtotal)?;

        let final_total = subtotal
            .to_minor_units()
            .saturating_sub(promo_discount.to_minor_units())
            .saturating_add(delivery_fee.to_minor_units());

        Ok(Self {
            item_count: cart.total_items(),
            subtotal,
            total_mrp: cart.total_mrp(),
            savings: cart.total_savings(),
            promo: None,
            promo_discount,
            delivery_fee,
            final_total: Money::from_minor(final_total, currency),
        })
    }

    /// Look up `code` (if given) and derive checkout totals.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError::Price`] if the delivery policy cannot be priced.
    pub fn quote(
        cart: &Cart,
        promotions: &PromoCodeTable,
        code: Option<&str>,
        policy: &DeliveryPolicy,
    ) -> Result<Self, CheckoutError> {
        let Some(code) = code.filter(|code| !code.trim().is_empty()) else {
            return Self::new(cart, None, policy);
        };

        let outcome = promotions.apply(code, &cart.total_price());
        let mut summary = Self::new(cart, Some(&outcome), policy)?;

        summary.promo = Some(AppliedPromo {
            code: normalize_code(code),
            valid: outcome.valid,
        });

        Ok(summary)
    }
}

/// Check that the cart can be turned into an order.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart, or [`CheckoutError::OutOfStock`]
/// listing every line that cannot be fulfilled.
pub fn ensure_orderable(cart: &Cart) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let out_of_stock: Vec<ProductId> = cart
        .out_of_stock_items()
        .map(|item| item.id().clone())
        .collect();

    if out_of_stock.is_empty() {
        Ok(())
    } else {
        Err(CheckoutError::OutOfStock(out_of_stock))
    }
}
