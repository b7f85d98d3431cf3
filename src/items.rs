//! Items

use serde::{Deserialize, Serialize};

use crate::{
    prices::Price,
    products::{CartLineItemInput, ProductId},
};

/// A product in the cart together with the quantity requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    product: CartLineItemInput,
    quantity: u32,
}

impl CartLineItem {
    /// Creates a new line item with a quantity of one.
    pub fn new(product: CartLineItemInput) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Returns the product identifier
    pub fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Returns the product details
    pub fn product(&self) -> &CartLineItemInput {
        &self.product
    }

    /// Returns the quantity requested
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the unit selling price
    pub fn price(&self) -> Price {
        self.product.price
    }

    /// Returns the unit list price
    pub fn mrp(&self) -> Price {
        self.product.mrp
    }

    /// Returns whether the product can currently be fulfilled
    pub fn in_stock(&self) -> bool {
        self.product.in_stock
    }

    /// Returns the per-line quantity cap
    pub fn max_quantity(&self) -> u32 {
        self.product.max_quantity
    }

    /// Selling price multiplied by quantity, in minor units.
    pub fn line_total(&self) -> i64 {
        self.product
            .price
            .saturating_mul(i64::from(self.quantity))
    }

    /// List price multiplied by quantity, in minor units.
    pub fn line_mrp(&self) -> i64 {
        self.product.mrp.saturating_mul(i64::from(self.quantity))
    }

    /// Difference between the list and selling totals for this line. May be negative.
    pub fn line_savings(&self) -> i64 {
        self.line_mrp().saturating_sub(self.line_total())
    }

    /// Bump the quantity by one, stopping at the cap. Returns the new quantity.
    pub(crate) fn increment(&mut self) -> u32 {
        self.quantity = self.quantity.saturating_add(1).min(self.max_quantity());
        self.quantity
    }

    /// Overwrite the quantity, clamped to `1..=max_quantity`.
    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.clamp(1, self.max_quantity().max(1));
    }
}
