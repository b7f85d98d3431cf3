//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    items::CartLineItem,
    prices::Price,
    pricing::{total_mrp, total_price, total_quantity},
    products::{CartLineItemInput, ProductId},
};

/// Errors related to cart construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Two line items share the same product id.
    #[error("product {0} appears more than once")]
    DuplicateItem(ProductId),

    /// A line item has a quantity outside `1..=max_quantity`.
    #[error("product {id} has quantity {quantity}, allowed range is 1..={max}")]
    InvalidQuantity {
        /// Product id
        id: ProductId,

        /// Stored quantity
        quantity: u32,

        /// Per-line cap
        max: u32,
    },
}

/// The ordered set of line items a shopper intends to purchase.
///
/// Holds at most one line per product id, in first-added order.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a cart from existing line items, e.g. when restoring a saved cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if two items share an id or a quantity is out of range.
    pub fn with_items(
        items: impl Into<Vec<CartLineItem>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, item)| {
            if items.iter().take(i).any(|seen| seen.id() == item.id()) {
                return Err(CartError::DuplicateItem(item.id().clone()));
            }

            if item.quantity() == 0 || item.quantity() > item.max_quantity() {
                return Err(CartError::InvalidQuantity {
                    id: item.id().clone(),
                    quantity: item.quantity(),
                    max: item.max_quantity(),
                });
            }

            Ok(())
        })?;

        Ok(Cart { items, currency })
    }

    /// Add one unit of a product.
    ///
    /// A new product is appended with quantity 1. A product already in the cart has its quantity
    /// incremented, silently capped at its `max_quantity`. Returns the resulting quantity.
    pub fn add_item(&mut self, item: CartLineItemInput) -> u32 {
        if let Some(existing) = self.find_mut(&item.id) {
            let before = existing.quantity();
            let after = existing.increment();

            if before == after {
                debug!(id = %item.id, max = existing.max_quantity(), "quantity cap reached");
            }

            return after;
        }

        self.items.push(CartLineItem::new(item));

        1
    }

    /// Remove the line item for `id`, returning it if it was present.
    pub fn remove_item(&mut self, id: &ProductId) -> Option<CartLineItem> {
        let index = self.items.iter().position(|item| item.id() == id)?;

        Some(self.items.remove(index))
    }

    /// Set the quantity of the line item for `id`.
    ///
    /// Requests below 1 are ignored; removal is only done through [`Cart::remove_item`].
    /// Requests above the item's cap are clamped to it. Returns `true` if the request was applied.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        if quantity < 1 {
            return false;
        }

        let Some(item) = self.find_mut(id) else {
            return false;
        };

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        item.set_quantity(quantity);

        true
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Look up the line item for `id`.
    pub fn get_item(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Sum of quantities across all line items.
    pub fn total_items(&self) -> u64 {
        total_quantity(&self.items)
    }

    /// The payable subtotal: sum of `price * quantity`.
    pub fn total_price(&self) -> Money<'static, Currency> {
        let subtotal = total_price(&self.items);

        Price::from_minor(subtotal).to_money(self.currency)
    }

    /// Sum of `mrp * quantity`.
    pub fn total_mrp(&self) -> Money<'static, Currency> {
        let mrp = total_mrp(&self.items);

        Price::from_minor(mrp).to_money(self.currency)
    }

    /// `total_mrp - total_price`. Not clamped, so a product priced above its MRP yields a
    /// negative value.
    pub fn total_savings(&self) -> Money<'static, Currency> {
        let mrp = total_mrp(&self.items);
        let savings = mrp.saturating_sub(total_price(&self.items));

        Price::from_minor(savings).to_money(self.currency)
    }

    /// Line items that are currently out of stock.
    pub fn out_of_stock_items(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter().filter(|item| !item.in_stock())
    }

    /// Iterate over the line items in display order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    /// The line items in display order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn find_mut(&mut self, id: &ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }
}
