//! Pricing
//!
//! Sums over line items. All sums are in minor units and saturate rather than wrap.

use crate::items::CartLineItem;

/// Sum of `quantity` across all line items.
pub fn total_quantity(items: &[CartLineItem]) -> u64 {
    items
        .iter()
        .map(|item| u64::from(item.quantity()))
        .sum()
}

/// Sum of `price * quantity` across all line items.
pub fn total_price(items: &[CartLineItem]) -> i64 {
    items
        .iter()
        .fold(0_i64, |acc, item| acc.saturating_add(item.line_total()))
}

/// Sum of `mrp * quantity` across all line items.
pub fn total_mrp(items: &[CartLineItem]) -> i64 {
    items
        .iter()
        .fold(0_i64, |acc, item| acc.saturating_add(item.line_mrp()))
}
