//! Enamel
//!
//! Enamel is the cart and pricing engine behind a dental-supplies storefront: line items with
//! per-product quantity caps, MRP savings, promo codes, delivery fees and a persisted cart.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod observability;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod storage;
pub mod store;
