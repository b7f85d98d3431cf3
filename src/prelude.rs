//! Enamel prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    checkout::{AppliedPromo, CheckoutError, CheckoutSummary, DeliveryPolicy, ensure_orderable},
    discounts::{DiscountError, DiscountRule},
    fixtures::{Fixture, FixtureError},
    items::CartLineItem,
    prices::{Price, PriceError, parse_currency},
    products::{CartLineItemInput, ProductError, ProductId, ProductRecord},
    promotions::{PromoCode, PromoCodeTable, PromoOutcome},
    receipt::{CartReceipt, ReceiptError},
    storage::{CartStorage, FileStorage, MemoryStorage, StorageError},
    store::{CartStore, SnapshotError, StoreError, StoreOptions},
};
