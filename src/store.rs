//! Cart store
//!
//! [`CartStore`] owns the shopper's cart for the lifetime of a session. It is hydrated from
//! durable storage by [`CartStore::init`], writes the full cart back after every mutation, and
//! hands its storage back on [`CartStore::teardown`].

use rusty_money::iso::{self, Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::{Cart, CartError},
    checkout::{CheckoutError, CheckoutSummary, DeliveryPolicy, ensure_orderable},
    items::CartLineItem,
    prices::{PriceError, parse_currency},
    products::{CartLineItemInput, ProductId},
    promotions::PromoCodeTable,
    storage::{CartStorage, StorageError},
};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "cart-storage";

/// Current persisted snapshot layout.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors raised while decoding a persisted cart.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The stored value is not a valid snapshot document.
    #[error("malformed cart snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot was written by an incompatible version.
    #[error("unsupported cart snapshot version {0}")]
    UnsupportedVersion(u32),

    /// The snapshot currency is unknown.
    #[error(transparent)]
    Currency(#[from] PriceError),

    /// The snapshot items violate cart invariants.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Errors raised by the cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The cart could not be serialised.
    #[error("failed to serialise cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The order could not be placed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

#[derive(Debug, Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    currency: &'static str,
    items: &'a [CartLineItem],
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    version: u32,
    currency: String,
    items: Vec<CartLineItem>,
}

/// Serialise a cart to its persisted form.
///
/// # Errors
///
/// Returns a `serde_json::Error` if serialisation fails.
pub fn serialize_cart(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        currency: cart.currency().iso_alpha_code,
        items: cart.items(),
    })
}

/// Restore a cart from its persisted form.
///
/// # Errors
///
/// Returns a [`SnapshotError`] if the value is malformed, from another snapshot version, uses an
/// unknown currency or breaks cart invariants.
pub fn deserialize_cart(raw: &str) -> Result<Cart, SnapshotError> {
    let snapshot: Snapshot = serde_json::from_str(raw)?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(snapshot.version));
    }

    let currency = parse_currency(&snapshot.currency)?;

    Ok(Cart::with_items(snapshot.items, currency)?)
}

/// Cart store settings.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Key the cart is persisted under
    pub key: String,

    /// Currency for a fresh cart; saved carts in another currency are discarded
    pub currency: &'static Currency,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            currency: iso::INR,
        }
    }
}

/// The session's cart together with the storage it is persisted to.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    cart: Cart,
    storage: S,
    key: String,
}

impl<S: CartStorage> CartStore<S> {
    /// Hydrate the cart from `storage`.
    ///
    /// A missing snapshot gives an empty cart. A snapshot that cannot be decoded, or that is in a
    /// different currency, is discarded with a warning and an empty cart is used instead.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Storage`] if the storage backend cannot be read.
    pub fn init(storage: S, options: StoreOptions) -> Result<Self, StoreError> {
        let StoreOptions { key, currency } = options;

        let cart = match storage.load(&key)? {
            None => Cart::new(currency),
            Some(raw) => match deserialize_cart(&raw) {
                Ok(cart) if cart.currency() == currency => cart,
                Ok(cart) => {
                    warn!(
                        key = %key,
                        stored = cart.currency().iso_alpha_code,
                        expected = currency.iso_alpha_code,
                        "discarding saved cart in a different currency"
                    );
                    Cart::new(currency)
                }
                Err(error) => {
                    warn!(key = %key, %error, "discarding unreadable saved cart");
                    Cart::new(currency)
                }
            },
        };

        info!(
            key = %key,
            lines = cart.len(),
            units = cart.total_items(),
            "cart hydrated"
        );

        Ok(Self { cart, storage, key })
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add one unit of `item` and persist. Returns the resulting quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the cart cannot be persisted. The in-memory cart keeps the
    /// change.
    pub fn add_item(&mut self, item: CartLineItemInput) -> Result<u32, StoreError> {
        let id = item.id.clone();
        let quantity = self.cart.add_item(item);

        debug!(%id, quantity, "item added");

        self.persist()?;

        Ok(quantity)
    }

    /// Remove the line for `id` and persist. Returns the removed line, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the cart cannot be persisted.
    pub fn remove_item(&mut self, id: &ProductId) -> Result<Option<CartLineItem>, StoreError> {
        let removed = self.cart.remove_item(id);

        if removed.is_some() {
            debug!(%id, "item removed");
            self.persist()?;
        }

        Ok(removed)
    }

    /// Set the quantity for `id` and persist. Returns whether the request was applied.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the cart cannot be persisted.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<bool, StoreError> {
        let applied = self.cart.update_quantity(id, quantity);

        if applied {
            debug!(%id, quantity, "quantity updated");
            self.persist()?;
        } else {
            debug!(%id, quantity, "quantity update ignored");
        }

        Ok(applied)
    }

    /// Empty the cart and persist.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the cart cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<(), StoreError> {
        self.cart.clear();

        debug!("cart cleared");

        self.persist()
    }

    /// Validate the cart, derive the final totals and clear the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Checkout`] if the cart is empty or holds out-of-stock items (the
    /// cart is left untouched), or a storage error if clearing cannot be persisted.
    pub fn place_order(
        &mut self,
        promotions: &PromoCodeTable,
        code: Option<&str>,
        policy: &DeliveryPolicy,
    ) -> Result<CheckoutSummary, StoreError> {
        ensure_orderable(&self.cart)?;

        let summary = CheckoutSummary::quote(&self.cart, promotions, code, policy)?;

        info!(
            units = summary.item_count,
            total = %summary.final_total,
            "order placed"
        );

        self.clear_cart()?;

        Ok(summary)
    }

    /// Flush the cart one last time and release the storage.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the cart cannot be persisted.
    pub fn teardown(mut self) -> Result<S, StoreError> {
        self.persist()?;

        info!(key = %self.key, "cart store closed");

        Ok(self.storage)
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let raw = serialize_cart(&self.cart)?;

        self.storage.save(&self.key, &raw)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use crate::{prices::Price, storage::MemoryStorage};

    use super::*;

    fn product(id: i64) -> CartLineItemInput {
        CartLineItemInput::new(id, format!("Product {id}"), Price::from_minor(100))
    }

    #[test]
    fn serialize_then_deserialize_is_identity() -> TestResult {
        let mut cart = Cart::new(INR);
        cart.add_item(product(3).with_brand("Ivoclar"));
        cart.add_item(product(1));
        cart.add_item(CartLineItemInput::new(
            "sku-9",
            "Bur Set",
            Price::from_minor(999),
        ));
        cart.update_quantity(&ProductId::Int(1), 4);

        let restored = deserialize_cart(&serialize_cart(&cart)?)?;

        assert_eq!(restored, cart);

        Ok(())
    }

    #[test]
    fn deserialize_rejects_other_versions() {
        let result = deserialize_cart(r#"{"version":99,"currency":"INR","items":[]}"#);

        assert!(matches!(result, Err(SnapshotError::UnsupportedVersion(99))));
    }

    #[test]
    fn deserialize_rejects_duplicate_lines() -> TestResult {
        let mut cart = Cart::new(INR);
        cart.add_item(product(1));

        let raw = serialize_cart(&cart)?;
        let line = concat!(
            r#"{"product":{"id":1,"name":"x","price":1,"mrp":1,"inStock":true,"maxQuantity":10},"#,
            r#""quantity":1},"#,
        );
        let doubled = raw.replace(r#""items":["#, &format!(r#""items":[{line}"#));

        assert!(matches!(
            deserialize_cart(&doubled),
            Err(SnapshotError::Cart(CartError::DuplicateItem(_)))
        ));

        Ok(())
    }

    #[test]
    fn init_with_empty_storage_gives_empty_cart() -> TestResult {
        let store = CartStore::init(MemoryStorage::new(), StoreOptions::default())?;

        assert!(store.cart().is_empty());
        assert_eq!(store.cart().currency(), INR);

        Ok(())
    }

    #[test]
    fn mutations_are_persisted() -> TestResult {
        let mut store = CartStore::init(MemoryStorage::new(), StoreOptions::default())?;

        store.add_item(product(1))?;
        store.add_item(product(2))?;
        store.update_quantity(&ProductId::Int(2), 3)?;

        let storage = store.teardown()?;
        let store = CartStore::init(storage, StoreOptions::default())?;

        assert_eq!(store.cart().total_items(), 4);
        assert_eq!(store.cart().len(), 2);

        Ok(())
    }

    #[test]
    fn clear_is_persisted() -> TestResult {
        let mut store = CartStore::init(MemoryStorage::new(), StoreOptions::default())?;

        store.add_item(product(1))?;
        store.clear_cart()?;

        let store = CartStore::init(store.teardown()?, StoreOptions::default())?;

        assert!(store.cart().is_empty());

        Ok(())
    }

    #[test]
    fn corrupt_snapshot_is_discarded() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.save(DEFAULT_STORAGE_KEY, "{not json")?;

        let store = CartStore::init(storage, StoreOptions::default())?;

        assert!(store.cart().is_empty());

        Ok(())
    }

    #[test]
    fn snapshot_in_other_currency_is_discarded() -> TestResult {
        let mut cart = Cart::new(GBP);
        cart.add_item(product(1));

        let mut storage = MemoryStorage::new();
        storage.save(DEFAULT_STORAGE_KEY, &serialize_cart(&cart)?)?;

        let store = CartStore::init(storage, StoreOptions::default())?;

        assert!(store.cart().is_empty());
        assert_eq!(store.cart().currency(), INR);

        Ok(())
    }

    #[test]
    fn custom_key_is_used() -> TestResult {
        let options = StoreOptions {
            key: "clinic-cart".to_string(),
            ..StoreOptions::default()
        };

        let mut store = CartStore::init(MemoryStorage::new(), options)?;
        store.add_item(product(1))?;

        let storage = store.teardown()?;

        assert!(storage.load("clinic-cart")?.is_some());
        assert!(storage.load(DEFAULT_STORAGE_KEY)?.is_none());

        Ok(())
    }

    #[test]
    fn place_order_clears_cart() -> TestResult {
        let mut store = CartStore::init(MemoryStorage::new(), StoreOptions::default())?;
        store.add_item(product(1))?;

        let summary = store.place_order(
            &PromoCodeTable::default(),
            None,
            &DeliveryPolicy::default(),
        )?;

        assert_eq!(summary.item_count, 1);
        assert!(store.cart().is_empty());

        Ok(())
    }

    #[test]
    fn place_order_with_out_of_stock_keeps_cart() -> TestResult {
        let mut store = CartStore::init(MemoryStorage::new(), StoreOptions::default())?;
        store.add_item(product(1).with_in_stock(false))?;

        let result = store.place_order(
            &PromoCodeTable::default(),
            None,
            &DeliveryPolicy::default(),
        );

        assert!(matches!(
            result,
            Err(StoreError::Checkout(CheckoutError::OutOfStock(_)))
        ));
        assert_eq!(store.cart().len(), 1);

        Ok(())
    }
}
