//! Fixtures
//!
//! YAML product catalogs and promo code tables, laid out as
//! `<base>/products/<set>.yml` and `<base>/promotions/<set>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::Cart,
    fixtures::{products::ProductsFixture, promotions::PromotionsFixture},
    prices::{PriceError, parse_currency},
    products::{CartLineItemInput, ProductError, ProductId},
    promotions::PromoCodeTable,
};

pub mod products;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error(transparent)]
    Currency(#[from] PriceError),

    /// A catalog entry failed validation
    #[error("Invalid product {index}: {source}")]
    InvalidProduct {
        /// Position of the entry in the catalog
        index: usize,

        /// Validation failure
        #[source]
        source: ProductError,
    },

    /// Two catalog entries share an identifier
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid promotion data
    #[error("Invalid promotion data: {0}")]
    InvalidPromotionData(String),

    /// Currency mismatch between catalogs
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Not enough products in fixture
    #[error("Not enough products in fixture, available: {available}, requested: {requested}")]
    NotEnoughProducts {
        /// Number of products defined in the fixture
        available: usize,
        /// Number of products requested
        requested: usize,
    },
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog in file order
    products: Vec<CartLineItemInput>,

    /// Product id -> position in `products`
    product_index: FxHashMap<ProductId, usize>,

    /// Promo codes loaded so far
    promotions: PromoCodeTable,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            product_index: FxHashMap::default(),
            promotions: PromoCodeTable::new(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if an entry is invalid or
    /// duplicated, or if the catalog currency differs from one already loaded.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        let currency = parse_currency(&fixture.currency)?;

        if let Some(existing) = self.currency
            && existing != currency
        {
            return Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            ));
        }

        let mut loaded = Vec::with_capacity(fixture.products.len());
        let mut loaded_index: FxHashMap<ProductId, usize> = FxHashMap::default();

        for (index, record) in fixture.products.into_iter().enumerate() {
            let product = CartLineItemInput::try_from_record(record, currency)
                .map_err(|source| FixtureError::InvalidProduct { index, source })?;

            if self.product_index.contains_key(&product.id)
                || loaded_index.contains_key(&product.id)
            {
                return Err(FixtureError::DuplicateProduct(product.id));
            }

            loaded_index.insert(product.id.clone(), self.products.len() + loaded.len());
            loaded.push(product);
        }

        // Commit only once every entry has validated.
        self.currency = Some(currency);
        self.product_index.extend(loaded_index);
        self.products.extend(loaded);

        Ok(self)
    }

    /// Load promo codes from a YAML fixture file
    ///
    /// Codes already loaded are replaced by later definitions with the same normalised code.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a definition is invalid.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("promotions")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: PromotionsFixture = serde_norway::from_str(&contents)?;

        for promo in fixture.try_into_table()?.iter() {
            self.promotions
                .insert(&promo.code, promo.description.clone(), promo.rule);
        }

        Ok(self)
    }

    /// Load a complete fixture set (products and promotions with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?.load_promotions(name)?;

        Ok(fixture)
    }

    /// Get a product by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, id: &ProductId) -> Result<&CartLineItemInput, FixtureError> {
        self.product_index
            .get(id)
            .and_then(|&index| self.products.get(index))
            .ok_or_else(|| FixtureError::ProductNotFound(id.clone()))
    }

    /// Get all products, in file order
    pub fn products(&self) -> &[CartLineItemInput] {
        &self.products
    }

    /// Get the loaded promo codes
    pub fn promotions(&self) -> &PromoCodeTable {
        &self.promotions
    }

    /// Create a cart holding one of each of the first `n` products (all when `None`)
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded or if more are requested than exist.
    pub fn cart(&self, n: Option<usize>) -> Result<Cart, FixtureError> {
        let currency = self.currency()?;

        if let Some(n) = n
            && n > self.products.len()
        {
            return Err(FixtureError::NotEnoughProducts {
                requested: n,
                available: self.products.len(),
            });
        }

        let mut cart = Cart::new(currency);

        for product in self.products.iter().take(n.unwrap_or(self.products.len())) {
            cart.add_item(product.clone());
        }

        Ok(cart)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
