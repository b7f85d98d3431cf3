//! Products
//!
//! Product data arrives from the catalog as a loosely-typed [`ProductRecord`]. It is validated
//! exactly once into a [`CartLineItemInput`], which is the only shape the cart accepts.

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prices::{Price, PriceError};

/// Quantity cap applied when a product does not declare its own.
pub const DEFAULT_MAX_QUANTITY: u32 = 10;

/// Errors raised while validating product data for the cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// A required field was absent or blank.
    #[error("product is missing required field `{0}`")]
    MissingField(&'static str),

    /// A monetary field could not be converted into a price.
    #[error("product field `{field}` is not a valid price: {source}")]
    InvalidPrice {
        /// Offending field name
        field: &'static str,

        /// Underlying conversion error
        source: PriceError,
    },

    /// The declared per-line quantity cap was zero.
    #[error("product declares max quantity {0}; it must be at least 1")]
    InvalidMaxQuantity(u32),
}

/// Product identifier, either numeric or textual.
///
/// `1` and `"1"` are different products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric identifier
    Int(i64),

    /// Textual identifier (SKU, slug, UUID)
    Str(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Int(id) => write!(f, "{id}"),
            ProductId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId::Int(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::Str(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId::Str(id)
    }
}

impl ProductId {
    /// Parse a user-supplied identifier, preferring the numeric form.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        raw.parse::<i64>()
            .map_or_else(|_err| ProductId::Str(raw.to_string()), ProductId::Int)
    }
}

/// Product payload as delivered by the product-data source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Product identifier
    pub id: Option<ProductId>,

    /// Display name
    pub name: Option<String>,

    /// Selling price in major units
    pub price: Option<Decimal>,

    /// List price in major units
    pub mrp: Option<Decimal>,

    /// Brand name
    pub brand: Option<String>,

    /// Category name
    pub category: Option<String>,

    /// Image URL
    pub image: Option<String>,

    /// Stock availability
    pub in_stock: Option<bool>,

    /// Per-line quantity cap
    pub max_quantity: Option<u32>,
}

/// A validated product ready to be added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItemInput {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Brand name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Category name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Unit selling price
    pub price: Price,

    /// Unit list price
    pub mrp: Price,

    /// Whether the product can currently be fulfilled
    pub in_stock: bool,

    /// Per-line quantity cap
    pub max_quantity: u32,
}

impl CartLineItemInput {
    /// Creates an in-stock product whose MRP equals its price.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: None,
            category: None,
            image: None,
            price,
            mrp: price,
            in_stock: true,
            max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }

    /// Set the list price.
    #[must_use]
    pub fn with_mrp(mut self, mrp: Price) -> Self {
        self.mrp = mrp;
        self
    }

    /// Set the brand.
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set stock availability.
    #[must_use]
    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// Set the per-line quantity cap. A cap of zero is raised to one.
    #[must_use]
    pub fn with_max_quantity(mut self, max_quantity: u32) -> Self {
        self.max_quantity = max_quantity.max(1);
        self
    }

    /// Validate a product record, resolving major-unit amounts in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] if `id`, `name` or `price` is missing, if a price is negative
    /// or unrepresentable, or if `maxQuantity` is zero.
    pub fn try_from_record(
        record: ProductRecord,
        currency: &Currency,
    ) -> Result<Self, ProductError> {
        let id = record.id.ok_or(ProductError::MissingField("id"))?;

        let name = record
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or(ProductError::MissingField("name"))?;

        let price = record.price.ok_or(ProductError::MissingField("price"))?;
        let price = Price::from_major(price, currency).map_err(|source| {
            ProductError::InvalidPrice {
                field: "price",
                source,
            }
        })?;

        let mrp = match record.mrp {
            Some(mrp) => Price::from_major(mrp, currency)
                .map_err(|source| ProductError::InvalidPrice { field: "mrp", source })?,
            None => price,
        };

        let max_quantity = match record.max_quantity {
            Some(0) => return Err(ProductError::InvalidMaxQuantity(0)),
            Some(max) => max,
            None => DEFAULT_MAX_QUANTITY,
        };

        Ok(Self {
            id,
            name,
            brand: record.brand,
            category: record.category,
            image: record.image,
            price,
            mrp,
            in_stock: record.in_stock.unwrap_or(true),
            max_quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn record() -> ProductRecord {
        ProductRecord {
            id: Some(ProductId::Int(7)),
            name: Some("Composite Kit".to_string()),
            price: Some(Decimal::new(2200, 0)),
            mrp: Some(Decimal::new(3000, 0)),
            brand: Some("3M".to_string()),
            ..ProductRecord::default()
        }
    }

    #[test]
    fn valid_record_applies_defaults() -> TestResult {
        let input = CartLineItemInput::try_from_record(record(), INR)?;

        assert_eq!(input.id, ProductId::Int(7));
        assert_eq!(*input.price, 220_000);
        assert_eq!(*input.mrp, 300_000);
        assert!(input.in_stock);
        assert_eq!(input.max_quantity, DEFAULT_MAX_QUANTITY);
        assert_eq!(input.brand.as_deref(), Some("3M"));

        Ok(())
    }

    #[test]
    fn mrp_defaults_to_price() -> TestResult {
        let input = CartLineItemInput::try_from_record(
            ProductRecord {
                mrp: None,
                ..record()
            },
            INR,
        )?;

        assert_eq!(input.mrp, input.price);

        Ok(())
    }

    #[test]
    fn missing_fields_are_reported() {
        let no_id = ProductRecord {
            id: None,
            ..record()
        };
        let blank_name = ProductRecord {
            name: Some("   ".to_string()),
            ..record()
        };
        let no_price = ProductRecord {
            price: None,
            ..record()
        };

        assert_eq!(
            CartLineItemInput::try_from_record(no_id, INR),
            Err(ProductError::MissingField("id"))
        );
        assert_eq!(
            CartLineItemInput::try_from_record(blank_name, INR),
            Err(ProductError::MissingField("name"))
        );
        assert_eq!(
            CartLineItemInput::try_from_record(no_price, INR),
            Err(ProductError::MissingField("price"))
        );
    }

    #[test]
    fn negative_mrp_is_rejected() {
        let result = CartLineItemInput::try_from_record(
            ProductRecord {
                mrp: Some(Decimal::new(-5, 0)),
                ..record()
            },
            INR,
        );

        assert!(matches!(
            result,
            Err(ProductError::InvalidPrice { field: "mrp", .. })
        ));
    }

    #[test]
    fn zero_max_quantity_is_rejected() {
        let result = CartLineItemInput::try_from_record(
            ProductRecord {
                max_quantity: Some(0),
                ..record()
            },
            INR,
        );

        assert_eq!(result, Err(ProductError::InvalidMaxQuantity(0)));
    }

    #[test]
    fn record_deserializes_camel_case_json() -> TestResult {
        let record: ProductRecord = serde_json::from_str(
            r#"{"id":"sku-1","name":"Gloves","price":450,"inStock":false,"maxQuantity":3}"#,
        )?;

        let input = CartLineItemInput::try_from_record(record, INR)?;

        assert_eq!(input.id, ProductId::Str("sku-1".to_string()));
        assert!(!input.in_stock);
        assert_eq!(input.max_quantity, 3);

        Ok(())
    }

    #[test]
    fn product_id_parse_prefers_numbers() {
        assert_eq!(ProductId::parse("42"), ProductId::Int(42));
        assert_eq!(ProductId::parse("bur-7"), ProductId::from("bur-7"));
    }

    #[test]
    fn product_id_display() {
        assert_eq!(ProductId::Int(3).to_string(), "3");
        assert_eq!(ProductId::from("abc").to_string(), "abc");
    }
}
