//! Product Fixtures

use serde::Deserialize;

use crate::products::ProductRecord;

/// Wrapper for a product catalog in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Currency code the catalog is priced in (e.g. "INR")
    pub currency: String,

    /// Catalog products, in display order
    pub products: Vec<ProductRecord>,
}
