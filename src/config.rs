//! Configuration

use std::path::PathBuf;

use clap::Args;

use crate::{
    fixtures::{Fixture, FixtureError},
    prices::{PriceError, parse_currency},
    storage::FileStorage,
    store::{DEFAULT_STORAGE_KEY, StoreOptions},
};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Cart storage and catalog settings.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Directory holding the fixture sets
    #[arg(
        long,
        env = "ENAMEL_FIXTURES",
        default_value = "./fixtures",
        global = true
    )]
    pub fixtures: PathBuf,

    /// Fixture set to load products and promo codes from
    #[arg(
        long,
        env = "ENAMEL_FIXTURE_SET",
        default_value = "dental",
        global = true
    )]
    pub fixture_set: String,

    /// Directory the cart is persisted in
    #[arg(
        long,
        env = "ENAMEL_STORAGE_DIR",
        default_value = ".enamel",
        global = true
    )]
    pub storage_dir: PathBuf,

    /// Key the cart snapshot is stored under
    #[arg(
        long,
        env = "ENAMEL_STORAGE_KEY",
        default_value = DEFAULT_STORAGE_KEY,
        global = true
    )]
    pub storage_key: String,

    /// ISO 4217 code of the cart currency
    #[arg(long, env = "ENAMEL_CURRENCY", default_value = "INR", global = true)]
    pub currency: String,
}

impl StoreConfig {
    /// Options for opening the cart store.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency code is not supported.
    pub fn store_options(&self) -> Result<StoreOptions, PriceError> {
        Ok(StoreOptions {
            key: self.storage_key.clone(),
            currency: parse_currency(&self.currency)?,
        })
    }

    /// File storage rooted at the configured directory.
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.storage_dir)
    }

    /// Load the configured fixture set.
    ///
    /// # Errors
    ///
    /// Returns an error if the product or promotion fixture cannot be loaded.
    pub fn fixture(&self) -> Result<Fixture, FixtureError> {
        let mut fixture = Fixture::with_base_path(&self.fixtures);

        fixture
            .load_products(&self.fixture_set)?
            .load_promotions(&self.fixture_set)?;

        Ok(fixture)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestConfig {
        #[command(flatten)]
        logging: LoggingConfig,

        #[command(flatten)]
        store: StoreConfig,
    }

    #[test]
    fn store_options_follow_arguments() -> TestResult {
        let config = TestConfig::try_parse_from([
            "enamel",
            "--storage-key",
            "clinic-cart",
            "--currency",
            "gbp",
            "--log-format",
            "json",
        ])?;

        let options = config.store.store_options()?;

        assert_eq!(options.key, "clinic-cart");
        assert_eq!(options.currency, GBP);
        assert_eq!(config.logging.log_format, LogFormat::Json);

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() -> TestResult {
        let config = TestConfig::try_parse_from(["enamel", "--currency", "XYZ"])?;

        assert!(matches!(
            config.store.store_options(),
            Err(PriceError::UnknownCurrency(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_loads_from_configured_directory() -> TestResult {
        let config = TestConfig::try_parse_from(["enamel", "--fixtures", "./fixtures"])?;
        let fixture = config.store.fixture()?;

        assert_eq!(fixture.currency()?, INR);
        assert!(!fixture.products().is_empty());

        Ok(())
    }
}
